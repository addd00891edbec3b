//! Route types for request dispatch.
//!
//! A route pairs a handler with the request shapes it accepts.

use crate::{RequestEnvelope, RequestKind};
use serde::{Deserialize, Serialize};

/// Custom intent carrying the guest's spoken rating.
pub const RATING_INTENT: &str = "RatingIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";
/// Component id of the touch rating widget.
pub const RATING_EVENT_SOURCE: &str = "hotelRating";

/// Identifies one of the skill's handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerId {
    Launch,
    RatingIntent,
    RatingEvent,
    Help,
    CancelAndStop,
    Fallback,
    SessionEnded,
}

impl HandlerId {
    /// Returns the handler name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerId::Launch => "LaunchRequestHandler",
            HandlerId::RatingIntent => "RatingIntentHandler",
            HandlerId::RatingEvent => "RatingEventHandler",
            HandlerId::Help => "HelpIntentHandler",
            HandlerId::CancelAndStop => "CancelAndStopIntentHandler",
            HandlerId::Fallback => "FallbackIntentHandler",
            HandlerId::SessionEnded => "SessionEndedRequestHandler",
        }
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request shape a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMatcher {
    /// Any request of this kind.
    Kind(RequestKind),
    /// An intent request with exactly this intent name.
    Intent(&'static str),
    /// A visual user event raised by the component with this id.
    UserEvent { source_id: &'static str },
}

impl RequestMatcher {
    /// Checks whether the envelope has this shape.
    pub fn matches(self, envelope: &RequestEnvelope) -> bool {
        match self {
            RequestMatcher::Kind(kind) => envelope.kind() == kind,
            RequestMatcher::Intent(name) => envelope.intent_name() == Some(name),
            RequestMatcher::UserEvent { source_id } => {
                envelope.kind() == RequestKind::UserEvent
                    && envelope.event_source_id() == Some(source_id)
            }
        }
    }
}

/// A handler and the request shapes it is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub handler: HandlerId,
    pub matchers: &'static [RequestMatcher],
}

impl Route {
    pub const fn new(handler: HandlerId, matchers: &'static [RequestMatcher]) -> Self {
        Self { handler, matchers }
    }

    /// True if any of the route's matchers accepts the envelope.
    pub fn matches(&self, envelope: &RequestEnvelope) -> bool {
        self.matchers.iter().any(|m| m.matches(envelope))
    }
}

/// The skill's routes, in evaluation order.
pub const DEFAULT_ROUTES: &[Route] = &[
    Route::new(HandlerId::Launch, &[RequestMatcher::Kind(RequestKind::Launch)]),
    Route::new(HandlerId::RatingIntent, &[RequestMatcher::Intent(RATING_INTENT)]),
    Route::new(
        HandlerId::RatingEvent,
        &[RequestMatcher::UserEvent {
            source_id: RATING_EVENT_SOURCE,
        }],
    ),
    Route::new(HandlerId::Help, &[RequestMatcher::Intent(HELP_INTENT)]),
    Route::new(
        HandlerId::CancelAndStop,
        &[
            RequestMatcher::Intent(CANCEL_INTENT),
            RequestMatcher::Intent(STOP_INTENT),
        ],
    ),
    Route::new(HandlerId::Fallback, &[RequestMatcher::Intent(FALLBACK_INTENT)]),
    Route::new(
        HandlerId::SessionEnded,
        &[RequestMatcher::Kind(RequestKind::SessionEnded)],
    ),
];
