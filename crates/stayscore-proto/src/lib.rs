//! # stayscore-proto
//!
//! Shared types for the stayscore guest rating skill.
//!
//! This crate provides the foundational abstractions used across all stayscore crates,
//! including:
//! - The request envelope received from the voice platform
//! - Response descriptions and the response envelope sent back
//! - Typed session state
//! - Ratings and the rating classifier
//! - Routes and the first-match router

mod envelope;
mod error;
mod rating;
mod response;
mod route;
mod router;
mod session;

pub use envelope::{
    APL_INTERFACE, Context, Device, EventSource, INTENT_REQUEST, Intent, LAUNCH_REQUEST, Request,
    RequestEnvelope, RequestKind, SESSION_ENDED_REQUEST, Session, Slot, SystemContext, Task,
    USER_EVENT_REQUEST, Unit,
};
pub use error::{ProtoError, Result};
pub use rating::{MAX_RATING, MIN_RATING, Rating, RatingOutcome};
pub use response::{
    Directive, OutputSpeech, Reprompt, ResponseBody, ResponseDescription, ResponseEnvelope,
};
pub use route::{
    CANCEL_INTENT, DEFAULT_ROUTES, FALLBACK_INTENT, HELP_INTENT, HandlerId, RATING_EVENT_SOURCE,
    RATING_INTENT, RequestMatcher, Route, STOP_INTENT,
};
pub use router::Router;
pub use session::SessionState;
