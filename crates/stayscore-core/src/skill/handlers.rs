//! Request handlers, dispatched by [`HandlerId`].

use super::HandlerInput;
use crate::alerts::{AlertDispatcher, StaffAlert};
use crate::error::{Result, SkillError};
use crate::visuals::VisualTemplates;
use stayscore_proto::{HandlerId, Rating, RatingOutcome, ResponseDescription};
use tracing::{debug, info, warn};

/// Slot and task input name carrying the rating.
const RATING_SLOT: &str = "rating";

/// Position of the rating in a widget event's arguments.
const EVENT_RATING_ARGUMENT: usize = 1;

/// Shared state the handlers need.
pub struct Handlers {
    templates: VisualTemplates,
    alerts: AlertDispatcher,
    rating_task_name: String,
}

impl Handlers {
    pub fn new(
        templates: VisualTemplates,
        alerts: AlertDispatcher,
        rating_task_name: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            alerts,
            rating_task_name: rating_task_name.into(),
        }
    }

    pub fn handle(&self, id: HandlerId, input: &HandlerInput) -> Result<ResponseDescription> {
        debug!("Handling request with {}", id);
        match id {
            HandlerId::Launch => self.launch(input),
            HandlerId::RatingIntent => self.rating_intent(input),
            HandlerId::RatingEvent => self.rating_event(input),
            HandlerId::Help => Self::help(input),
            HandlerId::CancelAndStop => Self::cancel_and_stop(input),
            HandlerId::Fallback => Self::fallback(input),
            HandlerId::SessionEnded => Ok(Self::session_ended(input)),
        }
    }

    fn launch(&self, input: &HandlerInput) -> Result<ResponseDescription> {
        if let Some(task) = &input.envelope.request.task {
            if task.name == self.rating_task_name {
                let value = task
                    .input
                    .get(RATING_SLOT)
                    .ok_or(SkillError::MissingSlot("task rating input"))?;
                let Some(raw) = Rating::parse_value(value) else {
                    warn!("Task rating input {} is not a number", value);
                    return self.rate(input, None, true);
                };
                let rating = Rating::clamped(raw);
                info!("Rating {} handed over by task (raw {})", rating, raw);
                return self.rate(input, Some(rating), true);
            }
            warn!("Ignoring unknown launch task {}", task.name);
        }

        let speech = input.t("WELCOME_PROMPT")?;
        let mut response = ResponseDescription::new().speak(&speech).reprompt(speech);
        if input.envelope.supports_apl() {
            response.add_directive(self.templates.rating_document());
        }
        Ok(response)
    }

    fn rating_intent(&self, input: &HandlerInput) -> Result<ResponseDescription> {
        let slot = input
            .envelope
            .slot(RATING_SLOT)
            .ok_or(SkillError::MissingSlot("rating slot"))?;
        // An unfilled slot means the guest named no number.
        let rating = slot
            .value
            .as_deref()
            .and_then(Rating::parse_leading)
            .map(Rating::unclamped);
        if rating.is_none() {
            warn!("Rating slot value {:?} is not a number", slot.value);
        }
        self.rate(input, rating, true)
    }

    fn rating_event(&self, input: &HandlerInput) -> Result<ResponseDescription> {
        let raw = input
            .envelope
            .request
            .arguments
            .get(EVENT_RATING_ARGUMENT)
            .ok_or(SkillError::MissingSlot("rating event argument"))?;
        let rating = Rating::parse_value(raw).map(Rating::unclamped);
        if rating.is_none() {
            warn!("Rating event argument {} is not a number", raw);
        }
        // The widget already shows the chosen value.
        self.rate(input, rating, false)
    }

    /// Speaks the outcome of a rating, shows feedback and alerts staff on a
    /// negative rating. `None` is an unusable rating and counts as neutral.
    fn rate(
        &self,
        input: &HandlerInput,
        rating: Option<Rating>,
        sync_widget: bool,
    ) -> Result<ResponseDescription> {
        let outcome = rating.map_or(RatingOutcome::Neutral, Rating::outcome);
        info!("Rating {:?} classified as {:?}", rating.map(Rating::value), outcome);

        let key = match outcome {
            RatingOutcome::Negative => "NEGATIVE_PROMPT",
            RatingOutcome::Positive => "POSITIVE_PROMPT",
            RatingOutcome::Neutral => "THANKYOU_PROMPT",
        };
        let mut response = ResponseDescription::new()
            .speak(input.t(key)?)
            .with_should_end_session(true);

        if let Some(directive) = self.templates.feedback(outcome) {
            response.add_directive(directive);
        }

        if outcome == RatingOutcome::Negative
            && let Some(rating) = rating
        {
            let message = input.translate(
                "STAFF_TEXT_MESSAGE",
                &[&rating.value(), &input.session.unit_name_or_empty()],
            )?;
            self.alerts.dispatch(StaffAlert::new(
                message,
                rating.value(),
                input.session.unit_name.clone(),
            ));
        }

        if sync_widget
            && input.envelope.supports_apl()
            && let Some(rating) = rating
        {
            response.add_directive(self.templates.set_rating(rating.value()));
        }

        Ok(response)
    }

    fn help(input: &HandlerInput) -> Result<ResponseDescription> {
        let speech = input.t("HELP_PROMPT")?;
        Ok(ResponseDescription::new().speak(&speech).reprompt(speech))
    }

    fn cancel_and_stop(input: &HandlerInput) -> Result<ResponseDescription> {
        Ok(ResponseDescription::new()
            .speak(input.t("EXIT_PROMPT")?)
            .with_should_end_session(true))
    }

    fn fallback(input: &HandlerInput) -> Result<ResponseDescription> {
        let speech = input.t("FALLBACK_PROMPT")?;
        Ok(ResponseDescription::new().speak(&speech).reprompt(speech))
    }

    fn session_ended(input: &HandlerInput) -> ResponseDescription {
        info!(
            "Session ended: {}",
            input.envelope.request.reason.as_deref().unwrap_or("unknown reason")
        );
        ResponseDescription::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{DisabledSmsSender, DisabledTopicPublisher};
    use crate::config::DEFAULT_RATING_TASK_NAME;
    use crate::localization::LocaleRegistry;
    use crate::visuals::feedback_mood;
    use serde_json::{Value, json};
    use stayscore_proto::{Directive, RequestEnvelope, SessionState};
    use std::sync::Arc;

    fn handlers() -> Handlers {
        let (alerts, _worker) = AlertDispatcher::start(
            Arc::new(DisabledSmsSender),
            Arc::new(DisabledTopicPublisher),
            None,
        );
        Handlers::new(VisualTemplates::load().unwrap(), alerts, DEFAULT_RATING_TASK_NAME)
    }

    fn input(request: Value, apl: bool) -> HandlerInput {
        let interfaces = if apl {
            json!({ "Alexa.Presentation.APL": {} })
        } else {
            json!({})
        };
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "session": { "new": true },
            "context": { "System": { "device": { "supportedInterfaces": interfaces } } },
            "request": request
        }))
        .unwrap();
        let mut input = HandlerInput::new(envelope, SessionState::default());
        let registry = LocaleRegistry::with_builtins("en-US").unwrap();
        input
            .attributes
            .bind_translator(registry.translator(Some("en-US")));
        input
    }

    fn rating_intent(value: &str) -> Value {
        json!({
            "type": "IntentRequest",
            "locale": "en-US",
            "intent": { "name": "RatingIntent", "slots": { "rating": { "name": "rating", "value": value } } }
        })
    }

    fn moods(response: &ResponseDescription) -> Vec<&str> {
        response.directives.iter().filter_map(feedback_mood).collect()
    }

    fn has_set_value(response: &ResponseDescription) -> bool {
        response
            .directives
            .iter()
            .any(|d| matches!(d, Directive::ExecuteCommands { .. }))
    }

    #[tokio::test]
    async fn test_launch_without_screen() {
        let input = input(json!({ "type": "LaunchRequest", "locale": "en-US" }), false);
        let response = handlers().handle(HandlerId::Launch, &input).unwrap();
        assert!(response.speech.is_some());
        assert_eq!(response.speech, response.reprompt);
        assert_eq!(response.should_end_session, Some(false));
        assert!(response.directives.is_empty());
    }

    #[tokio::test]
    async fn test_launch_with_screen_renders_widget() {
        let input = input(json!({ "type": "LaunchRequest", "locale": "en-US" }), true);
        let response = handlers().handle(HandlerId::Launch, &input).unwrap();
        assert_eq!(response.directives.len(), 1);
        assert!(matches!(
            &response.directives[0],
            Directive::RenderDocument { datasources: Some(ds), .. } if ds.get("payload").is_some()
        ));
    }

    #[tokio::test]
    async fn test_negative_rating_on_screen() {
        let input = input(rating_intent("2"), true);
        let response = handlers().handle(HandlerId::RatingIntent, &input).unwrap();
        assert_eq!(response.should_end_session, Some(true));
        assert_eq!(moods(&response), vec!["sad"]);
        assert!(has_set_value(&response));
    }

    #[tokio::test]
    async fn test_positive_rating_without_screen() {
        let input = input(rating_intent("5"), false);
        let response = handlers().handle(HandlerId::RatingIntent, &input).unwrap();
        let speech = response.speech.as_deref().unwrap();
        assert!(speech.contains("Thank you"), "unexpected speech: {speech}");
        assert_eq!(moods(&response), vec!["happy"]);
        assert!(!has_set_value(&response));
    }

    #[tokio::test]
    async fn test_non_numeric_slot_is_neutral() {
        let input = input(rating_intent("great"), true);
        let response = handlers().handle(HandlerId::RatingIntent, &input).unwrap();
        assert_eq!(response.speech.as_deref(), Some("Thank you for your feedback."));
        assert!(response.directives.is_empty());
        assert_eq!(response.should_end_session, Some(true));
    }

    #[tokio::test]
    async fn test_voice_rating_is_not_clamped() {
        let input = input(rating_intent("9"), false);
        let response = handlers().handle(HandlerId::RatingIntent, &input).unwrap();
        assert_eq!(response.speech.as_deref(), Some("Thank you for your feedback."));
    }

    #[tokio::test]
    async fn test_missing_slot_is_an_error() {
        let input = input(
            json!({ "type": "IntentRequest", "intent": { "name": "RatingIntent" } }),
            false,
        );
        let err = handlers().handle(HandlerId::RatingIntent, &input).unwrap_err();
        assert_eq!(err.kind(), "MissingSlot");
    }

    #[tokio::test]
    async fn test_unfilled_slot_is_neutral() {
        let input = input(
            json!({
                "type": "IntentRequest",
                "intent": { "name": "RatingIntent", "slots": { "rating": { "name": "rating" } } }
            }),
            true,
        );
        let response = handlers().handle(HandlerId::RatingIntent, &input).unwrap();
        assert_eq!(response.speech.as_deref(), Some("Thank you for your feedback."));
        assert_eq!(response.should_end_session, Some(true));
        assert!(response.directives.is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_task_rating_is_neutral() {
        let input = input(
            json!({
                "type": "LaunchRequest",
                "task": { "name": DEFAULT_RATING_TASK_NAME, "input": { "rating": "lots" } }
            }),
            true,
        );
        let response = handlers().handle(HandlerId::Launch, &input).unwrap();
        assert_eq!(response.speech.as_deref(), Some("Thank you for your feedback."));
        assert_eq!(response.should_end_session, Some(true));
        assert!(response.directives.is_empty());
    }

    #[tokio::test]
    async fn test_task_without_rating_is_an_error() {
        let input = input(
            json!({
                "type": "LaunchRequest",
                "task": { "name": DEFAULT_RATING_TASK_NAME, "input": {} }
            }),
            false,
        );
        let err = handlers().handle(HandlerId::Launch, &input).unwrap_err();
        assert_eq!(err.kind(), "MissingSlot");
    }

    #[tokio::test]
    async fn test_task_rating_is_clamped() {
        let input = input(
            json!({
                "type": "LaunchRequest",
                "task": { "name": DEFAULT_RATING_TASK_NAME, "input": { "rating": 7 } }
            }),
            false,
        );
        let response = handlers().handle(HandlerId::Launch, &input).unwrap();
        assert_eq!(moods(&response), vec!["happy"]);
        assert_eq!(response.should_end_session, Some(true));
    }

    #[tokio::test]
    async fn test_event_rating_does_not_resync_widget() {
        let input = input(
            json!({
                "type": "Alexa.Presentation.APL.UserEvent",
                "source": { "type": "AlexaRating", "handler": "Press", "id": "hotelRating" },
                "arguments": ["ratingSelected", 1]
            }),
            true,
        );
        let response = handlers().handle(HandlerId::RatingEvent, &input).unwrap();
        assert_eq!(moods(&response), vec!["sad"]);
        assert!(!has_set_value(&response));
    }

    #[tokio::test]
    async fn test_help_keeps_session_open() {
        let input = input(json!({ "type": "IntentRequest", "intent": { "name": "AMAZON.HelpIntent" } }), false);
        let response = handlers().handle(HandlerId::Help, &input).unwrap();
        assert_eq!(response.should_end_session, Some(false));
    }

    #[tokio::test]
    async fn test_session_ended_is_empty() {
        let input = input(json!({ "type": "SessionEndedRequest", "reason": "USER_INITIATED" }), false);
        let response = handlers().handle(HandlerId::SessionEnded, &input).unwrap();
        assert_eq!(response, ResponseDescription::new());
    }
}
