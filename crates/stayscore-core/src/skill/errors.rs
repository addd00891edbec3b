use super::HandlerInput;
use crate::error::SkillError;
use crate::localization::LocaleRegistry;
use stayscore_proto::ResponseDescription;
use std::sync::Arc;
use tracing::error;

/// Turns a failed request into a response.
pub trait ErrorHandler: Send + Sync {
    fn can_handle(&self, input: &HandlerInput, error: &SkillError) -> bool;

    fn handle(&self, input: &HandlerInput, error: &SkillError) -> ResponseDescription;
}

/// Catch-all handler: apologizes and ends the session.
pub struct GlobalErrorHandler {
    registry: Arc<LocaleRegistry>,
}

impl GlobalErrorHandler {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }
}

impl ErrorHandler for GlobalErrorHandler {
    fn can_handle(&self, _input: &HandlerInput, error: &SkillError) -> bool {
        !error.kind().is_empty()
    }

    fn handle(&self, input: &HandlerInput, error: &SkillError) -> ResponseDescription {
        error!("Error handled ({}): {}", error.kind(), error);

        // Errors can occur before the localization step has run.
        let speech = match input.attributes.translator() {
            Some(translator) => translator.t("ERROR_PROMPT"),
            None => self
                .registry
                .translator(input.envelope.locale())
                .t("ERROR_PROMPT"),
        };
        ResponseDescription::new()
            .speak(speech)
            .with_should_end_session(true)
    }
}
