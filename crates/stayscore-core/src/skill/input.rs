use crate::error::{Result, SkillError};
use crate::localization::Translator;
use stayscore_proto::{RequestEnvelope, SessionState};

/// Attributes scoped to a single request. Rebuilt on every invocation.
#[derive(Debug, Clone, Default)]
pub struct RequestAttributes {
    translator: Option<Translator>,
}

impl RequestAttributes {
    /// Binds the translator for this request's locale.
    pub fn bind_translator(&mut self, translator: Translator) {
        self.translator = Some(translator);
    }

    pub fn translator(&self) -> Option<&Translator> {
        self.translator.as_ref()
    }
}

/// Everything a step of the pipeline can see for the current request.
#[derive(Debug, Clone)]
pub struct HandlerInput {
    pub envelope: RequestEnvelope,
    pub session: SessionState,
    pub attributes: RequestAttributes,
}

impl HandlerInput {
    pub fn new(envelope: RequestEnvelope, session: SessionState) -> Self {
        Self {
            envelope,
            session,
            attributes: RequestAttributes::default(),
        }
    }

    /// Translates `key` with the request's translator.
    pub fn t(&self, key: &str) -> Result<String> {
        self.translate(key, &[])
    }

    /// Translates `key` with printf-style arguments.
    pub fn translate(&self, key: &str, args: &[&dyn std::fmt::Display]) -> Result<String> {
        self.attributes
            .translator()
            .map(|t| t.translate(key, args))
            .ok_or_else(|| SkillError::Internal("no translator bound to request".to_string()))
    }
}
