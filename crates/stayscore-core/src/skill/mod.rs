//! The request pipeline.
//!
//! A request passes through the request interceptors in registration order,
//! is routed to the first matching handler, and the handler's response is
//! shown to the response interceptors. Any error on the way is turned into a
//! response by the first error handler that accepts it.

mod errors;
mod handlers;
mod input;
mod interceptors;

pub use errors::{ErrorHandler, GlobalErrorHandler};
pub use handlers::Handlers;
pub use input::{HandlerInput, RequestAttributes};
pub use interceptors::{
    LocalizationInterceptor, RequestInterceptor, RequestLoggingInterceptor, ResponseInterceptor,
    ResponseLoggingInterceptor, UnitInfoInterceptor,
};

use crate::alerts::{AlertDispatcher, AlertWorker};
use crate::collaborators::{
    DisabledSmsSender, DisabledTopicPublisher, DisabledUnitDirectory, ExtensionSecretStore,
    PropertyApiClient, SecretStore, SmsSender, StaticSecretStore, TopicPublisher, UnitDirectory,
    WebhookSmsSender, WebhookTopicPublisher,
};
use crate::config::SkillConfig;
use crate::error::{Result, SkillError};
use crate::localization::LocaleRegistry;
use crate::visuals::VisualTemplates;
use stayscore_proto::{RequestEnvelope, ResponseDescription, ResponseEnvelope, Router, SessionState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A fully wired skill, ready to answer requests.
pub struct Skill {
    router: Router,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    handlers: Handlers,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    locales: Arc<LocaleRegistry>,
}

impl Skill {
    pub fn builder(config: SkillConfig) -> SkillBuilder {
        SkillBuilder::new(config)
    }

    /// Locale bundles the skill speaks from.
    pub fn locales(&self) -> &LocaleRegistry {
        &self.locales
    }

    /// Answers one request.
    ///
    /// Returns `Err` only when no error handler accepts the failure.
    pub async fn invoke(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope> {
        let parsed = envelope
            .session
            .as_ref()
            .map(|s| SessionState::from_attributes(&s.attributes))
            .transpose();

        let (session, early_error) = match parsed {
            Ok(session) => (session.unwrap_or_default(), None),
            Err(e) => (SessionState::default(), Some(SkillError::from(e))),
        };

        let mut input = HandlerInput::new(envelope, session);
        let outcome = match early_error {
            Some(e) => Err(e),
            None => self.dispatch(&mut input).await,
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => self.handle_error(&input, e)?,
        };
        Ok(response.into_envelope(input.session.to_attributes()))
    }

    async fn dispatch(&self, input: &mut HandlerInput) -> Result<ResponseDescription> {
        for interceptor in &self.request_interceptors {
            debug!("Running request interceptor {}", interceptor.name());
            interceptor.process(input).await?;
        }

        let handler = self
            .router
            .select(&input.envelope)
            .ok_or_else(|| SkillError::Unhandled {
                request_type: input.envelope.request.request_type.clone(),
            })?;
        info!("Routing {} to {}", input.envelope.request.request_type, handler);

        let response = self.handlers.handle(handler, input)?;

        for interceptor in &self.response_interceptors {
            debug!("Running response interceptor {}", interceptor.name());
            interceptor.process(input, &response);
        }
        Ok(response)
    }

    fn handle_error(&self, input: &HandlerInput, error: SkillError) -> Result<ResponseDescription> {
        match self
            .error_handlers
            .iter()
            .find(|h| h.can_handle(input, &error))
        {
            Some(handler) => Ok(handler.handle(input, &error)),
            None => {
                warn!("No error handler accepted {}: {}", error.kind(), error);
                Err(error)
            }
        }
    }
}

/// Assembles a [`Skill`] from configuration and optional overrides.
///
/// Collaborators not supplied explicitly are built from the configuration:
/// HTTP clients when their endpoints are set, disabled stand-ins otherwise.
pub struct SkillBuilder {
    config: SkillConfig,
    router: Router,
    locales: Option<LocaleRegistry>,
    unit_directory: Option<Arc<dyn UnitDirectory>>,
    sms: Option<Arc<dyn SmsSender>>,
    publisher: Option<Arc<dyn TopicPublisher>>,
    extra_request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    extra_response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

impl SkillBuilder {
    pub fn new(config: SkillConfig) -> Self {
        Self {
            config,
            router: Router::default(),
            locales: None,
            unit_directory: None,
            sms: None,
            publisher: None,
            extra_request_interceptors: Vec::new(),
            extra_response_interceptors: Vec::new(),
        }
    }

    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    #[must_use]
    pub fn locales(mut self, locales: LocaleRegistry) -> Self {
        self.locales = Some(locales);
        self
    }

    #[must_use]
    pub fn unit_directory(mut self, directory: Arc<dyn UnitDirectory>) -> Self {
        self.unit_directory = Some(directory);
        self
    }

    #[must_use]
    pub fn sms_sender(mut self, sms: Arc<dyn SmsSender>) -> Self {
        self.sms = Some(sms);
        self
    }

    #[must_use]
    pub fn topic_publisher(mut self, publisher: Arc<dyn TopicPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Adds a request interceptor after the built-in ones.
    #[must_use]
    pub fn request_interceptor(mut self, interceptor: Box<dyn RequestInterceptor>) -> Self {
        self.extra_request_interceptors.push(interceptor);
        self
    }

    /// Adds a response interceptor after the built-in one.
    #[must_use]
    pub fn response_interceptor(mut self, interceptor: Box<dyn ResponseInterceptor>) -> Self {
        self.extra_response_interceptors.push(interceptor);
        self
    }

    /// Builds the skill and starts its alert worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Result<(Skill, AlertWorker)> {
        let SkillBuilder {
            config,
            router,
            locales,
            unit_directory,
            sms,
            publisher,
            extra_request_interceptors,
            extra_response_interceptors,
        } = self;

        let locales = match locales {
            Some(locales) => locales,
            None => LocaleRegistry::from_config(&config.skill)
                .map_err(|e| SkillError::Internal(format!("failed to load locale bundles: {e}")))?,
        };
        let locales = Arc::new(locales);
        let templates = VisualTemplates::load()
            .map_err(|e| SkillError::Internal(format!("failed to load visual templates: {e}")))?;

        let unit_directory = unit_directory.unwrap_or_else(|| default_unit_directory(&config));
        let sms = sms.unwrap_or_else(|| default_sms_sender(&config));
        let publisher = publisher.unwrap_or_else(|| default_topic_publisher(&config));

        let (alerts, worker) =
            AlertDispatcher::start(sms, publisher, config.skill.staff_sms_number.clone());

        let mut request_interceptors: Vec<Box<dyn RequestInterceptor>> = vec![
            Box::new(RequestLoggingInterceptor),
            Box::new(LocalizationInterceptor::new(Arc::clone(&locales))),
            Box::new(UnitInfoInterceptor::new(unit_directory)),
        ];
        request_interceptors.extend(extra_request_interceptors);

        let mut response_interceptors: Vec<Box<dyn ResponseInterceptor>> =
            vec![Box::new(ResponseLoggingInterceptor)];
        response_interceptors.extend(extra_response_interceptors);

        let skill = Skill {
            router,
            request_interceptors,
            response_interceptors,
            handlers: Handlers::new(templates, alerts, config.skill.rating_task_name.clone()),
            error_handlers: vec![Box::new(GlobalErrorHandler::new(Arc::clone(&locales)))],
            locales,
        };
        Ok((skill, worker))
    }
}

fn default_unit_directory(config: &SkillConfig) -> Arc<dyn UnitDirectory> {
    let Some(endpoint) = &config.property_api.endpoint else {
        return Arc::new(DisabledUnitDirectory);
    };
    let store: Arc<dyn SecretStore> = match &config.secrets.static_secret {
        Some(payload) => Arc::new(StaticSecretStore::new(payload.clone())),
        None => Arc::new(ExtensionSecretStore::new(&config.secrets)),
    };
    Arc::new(PropertyApiClient::new(
        endpoint.clone(),
        &config.property_api,
        store,
        config.secrets.clone(),
    ))
}

fn default_sms_sender(config: &SkillConfig) -> Arc<dyn SmsSender> {
    match &config.notifications.sms_endpoint {
        Some(endpoint) => Arc::new(WebhookSmsSender::new(endpoint.clone(), &config.notifications)),
        None => Arc::new(DisabledSmsSender),
    }
}

fn default_topic_publisher(config: &SkillConfig) -> Arc<dyn TopicPublisher> {
    match (
        &config.notifications.publish_endpoint,
        &config.notifications.topic_arn,
    ) {
        (Some(endpoint), Some(topic)) => Arc::new(WebhookTopicPublisher::new(
            endpoint.clone(),
            topic.clone(),
            &config.notifications,
        )),
        _ => Arc::new(DisabledTopicPublisher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> RequestEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_unrouted_request_gets_error_response() {
        let (skill, _worker) = Skill::builder(SkillConfig::default()).build().unwrap();
        let response = skill
            .invoke(envelope(json!({
                "session": { "new": true },
                "request": { "type": "CanFulfillIntentRequest", "locale": "en-US" }
            })))
            .await
            .unwrap();
        assert_eq!(response.response.should_end_session, Some(true));
        assert!(
            response
                .response
                .output_speech
                .unwrap()
                .text()
                .contains("something went wrong")
        );
    }

    #[tokio::test]
    async fn test_invalid_session_attributes_get_error_response() {
        let (skill, _worker) = Skill::builder(SkillConfig::default()).build().unwrap();
        let response = skill
            .invoke(envelope(json!({
                "session": { "new": false, "attributes": { "puid": 42 } },
                "request": { "type": "LaunchRequest", "locale": "en-US" }
            })))
            .await
            .unwrap();
        assert_eq!(response.response.should_end_session, Some(true));
    }
}
