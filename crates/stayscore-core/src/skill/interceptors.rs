//! Steps that run before the router (request interceptors) and after the
//! handler (response interceptors).

use super::HandlerInput;
use crate::collaborators::UnitDirectory;
use crate::error::Result;
use crate::localization::LocaleRegistry;
use async_trait::async_trait;
use stayscore_proto::ResponseDescription;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A step run before routing. Returning `Ok` is the only success signal.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process(&self, input: &mut HandlerInput) -> Result<()>;
}

/// A read-only observer of the final response.
pub trait ResponseInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, input: &HandlerInput, response: &ResponseDescription);
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Option<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match result {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("Failed to serialize for logging: {}", e);
            None
        }
    }
}

/// Logs the incoming envelope and session attributes.
pub struct RequestLoggingInterceptor;

#[async_trait]
impl RequestInterceptor for RequestLoggingInterceptor {
    fn name(&self) -> &'static str {
        "RequestLoggingInterceptor"
    }

    async fn process(&self, input: &mut HandlerInput) -> Result<()> {
        if let Some(json) = to_json(&input.envelope, false) {
            info!("==Request=={}", json);
        }
        if let Some(json) = to_json(&input.session.to_attributes(), true) {
            info!("==SessionAttributes=={}", json);
        }
        Ok(())
    }
}

/// Binds a translator for the request locale.
pub struct LocalizationInterceptor {
    registry: Arc<LocaleRegistry>,
}

impl LocalizationInterceptor {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RequestInterceptor for LocalizationInterceptor {
    fn name(&self) -> &'static str {
        "LocalizationInterceptor"
    }

    async fn process(&self, input: &mut HandlerInput) -> Result<()> {
        let requested = input.envelope.locale();
        let translator = self.registry.translator(requested);
        debug!(
            "Resolved locale {:?} to bundle {:?}",
            requested,
            translator.locale()
        );
        input.attributes.bind_translator(translator);
        Ok(())
    }
}

/// Resolves the guest's unit on the first turn of a session.
///
/// The unit id comes from the task handoff input when the skill was launched
/// by a task, otherwise from the device's unit context. Any failure is logged
/// and leaves the session untouched.
pub struct UnitInfoInterceptor {
    directory: Arc<dyn UnitDirectory>,
}

impl UnitInfoInterceptor {
    pub fn new(directory: Arc<dyn UnitDirectory>) -> Self {
        Self { directory }
    }

    fn unit_id(input: &HandlerInput) -> Option<String> {
        if let Some(task) = &input.envelope.request.task {
            let id = task.input_str("unitId");
            info!("persistent unit id from task: {:?}", id);
            return id;
        }
        let id = input.envelope.persistent_unit_id().map(str::to_string);
        if let Some(id) = &id {
            info!("persistent unit id: {}", id);
        }
        id
    }
}

#[async_trait]
impl RequestInterceptor for UnitInfoInterceptor {
    fn name(&self) -> &'static str {
        "UnitInfoInterceptor"
    }

    async fn process(&self, input: &mut HandlerInput) -> Result<()> {
        if !input.envelope.is_new_session() {
            return Ok(());
        }

        let Some(unit_id) = Self::unit_id(input).filter(|id| !id.is_empty()) else {
            return Ok(());
        };

        match self.directory.unit_name(&unit_id).await {
            Ok(Some(name)) if !name.is_empty() => {
                info!("unit name: {}", name);
                input.session.record_unit(unit_id, name);
            }
            Ok(_) => info!("No unit name resolved for {}", unit_id),
            Err(e) => {
                let envelope = serde_json::to_string(&input.envelope).unwrap_or_default();
                error!("REQUEST ERROR ENVELOPE = {}", envelope);
                error!("Unit lookup for {} failed: {}", unit_id, e);
            }
        }
        Ok(())
    }
}

/// Logs the outgoing response and session attributes.
pub struct ResponseLoggingInterceptor;

impl ResponseInterceptor for ResponseLoggingInterceptor {
    fn name(&self) -> &'static str {
        "ResponseLoggingInterceptor"
    }

    fn process(&self, input: &HandlerInput, response: &ResponseDescription) {
        let preview = response
            .clone()
            .into_envelope(input.session.to_attributes())
            .response;
        if let Some(json) = to_json(&preview, false) {
            info!("==Response=={}", json);
        }
        if let Some(json) = to_json(&input.session.to_attributes(), true) {
            info!("==SessionAttributes=={}", json);
        }
    }
}
