//! Request envelope received from the voice platform on every turn.
//!
//! Only the parts of the envelope the skill reads are modelled; everything
//! else the platform sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Request type for a cold launch of the skill.
pub const LAUNCH_REQUEST: &str = "LaunchRequest";
/// Request type for a recognized voice intent.
pub const INTENT_REQUEST: &str = "IntentRequest";
/// Request type sent when the platform closes the session.
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";
/// Request type for touch events raised by a visual template.
pub const USER_EVENT_REQUEST: &str = "Alexa.Presentation.APL.UserEvent";
/// Interface key advertised by devices that can render visual templates.
pub const APL_INTERFACE: &str = "Alexa.Presentation.APL";

/// Coarse classification of `request.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    UserEvent,
    /// Any request type the skill has no route for.
    Unknown,
}

impl RequestKind {
    /// Maps a raw `request.type` string to its kind.
    pub fn from_type(request_type: &str) -> Self {
        match request_type {
            LAUNCH_REQUEST => Self::Launch,
            INTENT_REQUEST => Self::Intent,
            SESSION_ENDED_REQUEST => Self::SessionEnded,
            USER_EVENT_REQUEST => Self::UserEvent,
            _ => Self::Unknown,
        }
    }
}

/// One turn of user interaction as delivered by the host platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,

    /// Conversation session. Absent for some out-of-session requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,

    #[serde(default)]
    pub context: Context,

    pub request: Request,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// True only on the first turn of a session.
    #[serde(default)]
    pub new: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Attributes persisted by the platform between turns.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: SystemContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,

    /// Physical unit (room) the device is registered to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default)]
    pub supported_interfaces: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_unit_id: Option<String>,
}

/// The `request` object of the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,

    /// Present only when launched through a cross-skill task handoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,

    /// Source component of a visual user event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,

    /// Arguments attached to a visual user event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,

    /// Why the session ended, on `SessionEndedRequest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,

    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A named task handed to this skill by another skill or flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub input: Map<String, Value>,
}

impl Task {
    /// Returns a task input as text. Numbers are rendered to strings.
    pub fn input_str(&self, key: &str) -> Option<String> {
        match self.input.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RequestEnvelope {
    /// Returns the kind of the wrapped request.
    pub fn kind(&self) -> RequestKind {
        RequestKind::from_type(&self.request.request_type)
    }

    /// Returns the request locale, if the platform sent one.
    pub fn locale(&self) -> Option<&str> {
        self.request.locale.as_deref()
    }

    /// True on the first turn of a session. Requests without a session are never new.
    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.new)
    }

    /// Intent name for intent requests.
    pub fn intent_name(&self) -> Option<&str> {
        if self.kind() != RequestKind::Intent {
            return None;
        }
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Named slot on the current intent. A slot the guest left unfilled is
    /// present with no `value`.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.request.intent.as_ref()?.slots.get(name)
    }

    /// Id of the component that raised a visual user event.
    pub fn event_source_id(&self) -> Option<&str> {
        self.request.source.as_ref()?.id.as_deref()
    }

    /// Persistent unit identifier from the device context.
    pub fn persistent_unit_id(&self) -> Option<&str> {
        self.context.system.unit.as_ref()?.persistent_unit_id.as_deref()
    }

    /// True when the device advertises the visual template interface.
    pub fn supports_apl(&self) -> bool {
        self.context
            .system
            .device
            .as_ref()
            .is_some_and(|d| d.supported_interfaces.contains_key(APL_INTERFACE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_json() -> &'static str {
        r#"{
            "version": "1.0",
            "session": { "new": true, "sessionId": "s-1", "attributes": {} },
            "context": {
                "System": {
                    "device": {
                        "deviceId": "d-1",
                        "supportedInterfaces": { "Alexa.Presentation.APL": { "runtime": { "maxVersion": "2023.1" } } }
                    },
                    "unit": { "unitId": "u-1", "persistentUnitId": "pu-42" }
                }
            },
            "request": { "type": "LaunchRequest", "requestId": "r-1", "locale": "en-US" }
        }"#
    }

    #[test]
    fn test_parse_launch_envelope() {
        let envelope: RequestEnvelope = serde_json::from_str(launch_json()).unwrap();
        assert_eq!(envelope.kind(), RequestKind::Launch);
        assert_eq!(envelope.locale(), Some("en-US"));
        assert!(envelope.is_new_session());
        assert!(envelope.supports_apl());
        assert_eq!(envelope.persistent_unit_id(), Some("pu-42"));
        assert!(envelope.intent_name().is_none());
    }

    #[test]
    fn test_missing_session_is_not_new() {
        let envelope: RequestEnvelope =
            serde_json::from_str(r#"{ "request": { "type": "SessionEndedRequest" } }"#).unwrap();
        assert!(envelope.session.is_none());
        assert!(!envelope.is_new_session());
        assert!(!envelope.supports_apl());
        assert_eq!(envelope.kind(), RequestKind::SessionEnded);
    }

    #[test]
    fn test_intent_slot_lookup() {
        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{
                "request": {
                    "type": "IntentRequest",
                    "intent": { "name": "RatingIntent", "slots": {
                        "rating": { "name": "rating", "value": "2" },
                        "stay": { "name": "stay" }
                    } }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(envelope.intent_name(), Some("RatingIntent"));
        assert_eq!(envelope.slot("rating").and_then(|s| s.value.as_deref()), Some("2"));
        assert_eq!(envelope.slot("stay").map(|s| s.value.is_none()), Some(true));
        assert!(envelope.slot("missing").is_none());
    }

    #[test]
    fn test_task_input_accepts_numbers_and_strings() {
        let task: Task = serde_json::from_str(
            r#"{ "name": "rate", "input": { "rating": 7, "unitId": "pu-1", "flag": true } }"#,
        )
        .unwrap();
        assert_eq!(task.input_str("rating").as_deref(), Some("7"));
        assert_eq!(task.input_str("unitId").as_deref(), Some("pu-1"));
        assert_eq!(task.input_str("flag"), None);
    }

    #[test]
    fn test_unknown_request_type() {
        assert_eq!(RequestKind::from_type("Connections.Response"), RequestKind::Unknown);
        assert_eq!(RequestKind::from_type(USER_EVENT_REQUEST), RequestKind::UserEvent);
    }
}
