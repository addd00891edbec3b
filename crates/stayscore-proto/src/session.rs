//! Typed view over the session attributes the platform persists between turns.

use crate::ProtoError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Session-scoped state read and written by interceptors and handlers.
///
/// Serializes to the platform's attribute map using the keys `puid` and
/// `unit_name`. Attributes this skill does not own are carried through
/// untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Persistent unit identifier of the room the guest is in.
    #[serde(rename = "puid", default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,

    /// Display name resolved for `unit_id`.
    #[serde(rename = "unit_name", default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionState {
    /// Builds the typed state from a raw attribute map.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, ProtoError> {
        serde_json::from_value(Value::Object(attributes.clone()))
            .map_err(|e| ProtoError::SessionAttributes(e.to_string()))
    }

    /// Renders the state back into the platform's attribute map.
    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut attributes = self.extra.clone();
        if let Some(id) = &self.unit_id {
            attributes.insert("puid".to_string(), Value::String(id.clone()));
        }
        if let Some(name) = &self.unit_name {
            attributes.insert("unit_name".to_string(), Value::String(name.clone()));
        }
        attributes
    }

    /// Stores a resolved unit. Both fields are written together.
    pub fn record_unit(&mut self, unit_id: impl Into<String>, unit_name: impl Into<String>) {
        self.unit_id = Some(unit_id.into());
        self.unit_name = Some(unit_name.into());
    }

    /// Unit name for message templates; empty when unresolved.
    pub fn unit_name_or_empty(&self) -> &str {
        self.unit_name.as_deref().unwrap_or("")
    }
}
