//! Response types: what a handler produces and what goes back on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An instruction for the device's visual renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    /// Display a template document bound to a datasource.
    #[serde(rename = "Alexa.Presentation.APL.RenderDocument")]
    RenderDocument {
        token: String,
        document: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datasources: Option<Value>,
    },

    /// Run commands against an already rendered document.
    #[serde(rename = "Alexa.Presentation.APL.ExecuteCommands")]
    ExecuteCommands { token: String, commands: Vec<Value> },
}

/// The response a handler composes for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDescription {
    /// Spoken text.
    pub speech: Option<String>,

    /// Text spoken again if the guest says nothing.
    pub reprompt: Option<String>,

    pub directives: Vec<Directive>,

    /// `None` leaves the decision to the platform.
    pub should_end_session: Option<bool>,
}

impl ResponseDescription {
    /// Creates an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spoken text.
    #[must_use]
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    /// Sets the reprompt text. A reprompt keeps the session open.
    #[must_use]
    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self.should_end_session = Some(false);
        self
    }

    #[must_use]
    pub fn with_should_end_session(mut self, end: bool) -> Self {
        self.should_end_session = Some(end);
        self
    }

    /// Appends a visual directive.
    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Appends a visual directive in place.
    pub fn add_directive(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    /// Wraps the description in the wire envelope.
    pub fn into_envelope(self, session_attributes: Map<String, Value>) -> ResponseEnvelope {
        ResponseEnvelope {
            version: "1.0".to_string(),
            session_attributes,
            response: ResponseBody {
                output_speech: self.speech.map(|s| OutputSpeech::ssml(&s)),
                reprompt: self.reprompt.map(|s| Reprompt {
                    output_speech: OutputSpeech::ssml(&s),
                }),
                directives: self.directives,
                should_end_session: self.should_end_session,
            },
        }
    }
}

/// The response envelope returned to the host platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,

    #[serde(default)]
    pub session_attributes: Map<String, Value>,

    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub ssml: String,
}

impl OutputSpeech {
    /// Wraps text in a single `<speak>` element, replacing any the text already has.
    pub fn ssml(text: &str) -> Self {
        let inner = text.trim();
        let inner = inner.strip_prefix("<speak>").unwrap_or(inner);
        let inner = inner.strip_suffix("</speak>").unwrap_or(inner);
        Self {
            speech_type: "SSML".to_string(),
            ssml: format!("<speak>{inner}</speak>"),
        }
    }

    /// The spoken text without the `<speak>` wrapper.
    pub fn text(&self) -> &str {
        self.ssml
            .strip_prefix("<speak>")
            .and_then(|s| s.strip_suffix("</speak>"))
            .unwrap_or(&self.ssml)
    }
}
