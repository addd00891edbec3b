//! Visual template directives for devices with a screen.

use serde_json::{Value, json};
use stayscore_proto::{Directive, RATING_EVENT_SOURCE, RatingOutcome};

/// Token of the rating document; commands must target it.
pub const RATING_TOKEN: &str = "hotelRatingToken";
pub const FEEDBACK_TOKEN: &str = "hotelFeedbackToken";

const RATING_DOCUMENT_RAW: &str = include_str!("../data/apl/rating.json");
const RATING_DATA_RAW: &str = include_str!("../data/apl/ratingdata.json");
const FEEDBACK_DOCUMENT_RAW: &str = include_str!("../data/apl/feedback.json");

/// Parsed visual documents, loaded once at startup.
#[derive(Debug, Clone)]
pub struct VisualTemplates {
    rating_document: Value,
    rating_data: Value,
    feedback_document: Value,
}

impl VisualTemplates {
    /// Parses the bundled documents.
    pub fn load() -> Result<Self, serde_json::Error> {
        Ok(Self {
            rating_document: serde_json::from_str(RATING_DOCUMENT_RAW)?,
            rating_data: serde_json::from_str(RATING_DATA_RAW)?,
            feedback_document: serde_json::from_str(FEEDBACK_DOCUMENT_RAW)?,
        })
    }

    /// Renders the star rating widget with the default payload.
    pub fn rating_document(&self) -> Directive {
        Directive::RenderDocument {
            token: RATING_TOKEN.to_string(),
            document: self.rating_document.clone(),
            datasources: Some(json!({ "payload": self.rating_data })),
        }
    }

    /// Moves the rating widget to `rating` stars.
    pub fn set_rating(&self, rating: i64) -> Directive {
        Directive::ExecuteCommands {
            token: RATING_TOKEN.to_string(),
            commands: vec![json!({
                "type": "SetValue",
                "componentId": RATING_EVENT_SOURCE,
                "property": "ratingNumber",
                "value": rating,
            })],
        }
    }

    /// Feedback screen for an outcome. Neutral outcomes have none.
    pub fn feedback(&self, outcome: RatingOutcome) -> Option<Directive> {
        let (mood, icon, message) = match outcome {
            RatingOutcome::Negative => ("sad", "\u{1F61E}", "We're sorry to hear that"),
            RatingOutcome::Positive => ("happy", "\u{1F600}", "Thank you!"),
            RatingOutcome::Neutral => return None,
        };
        Some(Directive::RenderDocument {
            token: FEEDBACK_TOKEN.to_string(),
            document: self.feedback_document.clone(),
            datasources: Some(json!({
                "payload": { "feedback": { "mood": mood, "icon": icon, "message": message } }
            })),
        })
    }
}

/// Reads the mood out of a feedback directive.
pub fn feedback_mood(directive: &Directive) -> Option<&str> {
    match directive {
        Directive::RenderDocument {
            token, datasources, ..
        } if token == FEEDBACK_TOKEN => datasources.as_ref()?["payload"]["feedback"]["mood"].as_str(),
        _ => None,
    }
}
