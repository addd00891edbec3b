//! Translation bundle data types and parser.
//!
//! A bundle is a YAML document mapping translation keys to either a single
//! string or a list of candidate strings:
//!
//! ```text
//! HELP_PROMPT: You can rate your stay from one to five.
//! POSITIVE_PROMPT:
//!   - Wonderful, thank you!
//!   - We are glad you enjoyed your stay.
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// The value a translation key maps to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    /// A literal string or printf-style template.
    Text(String),
    /// Candidates; one is picked at random per lookup.
    Choices(Vec<String>),
}

/// Where a bundle was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleSource {
    /// Compiled into the binary.
    BuiltIn,
    /// Loaded from a filesystem path.
    File(PathBuf),
}

/// All translations for one locale.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    /// Locale tag, e.g. `en-US`.
    pub locale: String,
    pub source: BundleSource,
    pub entries: HashMap<String, Translation>,
}

impl LocaleBundle {
    /// Parses a YAML bundle document.
    pub fn parse(
        locale: impl Into<String>,
        source: BundleSource,
        raw: &str,
    ) -> Result<Self, serde_yaml::Error> {
        let entries = if raw.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yaml::from_str(raw)?
        };
        Ok(Self {
            locale: locale.into(),
            source,
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.entries.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_and_choices() {
        let raw = r"
HELP_PROMPT: Say a number from one to five.
POSITIVE_PROMPT:
  - Wonderful!
  - Thank you!
";
        let bundle = LocaleBundle::parse("en-US", BundleSource::BuiltIn, raw).unwrap();
        assert_eq!(
            bundle.get("HELP_PROMPT"),
            Some(&Translation::Text("Say a number from one to five.".to_string()))
        );
        assert_eq!(
            bundle.get("POSITIVE_PROMPT"),
            Some(&Translation::Choices(vec![
                "Wonderful!".to_string(),
                "Thank you!".to_string()
            ]))
        );
        assert!(bundle.get("MISSING").is_none());
    }

    #[test]
    fn test_empty_document() {
        let bundle = LocaleBundle::parse("fr-FR", BundleSource::BuiltIn, "\n").unwrap();
        assert!(bundle.entries.is_empty());
    }

    #[test]
    fn test_invalid_document() {
        let raw = "HELP_PROMPT: [unclosed";
        assert!(LocaleBundle::parse("en-US", BundleSource::BuiltIn, raw).is_err());
    }

    #[test]
    fn test_nested_maps_are_rejected() {
        let raw = "HELP_PROMPT:\n  nested: value\n";
        assert!(LocaleBundle::parse("en-US", BundleSource::BuiltIn, raw).is_err());
    }
}
