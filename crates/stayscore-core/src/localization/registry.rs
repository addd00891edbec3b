//! Locale registry for discovering, storing and resolving translation bundles.
//!
//! The registry manages both built-in bundles (compiled into the binary) and
//! operator-provided bundles (discovered from a configured directory).

use super::bundle::{BundleSource, LocaleBundle};
use super::Translator;
use crate::config::SkillSection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Built-in US English strings.
const EN_US_RAW: &str = include_str!("../../data/locales/en-US.yml");

/// Built-in Canadian English strings.
const EN_CA_RAW: &str = include_str!("../../data/locales/en-CA.yml");

/// Registry of all translation bundles, keyed by normalized locale tag.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    bundles: HashMap<String, Arc<LocaleBundle>>,
    default_locale: String,
}

/// Lower-cases a tag and uses `-` as the separator.
fn normalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

fn language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

impl LocaleRegistry {
    /// Create an empty registry.
    pub fn new(default_locale: &str) -> Self {
        Self {
            bundles: HashMap::new(),
            default_locale: default_locale.to_string(),
        }
    }

    /// Create a registry holding the built-in bundles.
    pub fn with_builtins(default_locale: &str) -> Result<Self, serde_yaml::Error> {
        let mut registry = Self::new(default_locale);
        registry.register_builtin("en-US", EN_US_RAW)?;
        registry.register_builtin("en-CA", EN_CA_RAW)?;
        Ok(registry)
    }

    /// Build the registry from configuration: built-ins, then `locales_dir`.
    pub fn from_config(config: &SkillSection) -> Result<Self, serde_yaml::Error> {
        let mut registry = Self::with_builtins(&config.default_locale)?;
        if let Some(dir) = &config.locales_dir {
            registry.scan_directory(dir);
        }
        Ok(registry)
    }

    /// Register a built-in bundle from raw YAML.
    pub fn register_builtin(&mut self, locale: &str, raw: &str) -> Result<(), serde_yaml::Error> {
        let bundle = LocaleBundle::parse(locale, BundleSource::BuiltIn, raw)?;
        self.insert(bundle);
        Ok(())
    }

    fn insert(&mut self, bundle: LocaleBundle) {
        self.bundles.insert(normalize(&bundle.locale), Arc::new(bundle));
    }

    /// Scan a directory for `<locale>.yml` / `<locale>.yaml` bundles.
    ///
    /// A file for a locale that is already registered replaces it. Files that
    /// cannot be read or parsed are skipped with a warning.
    pub fn scan_directory(&mut self, dir: &Path) {
        if !dir.is_dir() {
            warn!("Locales path is not a directory: {}", dir.display());
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read locales directory {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|e| e == "yml" || e == "yaml");
            if !path.is_file() || !is_yaml {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = match std::fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Failed to read locale file {}: {}", path.display(), e);
                    continue;
                }
            };

            match LocaleBundle::parse(locale, BundleSource::File(path.clone()), &raw) {
                Ok(bundle) => {
                    debug!("Loaded locale bundle {} from {}", locale, path.display());
                    self.insert(bundle);
                }
                Err(e) => warn!("Skipping invalid locale file {}: {}", path.display(), e),
            }
        }
    }

    /// Finds the bundle for a locale: exact tag, then same language, then default.
    pub fn bundle_for(&self, locale: Option<&str>) -> Option<Arc<LocaleBundle>> {
        if let Some(locale) = locale {
            let wanted = normalize(locale);
            if let Some(bundle) = self.bundles.get(&wanted) {
                return Some(Arc::clone(bundle));
            }

            let lang = language(&wanted);
            let mut same_language: Vec<_> = self
                .bundles
                .iter()
                .filter(|(tag, _)| language(tag) == lang)
                .collect();
            // Deterministic pick when several regional bundles share the language.
            same_language.sort_by(|a, b| a.0.cmp(b.0));
            if let Some((_, bundle)) = same_language.first() {
                return Some(Arc::clone(bundle));
            }
        }
        self.default_bundle()
    }

    pub fn default_bundle(&self) -> Option<Arc<LocaleBundle>> {
        self.bundles.get(&normalize(&self.default_locale)).cloned()
    }

    /// Returns a translator bound to the best bundle for `locale`.
    pub fn translator(&self, locale: Option<&str>) -> Translator {
        Translator::new(self.bundle_for(locale), self.default_bundle())
    }

    /// Returns all registered locale tags, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.bundles.values().map(|b| b.locale.clone()).collect();
        tags.sort();
        tags
    }
}
