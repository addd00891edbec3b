//! Localized text for spoken prompts and staff messages.
//!
//! Bundles are resolved per request from the request locale. A [`Translator`]
//! bound to the resolved bundle is stored on the request attributes.

mod bundle;
mod format;
mod registry;

pub use bundle::{BundleSource, LocaleBundle, Translation};
pub use format::sprintf;
pub use registry::LocaleRegistry;

use rand::seq::SliceRandom;
use std::fmt::Display;
use std::sync::Arc;

/// Looks up translation keys in one locale bundle.
#[derive(Debug, Clone)]
pub struct Translator {
    bundle: Option<Arc<LocaleBundle>>,
    fallback: Option<Arc<LocaleBundle>>,
}

impl Translator {
    /// Creates a translator. Keys missing from `bundle` are looked up in `fallback`.
    pub fn new(bundle: Option<Arc<LocaleBundle>>, fallback: Option<Arc<LocaleBundle>>) -> Self {
        Self { bundle, fallback }
    }

    /// Locale of the bound bundle.
    pub fn locale(&self) -> Option<&str> {
        self.bundle.as_deref().map(|b| b.locale.as_str())
    }

    /// Translates `key` without arguments.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }

    /// Translates `key`, substituting printf-style `args`.
    ///
    /// A key mapped to a list yields one entry chosen uniformly at random.
    /// Unknown keys translate to the key itself.
    pub fn translate(&self, key: &str, args: &[&dyn Display]) -> String {
        let found = self
            .bundle
            .as_deref()
            .and_then(|b| b.get(key))
            .or_else(|| self.fallback.as_deref().and_then(|b| b.get(key)));

        let template = match found {
            Some(Translation::Text(text)) => text.as_str(),
            Some(Translation::Choices(choices)) => {
                match choices.choose(&mut rand::thread_rng()) {
                    Some(choice) => choice.as_str(),
                    None => key,
                }
            }
            None => key,
        };

        sprintf(template, args)
    }
}
