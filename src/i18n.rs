//! Translation lookup with `{{name}}` interpolation.
//!
//! Display strings are requested by key with an English default. The
//! [`Translate`] trait is the seam: [`DefaultTranslator`] renders the default
//! text, [`Catalog`] overrides templates from a TOML file, and any closure
//! with the right shape works too.
//!
//! # Catalog format
//!
//! ```toml
//! "countdown.starting_soon" = "Bientôt"
//! "countdown.ago.hours" = "il y a {{hours}} h"
//! ```

use crate::domain::error::{FeedError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Resolves a display string by key.
///
/// `params` are substituted into `{{name}}` placeholders of the resolved
/// template. Implementations must be pure and synchronous.
pub trait Translate {
    fn translate(&self, key: &str, default: &str, params: &[(&str, String)]) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str, &str, &[(&str, String)]) -> String,
{
    fn translate(&self, key: &str, default: &str, params: &[(&str, String)]) -> String {
        self(key, default, params)
    }
}

/// Renders the default text of every key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translate for DefaultTranslator {
    fn translate(&self, _key: &str, default: &str, params: &[(&str, String)]) -> String {
        interpolate(default, params)
    }
}

/// Key to template overrides, falling back to the default text.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: HashMap<String, String>,
}

impl Catalog {
    /// Parses a flat TOML table of `key = "template"` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the TOML is malformed or a value is
    /// not a string.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let templates: HashMap<String, String> = toml::from_str(contents)
            .map_err(|e| FeedError::Config(format!("invalid translation catalog: {e}")))?;
        Ok(Self { templates })
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`FeedError::Config`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str, default: &str, params: &[(&str, String)]) -> String {
        let template = self.templates.get(key).map_or(default, String::as_str);
        interpolate(template, params)
    }
}

/// Replaces `{{name}}` placeholders with their parameter values.
///
/// Placeholders without a matching parameter are left untouched.
///
/// # Examples
///
/// ```
/// use votefeed::i18n::interpolate;
///
/// let text = interpolate("{{hours}}h ago", &[("hours", "2".to_string())]);
/// assert_eq!(text, "2h ago");
/// ```
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{{{name}}}}}"), value)
    })
}
