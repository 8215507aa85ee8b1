//! Preference keys and their typed values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the light/dark theme preference.
pub const PREFERRED_THEME: &str = "PREFERRED_THEME";

/// Key of the retained home feed selection row.
pub const HOME_SCROLL_Y: &str = "HOME_SCROLL_Y";

/// Stored theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Reads a stored value. Anything other than `light`/`dark` is dark.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => Self::Light,
            Some("dark") => Self::Dark,
            Some(other) => {
                tracing::debug!(value = other, "unknown theme preference, using dark");
                Self::Dark
            }
            None => Self::Dark,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// On-disk layout of the preference file.
///
/// ```json
/// { "version": 1, "values": { "PREFERRED_THEME": "light" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceFile {
    pub version: u32,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Default for PreferenceFile {
    fn default() -> Self {
        Self {
            version: 1,
            values: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_values() {
        assert_eq!(ThemePreference::from_stored(Some("light")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some(" Dark ")), ThemePreference::Dark);
        assert_eq!(ThemePreference::from_stored(Some("sepia")), ThemePreference::Dark);
        assert_eq!(ThemePreference::from_stored(None), ThemePreference::Dark);
        assert_eq!(ThemePreference::Light.toggled().as_str(), "dark");
    }
}
