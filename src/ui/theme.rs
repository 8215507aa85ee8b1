//! Themes and ANSI escape sequence generation.
//!
//! Two built-in themes match the stored theme preference: `light` and
//! `dark` (the default). A custom palette can be loaded from a TOML file:
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! tab_active_fg = "#1e1e2e"
//! tab_active_bg = "#89b4fa"
//! # ... every field of `ThemeColors`
//! ```

use crate::domain::error::{FeedError, Result};
use crate::domain::EventStatus;
use crate::storage::ThemePreference;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub tab_active_fg: String,
    pub tab_active_bg: String,
    pub tab_inactive_fg: String,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    pub text_dim: String,
    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    pub tag_fg: String,
    pub reward_fg: String,
    pub error_fg: String,

    pub status_preheat_fg: String,
    pub status_active_fg: String,
    pub status_completed_fg: String,
}

impl Theme {
    /// Loads a built-in theme: `light` or `dark`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "light" => include_str!("../../themes/light.toml"),
            "dark" => include_str!("../../themes/dark.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Built-in theme for a stored preference.
    #[must_use]
    pub fn for_preference(preference: ThemePreference) -> Self {
        Self::from_name(preference.as_str()).unwrap_or_default()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FeedError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| FeedError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Foreground color for an event's lifecycle status.
    #[must_use]
    pub fn status_fg(&self, status: EventStatus) -> &str {
        match status {
            EventStatus::Preheat => &self.colors.status_preheat_fg,
            EventStatus::Active => &self.colors.status_active_fg,
            EventStatus::Completed => &self.colors.status_completed_fg,
        }
    }

    /// Parses `#rrggbb`, falling back to white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// The built-in dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the bundled dark theme fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::from_name("dark").expect("bundled dark theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn bundled_themes_parse() {
        assert_eq!(Theme::from_name("light").unwrap().name, "light");
        assert_eq!(Theme::from_name("dark").unwrap().name, "dark");
        assert!(Theme::from_name("sepia").is_none());
    }

    #[test]
    fn preference_selects_theme() {
        assert_eq!(Theme::for_preference(ThemePreference::Light).name, "light");
        assert_eq!(Theme::for_preference(ThemePreference::Dark).name, "dark");
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("bad"), "\u{1b}[48;2;255;255;255m");
    }

    #[test]
    fn custom_theme_file() {
        let file = NamedTempFile::new().unwrap();
        let toml = include_str!("../../themes/light.toml").replace("name = \"light\"", "name = \"mine\"");
        std::fs::write(file.path(), toml).unwrap();
        assert_eq!(Theme::from_file(file.path()).unwrap().name, "mine");

        std::fs::write(file.path(), "name = 1").unwrap();
        assert!(matches!(Theme::from_file(file.path()), Err(FeedError::Theme(_))));
    }
}
