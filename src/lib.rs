//! votefeed: a Zellij plugin for browsing an event/voting home feed.
//!
//! The plugin shows the feed as a table with status tabs, search, hashtag
//! filtering and sort controls. It pages through the list API on demand
//! (infinite scroll) and labels each event with a live countdown.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← host I/O
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - handle_event, store + reducer                    │
//! │  - pagination, timers, system parameters            │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Storage Layer │
//! │ (ui/)         │   │ (api/)        │   │ (storage/)    │
//! │ - View models │   │ - URLs        │   │ - Preferences │
//! │ - ANSI render │   │ - Envelopes   │   │ - JSON file   │
//! │ - Themes      │   │ - Mapping     │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), Query (query/), i18n             │
//! │  - EventSummary, status, currency, countdowns       │
//! │  - search / filter / sort                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/votefeed.wasm" {
//!         api_base_url "https://vote.example.org/api"
//!         page_size "20"
//!         search_debounce_ms "300"
//!         system_refresh_secs "60"
//!         theme "light"
//!         locale_file "~/.config/votefeed/fr.toml"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use votefeed::storage::MemoryPreferences;
//! use votefeed::{handle_event, initialize, Action, Config, Event};
//!
//! let config = Config::from_zellij(&BTreeMap::new());
//! let mut state = initialize(&config, &MemoryPreferences::default())?;
//!
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true }, chrono::Utc::now())?;
//! assert!(actions.iter().any(|a| matches!(a, Action::Fetch(_))));
//! # Ok::<(), votefeed::FeedError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod i18n;
pub mod infrastructure;
pub mod query;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppSettings, AppState, Event, InputMode, SearchFocus};
pub use domain::{EventStatus, EventSummary, FeedError, Result};
pub use ui::Theme;

use app::FeedAction;
use chrono::Duration;
use i18n::Catalog;
use std::collections::BTreeMap;
use std::str::FromStr;
use storage::{PreferenceStore, ThemePreference, HOME_SCROLL_Y, PREFERRED_THEME};

/// Default API endpoint, a local development server.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Largest page the list API accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Upper bound of `search_debounce_ms`.
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 10_000;

/// Upper bound of `system_refresh_secs`: one day.
pub const MAX_SYSTEM_REFRESH_SECS: u64 = 86_400;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,

    /// Items per page, 1 to [`MAX_PAGE_SIZE`]. Default: 20
    pub page_size: usize,

    /// Quiet period before typed search text is applied, at most
    /// [`MAX_SEARCH_DEBOUNCE_MS`]. Default: 300
    pub search_debounce_ms: u64,

    /// System parameter refresh period, at most [`MAX_SYSTEM_REFRESH_SECS`];
    /// 0 disables it. Default: 0
    pub system_refresh_secs: u64,

    /// Forces a built-in theme. When unset, the stored preference applies.
    pub theme: Option<ThemePreference>,

    /// Custom TOML theme, see [`ui::theme`]. Takes precedence over `theme`
    /// for colors; the light/dark toggle still switches to built-ins.
    pub theme_file: Option<String>,

    /// TOML translation catalog, see [`i18n`].
    pub locale_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: app::DEFAULT_PAGE_SIZE,
            search_debounce_ms: 300,
            system_refresh_secs: 0,
            theme: None,
            theme_file: None,
            locale_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses the Zellij configuration map.
    ///
    /// Unknown keys are ignored. A value that does not parse falls back to
    /// its default with a warning; the plugin never refuses to load over a
    /// bad option.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use votefeed::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "500".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.page_size, 100);
    /// assert_eq!(config.search_debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let theme = text("theme").and_then(|value| match value.to_ascii_lowercase().as_str() {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            other => {
                tracing::warn!(value = other, "unknown theme option, using stored preference");
                None
            }
        });

        Self {
            api_base_url: text("api_base_url").unwrap_or(defaults.api_base_url),
            page_size: parse_or(config, "page_size", defaults.page_size).clamp(1, MAX_PAGE_SIZE),
            search_debounce_ms: parse_or(config, "search_debounce_ms", defaults.search_debounce_ms)
                .min(MAX_SEARCH_DEBOUNCE_MS),
            system_refresh_secs: parse_or(config, "system_refresh_secs", defaults.system_refresh_secs)
                .min(MAX_SYSTEM_REFRESH_SECS),
            theme,
            theme_file: text("theme_file"),
            locale_file: text("locale_file"),
            trace_level: text("trace_level"),
        }
    }

    /// Runtime settings derived from the options.
    #[must_use]
    pub fn settings(&self) -> AppSettings {
        AppSettings {
            page_size: self.page_size,
            search_debounce: bounded(self.search_debounce_ms, MAX_SEARCH_DEBOUNCE_MS, Duration::try_milliseconds),
            system_refresh: (self.system_refresh_secs > 0)
                .then(|| bounded(self.system_refresh_secs, MAX_SYSTEM_REFRESH_SECS, Duration::try_seconds)),
        }
    }
}

/// Builds a duration from a count of `unit`s, capped at `max` units.
fn bounded(value: u64, max: u64, unit: fn(i64) -> Option<Duration>) -> Duration {
    let capped = i64::try_from(value.min(max)).unwrap_or(i64::MAX);
    unit(capped).unwrap_or_else(Duration::zero)
}

fn parse_or<T>(config: &BTreeMap<String, String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = config.get(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "invalid option value, using default");
        default
    })
}

/// Builds the initial application state.
///
/// Reads the stored theme and scroll row from `preferences`, loads the
/// optional translation catalog and custom theme, and prepares an empty
/// feed. Nothing is fetched until web access is granted.
///
/// A missing or broken catalog, theme file or preference entry is logged
/// and replaced by its default.
///
/// # Errors
///
/// Returns [`FeedError::Config`] if `api_base_url` is not a usable base URL.
pub fn initialize(config: &Config, preferences: &dyn PreferenceStore) -> Result<AppState> {
    let _span = tracing::info_span!("initialize", api = %config.api_base_url).entered();

    let client = api::ApiClient::new(&config.api_base_url)?;

    let theme_preference = config.theme.unwrap_or_else(|| {
        let stored = preferences.get(PREFERRED_THEME).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read theme preference");
            None
        });
        ThemePreference::from_stored(stored.as_deref())
    });

    let catalog = config.locale_file.as_deref().map_or_else(Catalog::default, |file| {
        Catalog::from_file(infrastructure::expand_tilde(file)).unwrap_or_else(|e| {
            tracing::warn!(locale_file = file, error = %e, "failed to load translations, using defaults");
            Catalog::default()
        })
    });

    let mut state = AppState::new(client, config.settings(), theme_preference, catalog);

    if let Some(file) = config.theme_file.as_deref() {
        match Theme::from_file(infrastructure::expand_tilde(file)) {
            Ok(theme) => state = state.with_theme(theme),
            Err(e) => tracing::warn!(theme_file = file, error = %e, "failed to load theme, using built-in"),
        }
    }

    let scroll_y = preferences
        .get(HOME_SCROLL_Y)
        .ok()
        .flatten()
        .and_then(|value| value.trim().parse::<usize>().ok());
    if let Some(row) = scroll_y {
        state.feed.apply(FeedAction::SetScrollY(row))?;
    }

    tracing::debug!(
        theme = theme_preference.as_str(),
        page_size = config.page_size,
        scroll_y = ?scroll_y,
        "plugin state initialized"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use storage::MemoryPreferences;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn options_are_parsed() {
        let config = Config::from_zellij(&map(&[
            ("api_base_url", " https://vote.example.org/api "),
            ("page_size", "0"),
            ("system_refresh_secs", "60"),
            ("theme", "Light"),
            ("trace_level", "votefeed=debug"),
        ]));

        assert_eq!(config.api_base_url, "https://vote.example.org/api");
        assert_eq!(config.page_size, 1);
        assert_eq!(config.theme, Some(ThemePreference::Light));
        assert_eq!(config.settings().system_refresh, Some(Duration::seconds(60)));
        assert_eq!(config.trace_level.as_deref(), Some("votefeed=debug"));
    }

    #[test]
    fn oversized_durations_are_capped() {
        let config = Config::from_zellij(&map(&[
            ("search_debounce_ms", "18446744073709551615"),
            ("system_refresh_secs", "18446744073709551615"),
        ]));

        assert_eq!(config.search_debounce_ms, MAX_SEARCH_DEBOUNCE_MS);
        assert_eq!(config.system_refresh_secs, MAX_SYSTEM_REFRESH_SECS);
        let settings = config.settings();
        assert_eq!(settings.search_debounce, Duration::seconds(10));
        assert_eq!(settings.system_refresh, Some(Duration::days(1)));
        assert!(initialize(&config, &MemoryPreferences::default()).is_ok());
    }

    #[test]
    fn settings_cap_values_set_directly() {
        let config = Config {
            search_debounce_ms: u64::MAX,
            system_refresh_secs: u64::MAX,
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.search_debounce, Duration::seconds(10));
        assert_eq!(settings.system_refresh, Some(Duration::days(1)));
    }

    #[test]
    fn zero_refresh_disables_it() {
        assert_eq!(Config::default().settings().system_refresh, None);
    }

    #[test]
    fn stored_preferences_seed_the_state() {
        let mut prefs = MemoryPreferences::default();
        prefs.set(PREFERRED_THEME, "light").unwrap();
        prefs.set(HOME_SCROLL_Y, "4").unwrap();

        let state = initialize(&Config::default(), &prefs).unwrap();
        assert_eq!(state.theme_preference, ThemePreference::Light);
        assert_eq!(state.theme.name, "light");
        assert_eq!(state.feed.state().scroll_y, 4);
    }

    #[test]
    fn configured_theme_overrides_the_stored_one() {
        let mut prefs = MemoryPreferences::default();
        prefs.set(PREFERRED_THEME, "light").unwrap();
        let config = Config {
            theme: Some(ThemePreference::Dark),
            ..Config::default()
        };

        assert_eq!(initialize(&config, &prefs).unwrap().theme_preference, ThemePreference::Dark);
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            initialize(&config, &MemoryPreferences::default()),
            Err(FeedError::Config(_))
        ));
    }

    #[test]
    fn missing_theme_file_falls_back() {
        let config = Config {
            theme_file: Some("/nonexistent/theme.toml".to_string()),
            ..Config::default()
        };
        let state = initialize(&config, &MemoryPreferences::default()).unwrap();
        assert_eq!(state.theme.name, "dark");
    }
}
