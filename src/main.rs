//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the votefeed library and the Zellij
//! plugin system. Host events are translated into library events, the pure
//! handler decides what happens, and the returned actions are executed here
//! against the host API.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, open preferences, build `AppState`
//! 2. **Subscribe**: Register for Key, `WebRequestResult`, `Timer`, `PermissionRequestResult`
//! 3. **Permission granted**: First page and system parameters are requested
//! 4. **Update**: Handle events, delegate to library layer, execute actions
//! 5. **Render**: Call library render function
//!
//! # Event Mapping
//!
//! - `Key(..)` → navigation, search and feed commands (see below)
//! - `WebRequestResult` → `Event::HttpResponse`
//! - `Timer` → `Event::Tick`
//! - `PermissionRequestResult` → `Event::PermissionsResult`
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! In normal mode:
//! - `j`/`Down`: Move down (loads more near the end)
//! - `k`/`Up`: Move up
//! - `1`-`4`: All / Preheat / Ongoing / Completed
//! - `s`: Cycle sort field
//! - `o`: Toggle sort order
//! - `#`: Filter by the selected event's first hashtag (again to clear)
//! - `t`: Toggle dark/light theme
//! - `r`: Retry after an error
//! - `/`: Enter search mode
//! - `Esc`: Clear hashtag filter
//! - `q`: Close plugin
//!
//! In search mode:
//! - Characters are typed into the query
//! - `Enter`/`Down`: Move focus to the results
//! - `/`: Return to search input
//! - `Esc`: Exit search

#![allow(clippy::multiple_crate_versions)]

use chrono::Utc;
use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use votefeed::app::SearchFocus;
use votefeed::infrastructure::preferences_file;
use votefeed::query::StatusTab;
use votefeed::storage::{JsonPreferences, MemoryPreferences, PreferenceStore};
use votefeed::{handle_event, Action, Config, Event, InputMode};

register_plugin!(State);

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with host concerns: where preferences are
/// written and what to show when startup failed.
struct State {
    /// Core application state, absent until `load` succeeds.
    app: Option<votefeed::AppState>,

    /// Preference backend for `SavePreference` actions.
    prefs: Box<dyn PreferenceStore>,

    /// Startup failure shown instead of the feed.
    load_error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: None,
            prefs: Box::new(MemoryPreferences::default()),
            load_error: None,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// Requests `WebAccess`. Nothing is fetched until it is granted.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        votefeed::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(api = %config.api_base_url, page_size = config.page_size, "parsed configuration");

        self.prefs = match JsonPreferences::open(preferences_file()) {
            Ok(prefs) => Box::new(prefs),
            Err(e) => {
                tracing::warn!(error = %e, "preference file unavailable, using memory store");
                Box::new(MemoryPreferences::default())
            }
        };

        match votefeed::initialize(&config, self.prefs.as_ref()) {
            Ok(app) => {
                self.app = Some(app);
                tracing::debug!("app state initialized");
            }
            Err(e) => {
                tracing::error!(error = %e, "initialization failed");
                self.load_error = Some(e.to_string());
            }
        }

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::Timer,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let Some(app) = self.app.as_ref() else {
            return false;
        };

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key_event(app.input_mode, key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                tracing::debug!(status, bytes = body.len(), "web request result");
                Event::HttpResponse { status, body, context }
            }
            zellij_tile::prelude::Event::Timer(_) => Event::Tick,
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                let granted = matches!(status, PermissionStatus::Granted);
                if !granted {
                    tracing::warn!("web access denied - feed cannot load");
                }
                Event::PermissionsResult { granted }
            }
            _ => return false,
        };

        let Some(app) = self.app.as_mut() else {
            return false;
        };
        match handle_event(app, &our_event, Utc::now()) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    self.execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        match (&self.app, &self.load_error) {
            (Some(app), _) => votefeed::ui::render(app, rows, cols, Utc::now()),
            (None, Some(error)) => println!("votefeed failed to start: {error}"),
            (None, None) => {}
        }
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(mode: InputMode, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        if mode.is_typing() {
            return Some(match key.bare_key {
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter | BareKey::Down => Event::FocusResults,
                BareKey::Up => Event::KeyUp,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Esc => Event::ExitSearch,
            BareKey::Char('/') => match mode {
                InputMode::Normal => Event::SearchMode,
                InputMode::Search(_) => Event::FocusSearchBar,
            },
            BareKey::Char('q') if mode == InputMode::Normal => Event::CloseFocus,
            BareKey::Char('1') => Event::SelectStatus(StatusTab::All),
            BareKey::Char('2') => Event::SelectStatus(StatusTab::Preheat),
            BareKey::Char('3') => Event::SelectStatus(StatusTab::Ongoing),
            BareKey::Char('4') => Event::SelectStatus(StatusTab::Completed),
            BareKey::Char('s') => Event::CycleSortField,
            BareKey::Char('o') => Event::ToggleSortOrder,
            BareKey::Char('#') => Event::ToggleHashtagFilter,
            BareKey::Char('t') => Event::ToggleTheme,
            BareKey::Char('r') => Event::Retry,
            BareKey::Backspace if mode == InputMode::Search(SearchFocus::Navigating) => Event::FocusSearchBar,
            _ => return None,
        })
    }

    /// Executes an action returned from event handling.
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `Fetch`: GET through the host, context echoed back in the result
    /// - `ScheduleWakeup`: Host timer, delivered as `Timer`
    /// - `SavePreference`: Write through the preference store
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Fetch(request) => {
                tracing::debug!(url = %request.url, "fetching");
                let mut headers = BTreeMap::new();
                headers.insert("Accept".to_string(), "application/json".to_string());
                web_request(&request.url, HttpVerb::Get, headers, vec![], request.context.clone());
            }
            Action::ScheduleWakeup { after } => {
                set_timeout(after.as_secs_f64());
            }
            Action::SavePreference { key, value } => {
                if let Err(e) = self.prefs.set(key, value) {
                    tracing::warn!(error = %e, key = %key, "failed to save preference");
                }
            }
        }
    }
}
