//! Application state and view model computation.
//!
//! [`AppState`] bundles the feed orchestrator, the system parameter store and
//! the timer scheduler with the transient UI state: input mode, selection,
//! theme and translations. It is the single source of truth the event
//! handler mutates and the renderer reads.
//!
//! # Derived state
//!
//! The list on screen is never stored. [`AppState::visible_events`] derives
//! it from the loaded items on every call: status tab, then hashtag, then
//! the settled search term, then the sort. The selection is an index into
//! that derived list and is clamped, never wrapped.
//!
//! # Example
//!
//! ```
//! use votefeed::api::ApiClient;
//! use votefeed::app::{AppSettings, AppState};
//! use votefeed::i18n::Catalog;
//! use votefeed::storage::ThemePreference;
//!
//! let client = ApiClient::new("https://example.org/api")?;
//! let state = AppState::new(client, AppSettings::default(), ThemePreference::Dark, Catalog::default());
//! let vm = state.compute_viewmodel(24, 100, chrono::Utc::now());
//! assert!(vm.rows.is_empty());
//! # Ok::<(), votefeed::FeedError>(())
//! ```

use super::feed::{HomeFeed, DEFAULT_PAGE_SIZE};
use super::modes::{InputMode, SearchFocus};
use super::store::LoadState;
use super::system::SystemParamsStore;
use super::timers::Scheduler;
use crate::api::ApiClient;
use crate::domain::currency::display_btc;
use crate::domain::{format_countdown, EventSummary};
use crate::i18n::{Catalog, Translate};
use crate::query::{filter_by_hashtag, filter_by_search, filter_by_status, sort_events, SortField, SortOrder, StatusTab};
use crate::storage::ThemePreference;
use crate::ui::components::{CHROME_ROWS, SEARCH_BAR_ROWS};
use crate::ui::helpers::match_ranges;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    ColumnHeaders, EmptyState, EventRow, FooterInfo, HeaderInfo, SearchBarInfo, StatusLine, TabInfo, UIViewModel,
};
use chrono::{DateTime, Duration, Utc};

/// System parameter naming the site, shown as the header title.
pub const SITE_NAME_PARAM: &str = "site_name";

/// Runtime knobs resolved from the plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
    /// `None` disables periodic system parameter refresh.
    pub system_refresh: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::milliseconds(300),
            system_refresh: None,
        }
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub feed: HomeFeed,
    pub system: SystemParamsStore,
    pub scheduler: Scheduler,
    pub settings: AppSettings,

    /// Display string overrides; defaults are English.
    pub catalog: Catalog,

    pub theme: Theme,

    /// Persisted light/dark choice. `theme` follows it on toggle.
    pub theme_preference: ThemePreference,

    pub input_mode: InputMode,

    /// Zero-based index into [`AppState::visible_events`].
    pub selected_index: usize,
}

impl AppState {
    /// Creates a state with an empty feed and the built-in theme for
    /// `theme_preference`.
    #[must_use]
    pub fn new(client: ApiClient, settings: AppSettings, theme_preference: ThemePreference, catalog: Catalog) -> Self {
        Self {
            feed: HomeFeed::new(client.clone(), settings.page_size),
            system: SystemParamsStore::new(client),
            scheduler: Scheduler::new(),
            settings,
            catalog,
            theme: Theme::for_preference(theme_preference),
            theme_preference,
            input_mode: InputMode::Normal,
            selected_index: 0,
        }
    }

    /// Replaces the built-in theme with a custom one.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Switches between light and dark, returning the new preference.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme_preference = self.theme_preference.toggled();
        self.theme = Theme::for_preference(self.theme_preference);
        tracing::debug!(theme = self.theme_preference.as_str(), "theme toggled");
        self.theme_preference
    }

    /// The loaded items as shown: status tab, hashtag and settled search
    /// applied, then sorted.
    #[must_use]
    pub fn visible_events(&self) -> Vec<EventSummary> {
        let feed = self.feed.state();
        let narrowed = filter_by_status(&feed.events, feed.status);
        let tagged = filter_by_hashtag(&narrowed, feed.active_hashtag.as_deref());
        let searched = filter_by_search(&tagged, &feed.debounced_search);
        sort_events(&searched, feed.sort_field, feed.sort_order)
    }

    #[must_use]
    pub fn selected_event(&self) -> Option<EventSummary> {
        self.visible_events().into_iter().nth(self.selected_index)
    }

    /// Moves the selection down one row. Returns `false` at the last row.
    pub fn move_selection_down(&mut self) -> bool {
        let len = self.visible_events().len();
        if self.selected_index + 1 < len {
            self.selected_index += 1;
            true
        } else {
            false
        }
    }

    /// Moves the selection up one row. Returns `false` at the first row.
    pub fn move_selection_up(&mut self) -> bool {
        if self.selected_index == 0 {
            return false;
        }
        self.selected_index -= 1;
        true
    }

    /// Keeps the selection inside the visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_events().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Moves the selection back to the retained scroll row, clamped to the
    /// visible list.
    pub fn restore_selection(&mut self) {
        self.selected_index = self.feed.state().scroll_y;
        self.clamp_selection();
    }

    /// Computes a renderable view model for a pane of `rows` x `cols`.
    ///
    /// The table window is centered on the selection and slides to fill
    /// the pane near either end of the list.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize, now: DateTime<Utc>) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", rows, cols).entered();

        let visible = self.visible_events();
        let feed = self.feed.state();
        let selected = self.selected_index.min(visible.len().saturating_sub(1));

        let available_rows = self.available_rows(rows);
        let mut visible_start = selected.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(visible.len());
        if visible_end - visible_start < available_rows && visible.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let query = feed.debounced_search.trim();
        let event_rows = visible[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative, event)| self.compute_row(event, visible_start + relative == selected, query, now))
            .collect();

        let empty_state = (visible.is_empty() && feed.load == LoadState::Idle && !feed.has_more)
            .then(|| self.compute_empty_state());

        UIViewModel {
            header: self.compute_header(),
            tabs: self.compute_tabs(),
            search_bar: self.compute_search_bar(),
            columns: self.compute_columns(),
            rows: event_rows,
            selected_index: selected.saturating_sub(visible_start),
            status_line: self.compute_status_line(),
            footer: self.compute_footer(),
            empty_state,
        }
    }

    fn t(&self, key: &str, default: &str) -> String {
        self.catalog.translate(key, default, &[])
    }

    fn compute_row(&self, event: &EventSummary, is_selected: bool, query: &str, now: DateTime<Utc>) -> EventRow {
        EventRow {
            title: event.title.clone(),
            tags: event.hashtags.join(" "),
            reward: display_btc(&event.total_reward_btc),
            participants: event.participants_count.to_string(),
            countdown: format_countdown(event, now, &self.catalog),
            status: event.status,
            is_selected,
            highlight_ranges: match_ranges(&event.title, query),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let feed = self.feed.state();

        let title = self
            .system
            .config()
            .and_then(|config| config.get_str(SITE_NAME_PARAM))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.t("header.title", "Vote Feed"));

        let sort = match feed.sort_field {
            SortField::Time => self.t("sort.time", "time"),
            SortField::Bounty => self.t("sort.bounty", "bounty"),
            SortField::Participation => self.t("sort.participation", "participation"),
        };
        let order = match feed.sort_order {
            SortOrder::Asc => self.t("order.asc", "↑"),
            SortOrder::Desc => self.t("order.desc", "↓"),
        };

        let mut summary = self.catalog.translate(
            "header.summary",
            "{{loaded}}/{{total}} loaded · by {{sort}} {{order}}",
            &[
                ("loaded", feed.events.len().to_string()),
                ("total", feed.total.to_string()),
                ("sort", sort),
                ("order", order),
            ],
        );
        if let Some(hashtag) = &feed.active_hashtag {
            summary.push_str(" · ");
            summary.push_str(&self.catalog.translate(
                "header.hashtag",
                "filter {{hashtag}}",
                &[("hashtag", hashtag.clone())],
            ));
        }

        HeaderInfo { title, summary }
    }

    fn compute_tabs(&self) -> Vec<TabInfo> {
        let active = self.feed.state().status;
        StatusTab::ALL_TABS
            .iter()
            .map(|&tab| {
                let label = match tab {
                    StatusTab::All => self.t("tab.all", "All"),
                    StatusTab::Preheat => self.t("tab.preheat", "Preheat"),
                    StatusTab::Ongoing => self.t("tab.ongoing", "Ongoing"),
                    StatusTab::Completed => self.t("tab.completed", "Completed"),
                };
                TabInfo {
                    label,
                    is_active: tab == active,
                }
            })
            .collect()
    }

    fn compute_columns(&self) -> ColumnHeaders {
        ColumnHeaders {
            title: self.t("column.title", "TITLE"),
            tags: self.t("column.tags", "TAGS"),
            reward: self.t("column.reward", "REWARD"),
            participants: self.t("column.participants", "PEOPLE"),
            time: self.t("column.time", "TIME"),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        self.input_mode.shows_search_bar().then(|| SearchBarInfo {
            label: self.t("search.label", "Search"),
            query: self.feed.state().search.clone(),
            is_focused: self.input_mode.is_typing(),
        })
    }

    fn compute_status_line(&self) -> Option<StatusLine> {
        let feed = self.feed.state();
        match &feed.load {
            LoadState::Loading => Some(StatusLine::Loading(self.t("feed.loading", "Loading events…"))),
            LoadState::Failed(message) => Some(StatusLine::Error(self.catalog.translate(
                "feed.error",
                "{{message}} (r to retry)",
                &[("message", message.clone())],
            ))),
            LoadState::Idle if !feed.has_more && !feed.events.is_empty() => {
                Some(StatusLine::EndOfList(self.t("feed.end", "No more events")))
            }
            LoadState::Idle => None,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let feed = self.feed.state();
        let filtered = feed.active_hashtag.is_some() || !feed.debounced_search.trim().is_empty();

        EmptyState {
            message: self.t("empty.message", "No events found"),
            subtitle: if filtered {
                self.t("empty.filtered", "Press Esc to clear the search")
            } else {
                self.t("empty.subtitle", "Try another tab or press r to refresh")
            },
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search(SearchFocus::Typing) => {
                self.t("footer.typing", "Esc: exit search  Enter: results  Type to filter")
            }
            InputMode::Search(SearchFocus::Navigating) => self.t(
                "footer.navigating",
                "Esc: exit search  /: edit query  j/k: navigate  #: tag filter",
            ),
            InputMode::Normal => self.t(
                "footer.normal",
                "j/k: navigate  1-4: tabs  /: search  s: sort  o: order  #: tag  t: theme  r: reload  q: quit",
            ),
        };
        FooterInfo { keybindings }
    }

    const fn available_rows(&self, rows: usize) -> usize {
        let chrome = if self.input_mode.shows_search_bar() {
            CHROME_ROWS + SEARCH_BAR_ROWS
        } else {
            CHROME_ROWS
        };
        rows.saturating_sub(chrome)
    }
}
