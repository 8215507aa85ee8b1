//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed
//! by the renderer. They hold display-ready strings only: translation,
//! currency formatting, countdowns and truncation have already happened.

use crate::domain::EventStatus;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Status tabs in display order.
    pub tabs: Vec<TabInfo>,

    /// Present while search mode is active.
    pub search_bar: Option<SearchBarInfo>,

    pub columns: ColumnHeaders,

    /// Rows inside the visible window.
    pub rows: Vec<EventRow>,

    /// Index of the selected row within `rows`.
    pub selected_index: usize,

    /// Loading, error or end-of-list line under the table.
    pub status_line: Option<StatusLine>,

    pub footer: FooterInfo,

    /// Shown instead of the table when nothing is visible.
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Loaded/total counts, sort and active hashtag.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub label: String,
    pub is_active: bool,
}

/// Translated table column titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeaders {
    pub title: String,
    pub tags: String,
    pub reward: String,
    pub participants: String,
    pub time: String,
}

/// One event in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub title: String,
    pub tags: String,
    pub reward: String,
    pub participants: String,
    pub countdown: String,
    pub status: EventStatus,
    pub is_selected: bool,

    /// Character ranges of `title` matching the search text, `(start, end)`
    /// with exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Loading(String),
    Error(String),
    EndOfList(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub label: String,
    pub query: String,
    pub is_focused: bool,
}
