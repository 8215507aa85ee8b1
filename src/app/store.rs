//! Home feed state store.
//!
//! [`FeedState`] is owned by a [`FeedStore`] and only changes through
//! [`FeedStore::dispatch`]. Dispatch runs the pure [`reduce`] function and
//! swaps the whole state in one assignment, so a reader never observes a
//! half-applied action (for example new filters paired with the previous
//! query's items).
//!
//! # Example
//!
//! ```
//! use votefeed::app::store::{FeedAction, FeedStore};
//! use votefeed::query::StatusTab;
//!
//! let mut store = FeedStore::new();
//! store.dispatch(FeedAction::SetStatus(StatusTab::Completed));
//! assert_eq!(store.state().status, StatusTab::Completed);
//! assert!(store.state().events.is_empty());
//! ```

use crate::domain::EventSummary;
use crate::query::{FilterSignature, SortField, SortOrder, StatusTab};

/// Request lifecycle of the feed.
///
/// One enum instead of two flags: loading and failed cannot both be true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

/// Snapshot of the home feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub status: StatusTab,
    /// Raw text in the search box, updated on every keystroke.
    pub search: String,
    /// Settled search term used for queries.
    pub debounced_search: String,
    pub active_hashtag: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// Loaded items in server order.
    pub events: Vec<EventSummary>,
    /// Number of items fetched so far for the current query.
    pub offset: usize,
    /// Server-reported total, for display only.
    pub total: u64,
    pub has_more: bool,
    pub load: LoadState,
    /// Selection row, retained across list resets.
    pub scroll_y: usize,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            status: StatusTab::default(),
            search: String::new(),
            debounced_search: String::new(),
            active_hashtag: None,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            events: Vec::new(),
            offset: 0,
            total: 0,
            has_more: true,
            load: LoadState::Idle,
            scroll_y: 0,
        }
    }
}

impl FeedState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.load, LoadState::Failed(_))
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Identity of the query this state describes.
    #[must_use]
    pub fn signature(&self) -> FilterSignature {
        FilterSignature {
            status: self.status,
            search: self.debounced_search.clone(),
            hashtag: self.active_hashtag.clone(),
            sort_field: self.sort_field,
            sort_order: self.sort_order,
        }
    }

    fn with_list_reset(mut self) -> Self {
        self.events = Vec::new();
        self.offset = 0;
        self.has_more = true;
        self.total = 0;
        self
    }
}

/// Named mutations of [`FeedState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    SetStatus(StatusTab),
    /// Raw search box text; does not touch the query.
    SetSearch(String),
    SetDebouncedSearch(String),
    SetSort(SortField, SortOrder),
    /// Sets or clears the hashtag filter and mirrors it into the search box.
    SetActiveHashtag(Option<String>),
    /// Replaces the list with the first page of a query.
    SetEvents {
        events: Vec<EventSummary>,
        total: u64,
        has_more: bool,
        offset: usize,
    },
    /// Appends a subsequent page after the last loaded item.
    ///
    /// After a `ResetList` this acts as a first page. `total` is display
    /// only and is raised to at least the number of loaded items.
    AppendEvents {
        events: Vec<EventSummary>,
        has_more: bool,
        offset: usize,
    },
    /// Restores default filters.
    ResetFilters,
    /// Clears loaded data, keeping filters and the scroll position.
    ResetList,
    SetLoading,
    SetError(String),
    ClearError,
    SetScrollY(usize),
}

/// Applies `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &FeedState, action: FeedAction) -> FeedState {
    let mut next = state.clone();

    match action {
        FeedAction::SetStatus(status) => {
            next.status = status;
            next = next.with_list_reset();
        }
        FeedAction::SetSearch(search) => {
            next.search = search;
        }
        FeedAction::SetDebouncedSearch(value) => {
            next.debounced_search = value;
            next.offset = 0;
        }
        FeedAction::SetSort(field, order) => {
            next.sort_field = field;
            next.sort_order = order;
            next = next.with_list_reset();
        }
        FeedAction::SetActiveHashtag(tag) => {
            let mirrored = tag.clone().unwrap_or_default();
            next.active_hashtag = tag;
            next.search.clone_from(&mirrored);
            next.debounced_search = mirrored;
            next = next.with_list_reset();
        }
        FeedAction::SetEvents {
            events,
            total,
            has_more,
            offset,
        } => {
            next.events = events;
            next.total = total;
            next.has_more = has_more;
            next.offset = offset;
            next.load = LoadState::Idle;
        }
        FeedAction::AppendEvents {
            events,
            has_more,
            offset,
        } => {
            next.events.extend(events);
            next.total = next.total.max(u64::try_from(next.events.len()).unwrap_or(u64::MAX));
            next.has_more = has_more;
            next.offset = offset;
            next.load = LoadState::Idle;
        }
        FeedAction::ResetFilters => {
            let defaults = FeedState::default();
            next.status = defaults.status;
            next.search = defaults.search;
            next.debounced_search = defaults.debounced_search;
            next.active_hashtag = defaults.active_hashtag;
            next.sort_field = defaults.sort_field;
            next.sort_order = defaults.sort_order;
            if next.signature() != state.signature() {
                next = next.with_list_reset();
            }
        }
        FeedAction::ResetList => {
            next = next.with_list_reset();
            next.load = LoadState::Idle;
        }
        FeedAction::SetLoading => {
            next.load = LoadState::Loading;
        }
        FeedAction::SetError(message) => {
            next.load = LoadState::Failed(message);
        }
        FeedAction::ClearError => {
            if next.is_error() {
                next.load = LoadState::Idle;
            }
        }
        FeedAction::SetScrollY(row) => {
            next.scroll_y = row;
        }
    }

    next
}

/// Owner of the home feed state.
#[derive(Debug, Clone, Default)]
pub struct FeedStore {
    state: FeedState,
}

impl FeedStore {
    /// Creates a store with default filters and an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    /// Applies one action atomically.
    pub fn dispatch(&mut self, action: FeedAction) {
        let _span = tracing::trace_span!("feed_dispatch", action = action_name(&action)).entered();
        self.state = reduce(&self.state, action);
    }

    pub fn set_status(&mut self, status: StatusTab) {
        self.dispatch(FeedAction::SetStatus(status));
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.dispatch(FeedAction::SetSearch(search.into()));
    }

    pub fn set_debounced_search(&mut self, value: impl Into<String>) {
        self.dispatch(FeedAction::SetDebouncedSearch(value.into()));
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.dispatch(FeedAction::SetSort(field, order));
    }

    pub fn set_active_hashtag(&mut self, tag: Option<String>) {
        self.dispatch(FeedAction::SetActiveHashtag(tag));
    }

    pub fn set_events(&mut self, events: Vec<EventSummary>, total: u64, has_more: bool, offset: usize) {
        self.dispatch(FeedAction::SetEvents {
            events,
            total,
            has_more,
            offset,
        });
    }

    pub fn append_events(&mut self, events: Vec<EventSummary>, has_more: bool, offset: usize) {
        self.dispatch(FeedAction::AppendEvents {
            events,
            has_more,
            offset,
        });
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(FeedAction::ResetFilters);
    }

    pub fn reset_list(&mut self) {
        self.dispatch(FeedAction::ResetList);
    }
}

const fn action_name(action: &FeedAction) -> &'static str {
    match action {
        FeedAction::SetStatus(_) => "set_status",
        FeedAction::SetSearch(_) => "set_search",
        FeedAction::SetDebouncedSearch(_) => "set_debounced_search",
        FeedAction::SetSort(..) => "set_sort",
        FeedAction::SetActiveHashtag(_) => "set_active_hashtag",
        FeedAction::SetEvents { .. } => "set_events",
        FeedAction::AppendEvents { .. } => "append_events",
        FeedAction::ResetFilters => "reset_filters",
        FeedAction::ResetList => "reset_list",
        FeedAction::SetLoading => "set_loading",
        FeedAction::SetError(_) => "set_error",
        FeedAction::ClearError => "clear_error",
        FeedAction::SetScrollY(_) => "set_scroll_y",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventStatus;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn event(event_id: &str) -> EventSummary {
        EventSummary {
            id: 1,
            event_id: event_id.to_string(),
            status: EventStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            started_at: None,
            deadline_at: None,
            ended_at: None,
            title: event_id.to_string(),
            description: String::new(),
            event_type: String::new(),
            hashtags: vec![],
            total_reward_btc: "0".to_string(),
            total_stake_btc: "0".to_string(),
            participants_count: 0,
            top_replies: vec![],
        }
    }

    fn loaded() -> FeedStore {
        let mut store = FeedStore::new();
        store.set_events(vec![event("a"), event("b")], 10, true, 2);
        store.dispatch(FeedAction::SetScrollY(1));
        store
    }

    fn ids(state: &FeedState) -> Vec<&str> {
        state.events.iter().map(|e| e.event_id.as_str()).collect()
    }

    #[test]
    fn defaults() {
        let state = FeedState::default();
        assert_eq!(state.status, StatusTab::Ongoing);
        assert_eq!((state.sort_field, state.sort_order), (SortField::Time, SortOrder::Desc));
        assert!(state.has_more);
        assert!(!state.is_loading() && !state.is_error());
    }

    #[test]
    fn filter_changes_reset_the_list() {
        let actions = [
            FeedAction::SetStatus(StatusTab::Completed),
            FeedAction::SetSort(SortField::Bounty, SortOrder::Asc),
            FeedAction::SetActiveHashtag(Some("#rain".to_string())),
        ];

        for action in actions {
            let mut store = loaded();
            store.set_events(vec![event("a")], 10, false, 1);
            store.dispatch(action.clone());
            let state = store.state();
            assert!(state.events.is_empty(), "{action:?}");
            assert_eq!(state.offset, 0, "{action:?}");
            assert!(state.has_more, "{action:?}");
            assert_eq!(state.total, 0, "{action:?}");
        }
    }

    #[test]
    fn debounced_search_resets_offset_but_keeps_events() {
        let mut store = loaded();
        store.set_debounced_search("rain");
        assert_eq!(store.state().offset, 0);
        assert_eq!(ids(store.state()), vec!["a", "b"]);
        assert_eq!(store.state().debounced_search, "rain");
    }

    #[test]
    fn raw_search_does_not_touch_the_query() {
        let mut store = loaded();
        let before = store.state().signature();
        store.set_search("ra");
        assert_eq!(store.state().signature(), before);
        assert_eq!(store.state().offset, 2);
    }

    #[test]
    fn hashtag_is_mirrored_into_search() {
        let mut store = loaded();
        store.set_active_hashtag(Some("#rain".to_string()));
        assert_eq!(store.state().search, "#rain");
        assert_eq!(store.state().debounced_search, "#rain");

        store.set_active_hashtag(None);
        assert_eq!(store.state().search, "");
        assert_eq!(store.state().active_hashtag, None);
    }

    #[test]
    fn append_preserves_order_and_is_associative() {
        let base = loaded();

        let mut stepwise = base.clone();
        stepwise.append_events(vec![event("c")], true, 3);
        stepwise.append_events(vec![event("d"), event("e")], false, 5);

        let mut combined = base;
        combined.append_events(vec![event("c"), event("d"), event("e")], false, 5);

        assert_eq!(stepwise.state(), combined.state());
        assert_eq!(ids(stepwise.state()), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn reset_list_keeps_filters_and_scroll() {
        let mut store = loaded();
        store.set_status(StatusTab::Preheat);
        store.set_events(vec![event("a")], 1, false, 1);
        store.reset_list();

        let state = store.state();
        assert_eq!(state.status, StatusTab::Preheat);
        assert!(state.events.is_empty());
        assert_eq!(state.scroll_y, 1);
    }

    #[test]
    fn reset_filters_clears_list_only_when_query_changes() {
        let mut unchanged = loaded();
        unchanged.reset_filters();
        assert_eq!(ids(unchanged.state()), vec!["a", "b"]);

        let mut changed = loaded();
        changed.set_sort(SortField::Bounty, SortOrder::Desc);
        changed.set_events(vec![event("x")], 1, false, 1);
        changed.reset_filters();
        assert_eq!(changed.state().sort_field, SortField::Time);
        assert!(changed.state().events.is_empty());
    }

    #[test]
    fn loading_and_error_are_exclusive() {
        let mut store = FeedStore::new();
        store.dispatch(FeedAction::SetLoading);
        assert!(store.state().is_loading());

        store.dispatch(FeedAction::SetError("boom".to_string()));
        assert!(store.state().is_error() && !store.state().is_loading());
        assert_eq!(store.state().error_message(), Some("boom"));

        store.append_events(vec![event("a")], true, 1);
        assert_eq!(store.state().load, LoadState::Idle);
    }

    #[test]
    fn append_after_reset_acts_as_first_page() {
        let mut store = FeedStore::new();
        store.set_events(vec![event("x")], 9, true, 1);
        store.reset_list();

        store.append_events(vec![event("a"), event("b")], true, 2);
        let state = store.state();
        assert_eq!(ids(state), vec!["a", "b"]);
        assert_eq!(state.offset, 2);
        assert_eq!(state.total, 2);
    }

    #[test]
    fn append_keeps_a_larger_server_total() {
        let mut store = FeedStore::new();
        store.set_events(vec![event("a")], 9, true, 1);
        store.append_events(vec![event("b")], true, 2);
        assert_eq!(store.state().total, 9);
    }

    #[test]
    fn clear_error_leaves_loading_alone() {
        let mut store = FeedStore::new();
        store.dispatch(FeedAction::SetLoading);
        store.dispatch(FeedAction::ClearError);
        assert!(store.state().is_loading());
    }
}
