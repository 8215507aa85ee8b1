//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place where input turns into state changes.
//! It pattern-matches one [`Event`], drives the feed, system and timer
//! components of [`AppState`], and returns whether the frame needs a redraw
//! together with the [`Action`]s the runtime must execute.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`
//! - **Search**: `SearchMode`, `FocusResults`, `FocusSearchBar`, `ExitSearch`,
//!   `Char`, `Backspace`
//! - **Feed commands**: `SelectStatus`, `CycleSortField`, `ToggleSortOrder`,
//!   `ToggleHashtagFilter`, `Retry`
//! - **Host**: `HttpResponse`, `Tick`, `PermissionsResult`
//!
//! # Example
//!
//! ```
//! use votefeed::api::ApiClient;
//! use votefeed::app::{handle_event, Action, AppSettings, AppState, Event};
//! use votefeed::i18n::Catalog;
//! use votefeed::storage::ThemePreference;
//!
//! let client = ApiClient::new("https://example.org/api")?;
//! let mut state = AppState::new(client, AppSettings::default(), ThemePreference::Dark, Catalog::default());
//!
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true }, chrono::Utc::now())?;
//! assert!(matches!(actions[0], Action::Fetch(_)));
//! # Ok::<(), votefeed::FeedError>(())
//! ```

use super::feed::{HomeFeed, PageOutcome};
use super::modes::{InputMode, SearchFocus};
use super::store::{FeedAction, LoadState};
use super::timers::TimerKind;
use crate::api::{decode_response, ApiRequest, EventsPage, RequestKind, SystemConfig};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::i18n::Translate;
use crate::query::StatusTab;
use crate::storage::{HOME_SCROLL_Y, PREFERRED_THEME};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Period of the countdown redraw.
const COUNTDOWN_REFRESH_SECS: i64 = 1;

/// Semantic events delivered by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the selection down one row, stopping at the last.
    KeyDown,
    /// Moves the selection up one row, stopping at the first.
    KeyUp,
    /// Saves the scroll position and hides the plugin.
    CloseFocus,
    /// Opens the search box with typing focus.
    SearchMode,
    /// Moves focus from the search box to the results.
    FocusResults,
    /// Moves focus from the results back to the search box.
    FocusSearchBar,
    /// Leaves search mode and clears the search and hashtag filter.
    ExitSearch,
    /// Appends a character to the search text.
    Char(char),
    /// Removes the last character of the search text.
    Backspace,

    SelectStatus(StatusTab),
    CycleSortField,
    ToggleSortOrder,
    /// Filters by the selected event's first hashtag, or clears the filter.
    ToggleHashtagFilter,
    ToggleTheme,
    /// Retries after a failure, otherwise reloads from the first page.
    Retry,

    /// A finished host HTTP request. `context` is the one the request was
    /// sent with.
    HttpResponse {
        status: u16,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },

    /// A host wakeup requested through [`Action::ScheduleWakeup`].
    Tick,

    /// Outcome of the web access permission request.
    PermissionsResult {
        granted: bool,
    },
}

/// Processes an event, mutates application state, and returns whether to
/// redraw plus the actions to execute in order.
///
/// # Errors
///
/// Returns an error if a request URL cannot be built. The feed is marked
/// failed before the error is returned, so the next frame shows it.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event, now: DateTime<Utc>) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();
    let mut actions = Vec::new();

    match event {
        Event::KeyDown => {
            if state.move_selection_down() {
                sync_scroll(state)?;
            }
            prefetch(state, &mut actions)?;
            Ok((true, actions))
        }
        Event::KeyUp => {
            if state.move_selection_up() {
                sync_scroll(state)?;
            }
            Ok((true, actions))
        }
        Event::CloseFocus => {
            actions.push(Action::SavePreference {
                key: HOME_SCROLL_Y.to_string(),
                value: state.selected_index.to_string(),
            });
            actions.push(Action::CloseFocus);
            Ok((false, actions))
        }
        Event::SearchMode | Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, actions))
        }
        Event::FocusResults => {
            if !state.input_mode.shows_search_bar() {
                return Ok((false, actions));
            }
            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, actions))
        }
        Event::ExitSearch => {
            state.input_mode = InputMode::Normal;
            state.scheduler.cancel(TimerKind::SearchDebounce);

            let has_hashtag = state.feed.state().active_hashtag.is_some();
            let has_query = !state.feed.state().debounced_search.is_empty();
            let request = if has_hashtag {
                state.feed.apply(FeedAction::SetActiveHashtag(None))?
            } else if has_query {
                state.feed.apply(FeedAction::SetSearch(String::new()))?;
                state.feed.apply(FeedAction::SetDebouncedSearch(String::new()))?
            } else {
                state.feed.apply(FeedAction::SetSearch(String::new()))?
            };
            push_fetch(&mut actions, request);
            Ok((true, actions))
        }
        Event::Char(c) => {
            if !state.input_mode.is_typing() {
                return Ok((false, actions));
            }
            let mut search = state.feed.state().search.clone();
            search.push(*c);
            edit_search(state, search, now, &mut actions)?;
            Ok((true, actions))
        }
        Event::Backspace => {
            if !state.input_mode.is_typing() {
                return Ok((false, actions));
            }
            let mut search = state.feed.state().search.clone();
            if search.pop().is_none() {
                return Ok((false, actions));
            }
            edit_search(state, search, now, &mut actions)?;
            Ok((true, actions))
        }
        Event::SelectStatus(tab) => {
            if state.feed.state().status == *tab {
                return Ok((false, actions));
            }
            push_fetch(&mut actions, state.feed.apply(FeedAction::SetStatus(*tab))?);
            Ok((true, actions))
        }
        Event::CycleSortField => {
            let feed = state.feed.state();
            let action = FeedAction::SetSort(feed.sort_field.next(), feed.sort_order);
            push_fetch(&mut actions, state.feed.apply(action)?);
            Ok((true, actions))
        }
        Event::ToggleSortOrder => {
            let feed = state.feed.state();
            let action = FeedAction::SetSort(feed.sort_field, feed.sort_order.toggled());
            push_fetch(&mut actions, state.feed.apply(action)?);
            Ok((true, actions))
        }
        Event::ToggleHashtagFilter => {
            let next = if state.feed.state().active_hashtag.is_some() {
                None
            } else {
                let Some(tag) = state.selected_event().and_then(|event| event.hashtags.first().cloned()) else {
                    tracing::debug!("no hashtag to filter by");
                    return Ok((false, actions));
                };
                Some(tag)
            };

            state.scheduler.cancel(TimerKind::SearchDebounce);
            push_fetch(&mut actions, state.feed.apply(FeedAction::SetActiveHashtag(next))?);
            Ok((true, actions))
        }
        Event::ToggleTheme => {
            let preference = state.toggle_theme();
            actions.push(Action::SavePreference {
                key: PREFERRED_THEME.to_string(),
                value: preference.as_str().to_string(),
            });
            Ok((true, actions))
        }
        Event::Retry => {
            let request = if state.feed.state().is_error() {
                state.feed.retry()?
            } else {
                Some(state.feed.reload()?)
            };
            push_fetch(&mut actions, request);

            if matches!(state.system.load(), LoadState::Failed(_)) {
                push_fetch(&mut actions, state.system.fetch()?);
            }
            Ok((true, actions))
        }
        Event::HttpResponse { status, body, context } => {
            let render = handle_response(state, *status, body, context, now, &mut actions)?;
            Ok((render, actions))
        }
        Event::Tick => {
            state.scheduler.on_wakeup();
            let due = state.scheduler.take_due(now);

            for kind in &due {
                match kind {
                    TimerKind::SearchDebounce => settle_search(state, &mut actions)?,
                    TimerKind::SystemRefresh => {
                        let request = state.system.on_refresh_due(now, &mut state.scheduler)?;
                        push_fetch(&mut actions, request);
                    }
                    TimerKind::CountdownRefresh => {
                        state.scheduler.schedule(
                            TimerKind::CountdownRefresh,
                            Duration::seconds(COUNTDOWN_REFRESH_SECS),
                            now,
                        );
                    }
                }
            }

            request_wakeup(state, now, &mut actions);
            Ok((!due.is_empty(), actions))
        }
        Event::PermissionsResult { granted } => {
            if !*granted {
                tracing::warn!("web access permission denied");
                let message = state
                    .catalog
                    .translate("error.permission", "Web access permission was not granted", &[]);
                state.feed.apply(FeedAction::SetError(message))?;
                return Ok((true, actions));
            }

            tracing::info!("web access granted, loading feed");
            actions.push(Action::Fetch(state.feed.reload()?));
            push_fetch(&mut actions, state.system.fetch()?);

            if let Some(interval) = state.settings.system_refresh {
                state.system.start_auto_refresh(interval, now, &mut state.scheduler);
            }
            state.scheduler.schedule(
                TimerKind::CountdownRefresh,
                Duration::seconds(COUNTDOWN_REFRESH_SECS),
                now,
            );
            request_wakeup(state, now, &mut actions);
            Ok((true, actions))
        }
    }
}

fn handle_response(
    state: &mut AppState,
    status: u16,
    body: &[u8],
    context: &BTreeMap<String, String>,
    now: DateTime<Utc>,
    actions: &mut Vec<Action>,
) -> Result<bool> {
    match ApiRequest::kind_from_context(context) {
        Some(RequestKind::EventsPage(tag)) => {
            let result = decode_response::<EventsPage>(status, body);
            match state.feed.receive_page(&tag, result) {
                PageOutcome::Applied { fetched } => {
                    if tag.offset == 0 {
                        state.restore_selection();
                    } else {
                        state.clamp_selection();
                    }
                    tracing::debug!(fetched, selected = state.selected_index, "page shown");
                    prefetch(state, actions)?;
                    Ok(true)
                }
                PageOutcome::Stale => Ok(false),
                PageOutcome::Failed(_) => Ok(true),
            }
        }
        Some(RequestKind::SystemConfig) => {
            state.system.receive(decode_response::<SystemConfig>(status, body), now);
            Ok(true)
        }
        None => {
            tracing::warn!(status, "response with an unknown request context");
            Ok(false)
        }
    }
}

/// Updates the raw search text and restarts the debounce timer.
fn edit_search(state: &mut AppState, search: String, now: DateTime<Utc>, actions: &mut Vec<Action>) -> Result<()> {
    state.feed.apply(FeedAction::SetSearch(search))?;
    state
        .scheduler
        .schedule(TimerKind::SearchDebounce, state.settings.search_debounce, now);
    request_wakeup(state, now, actions);
    Ok(())
}

/// Moves the settled search text into the query when it changed.
///
/// Editing the text mirrored from a hashtag filter drops that filter.
fn settle_search(state: &mut AppState, actions: &mut Vec<Action>) -> Result<()> {
    let feed = state.feed.state();
    let raw = feed.search.clone();
    let settled = raw.trim().to_string();
    if settled == feed.debounced_search {
        return Ok(());
    }

    if feed.active_hashtag.is_some() {
        state.feed.apply(FeedAction::SetActiveHashtag(None))?;
        state.feed.apply(FeedAction::SetSearch(raw))?;
    }

    tracing::debug!(search = %settled, "search settled");
    push_fetch(actions, state.feed.apply(FeedAction::SetDebouncedSearch(settled))?);
    Ok(())
}

/// Asks for the next page when the selection is close to the end of the
/// visible list. Skipped while the feed shows an error; `Retry` resumes.
fn prefetch(state: &mut AppState, actions: &mut Vec<Action>) -> Result<()> {
    if state.feed.state().is_error() {
        return Ok(());
    }
    if HomeFeed::should_prefetch(state.visible_events().len(), state.selected_index) {
        push_fetch(actions, state.feed.load_more()?);
    }
    Ok(())
}

fn sync_scroll(state: &mut AppState) -> Result<()> {
    state.feed.apply(FeedAction::SetScrollY(state.selected_index))?;
    Ok(())
}

fn request_wakeup(state: &mut AppState, now: DateTime<Utc>, actions: &mut Vec<Action>) {
    if let Some(after) = state.scheduler.wakeup_request(now) {
        actions.push(Action::ScheduleWakeup { after });
    }
}

fn push_fetch(actions: &mut Vec<Action>, request: Option<ApiRequest>) {
    if let Some(request) = request {
        actions.push(Action::Fetch(request));
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "key_down",
        Event::KeyUp => "key_up",
        Event::CloseFocus => "close_focus",
        Event::SearchMode => "search_mode",
        Event::FocusResults => "focus_results",
        Event::FocusSearchBar => "focus_search_bar",
        Event::ExitSearch => "exit_search",
        Event::Char(_) => "char",
        Event::Backspace => "backspace",
        Event::SelectStatus(_) => "select_status",
        Event::CycleSortField => "cycle_sort_field",
        Event::ToggleSortOrder => "toggle_sort_order",
        Event::ToggleHashtagFilter => "toggle_hashtag_filter",
        Event::ToggleTheme => "toggle_theme",
        Event::Retry => "retry",
        Event::HttpResponse { .. } => "http_response",
        Event::Tick => "tick",
        Event::PermissionsResult { .. } => "permissions_result",
    }
}
