//! End-to-end flows through the public API: host events in, actions out.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use votefeed::api::{ApiRequest, RequestKind};
use votefeed::app::LoadState;
use votefeed::query::StatusTab;
use votefeed::storage::{JsonPreferences, MemoryPreferences, PreferenceStore, ThemePreference, HOME_SCROLL_Y};
use votefeed::{handle_event, initialize, Action, AppState, Config, Event};

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
}

fn config() -> Config {
    Config {
        api_base_url: "https://feed.example.org/api".to_string(),
        page_size: 2,
        ..Config::default()
    }
}

fn fetches(actions: &[Action]) -> Vec<ApiRequest> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::Fetch(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

fn page_requests(actions: &[Action]) -> Vec<ApiRequest> {
    fetches(actions)
        .into_iter()
        .filter(|request| matches!(request.kind, RequestKind::EventsPage(_)))
        .collect()
}

fn page(ids: &[&str]) -> Vec<u8> {
    let entries: Vec<(&str, u8)> = ids.iter().map(|id| (*id, 3)).collect();
    page_with_status(&entries)
}

fn page_with_status(entries: &[(&str, u8)]) -> Vec<u8> {
    let items: Vec<_> = entries
        .iter()
        .map(|(id, status)| {
            json!({
                "id": 7,
                "event_id": id,
                "status": status,
                "title": format!("vote {id}"),
                "hashtags": ["dao"],
                "created_at": "2024-02-01T00:00:00Z"
            })
        })
        .collect();
    serde_json::to_vec(&json!({ "success": true, "data": { "items": items, "total": 9 } })).unwrap()
}

fn respond(state: &mut AppState, request: &ApiRequest, status: u16, body: Vec<u8>) -> (bool, Vec<Action>) {
    let event = Event::HttpResponse {
        status,
        body,
        context: request.context.clone(),
    };
    handle_event(state, &event, at(1)).unwrap()
}

fn event_ids(state: &AppState) -> Vec<String> {
    state.feed.state().events.iter().map(|e| e.event_id.clone()).collect()
}

/// Grants permissions and returns the first page request.
fn start(state: &mut AppState) -> ApiRequest {
    let (_, actions) = handle_event(state, &Event::PermissionsResult { granted: true }, at(0)).unwrap();
    let pages = page_requests(&actions);
    assert_eq!(pages.len(), 1);
    pages[0].clone()
}

#[test]
fn pages_accumulate_in_order() {
    let mut state = initialize(&config(), &MemoryPreferences::default()).unwrap();
    let first = start(&mut state);

    let (render, actions) = respond(&mut state, &first, 200, page(&["a", "b"]));
    assert!(render);
    assert_eq!(event_ids(&state), vec!["a", "b"]);

    // Two rows is inside the prefetch window, so the next page goes out at once.
    let next = page_requests(&actions);
    assert_eq!(next.len(), 1);

    respond(&mut state, &next[0], 200, page(&["c", "d"]));
    assert_eq!(event_ids(&state), vec!["a", "b", "c", "d"]);
    assert_eq!(state.feed.state().offset, 4);
}

#[test]
fn response_for_an_abandoned_query_is_ignored() {
    let mut state = initialize(&config(), &MemoryPreferences::default()).unwrap();
    let first = start(&mut state);

    let (_, actions) = handle_event(&mut state, &Event::SelectStatus(StatusTab::All), at(1)).unwrap();
    let reload = page_requests(&actions);
    assert_eq!(reload.len(), 1);

    let (render, actions) = respond(&mut state, &first, 200, page(&["old"]));
    assert!(!render);
    assert!(actions.is_empty());
    assert!(state.feed.state().events.is_empty());

    respond(&mut state, &reload[0], 200, page(&["new"]));
    assert_eq!(event_ids(&state), vec!["new"]);
}

#[test]
fn failed_page_keeps_items_and_retries_same_offset() {
    let mut state = initialize(&config(), &MemoryPreferences::default()).unwrap();
    let first = start(&mut state);
    let (_, actions) = respond(&mut state, &first, 200, page(&["a", "b"]));
    let second = page_requests(&actions).remove(0);

    let (render, _) = respond(&mut state, &second, 502, b"bad gateway".to_vec());
    assert!(render);
    assert!(matches!(state.feed.state().load, LoadState::Failed(_)));
    assert_eq!(event_ids(&state), vec!["a", "b"]);

    // No automatic prefetch while failed.
    let (_, actions) = handle_event(&mut state, &Event::KeyDown, at(2)).unwrap();
    assert!(page_requests(&actions).is_empty());

    let (_, actions) = handle_event(&mut state, &Event::Retry, at(3)).unwrap();
    let retry = page_requests(&actions);
    assert_eq!(retry.len(), 1);
    match &retry[0].kind {
        RequestKind::EventsPage(tag) => assert_eq!(tag.offset, 2),
        RequestKind::SystemConfig => panic!("expected a page request"),
    }
}

#[test]
fn preferences_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let mut prefs = JsonPreferences::open(&path).unwrap();
    let mut state = initialize(&config(), &prefs).unwrap();
    assert_eq!(state.theme_preference, ThemePreference::Dark);

    let (_, actions) = handle_event(&mut state, &Event::ToggleTheme, at(0)).unwrap();
    for action in actions {
        if let Action::SavePreference { key, value } = action {
            prefs.set(&key, &value).unwrap();
        }
    }
    prefs.set(HOME_SCROLL_Y, "3").unwrap();
    drop(prefs);

    let reopened = JsonPreferences::open(&path).unwrap();
    let restored = initialize(&config(), &reopened).unwrap();
    assert_eq!(restored.theme_preference, ThemePreference::Light);
    assert_eq!(restored.feed.state().scroll_y, 3);
}

#[test]
fn configured_theme_overrides_the_stored_one() {
    let mut prefs = MemoryPreferences::default();
    prefs.set(votefeed::storage::PREFERRED_THEME, "light").unwrap();

    let config = Config {
        theme: Some(ThemePreference::Dark),
        ..config()
    };
    let state = initialize(&config, &prefs).unwrap();
    assert_eq!(state.theme_preference, ThemePreference::Dark);
}

#[test]
fn page_hidden_by_the_status_tab_is_not_the_end() {
    let mut state = initialize(&config(), &MemoryPreferences::default()).unwrap();
    assert_eq!(state.feed.state().status, StatusTab::Ongoing);
    let first = start(&mut state);

    let (_, actions) = respond(&mut state, &first, 200, page_with_status(&[("done", 4), ("soon", 2)]));

    assert!(state.visible_events().is_empty());
    assert_eq!(state.feed.state().events.len(), 2);
    assert!(state.feed.state().has_more);
    assert_eq!(page_requests(&actions).len(), 1);
}
