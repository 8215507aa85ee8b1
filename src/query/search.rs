//! Search and filter operations over event lists.
//!
//! All functions borrow their input and return a new vector; the input order
//! is preserved among the kept items.

use super::StatusTab;
use crate::domain::event::normalize_tag;
use crate::domain::EventSummary;

/// Keeps events matching a free-text query.
///
/// The query is trimmed and lower-cased. An event matches when the query is
/// a substring of its title or description, a prefix of its `event_id`, or
/// equal to one of its hashtags (`#` stripped on both sides). A blank query
/// keeps everything.
///
/// # Examples
///
/// ```
/// # use votefeed::query::filter_by_search;
/// # let events: Vec<votefeed::EventSummary> = vec![];
/// let hits = filter_by_search(&events, "  #Bitcoin ");
/// # assert!(hits.is_empty());
/// ```
#[must_use]
pub fn filter_by_search(events: &[EventSummary], query: &str) -> Vec<EventSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return events.to_vec();
    }

    let tag_query = normalize_tag(&query);

    events
        .iter()
        .filter(|event| matches_search(event, &query, &tag_query))
        .cloned()
        .collect()
}

fn matches_search(event: &EventSummary, query: &str, tag_query: &str) -> bool {
    event.title.to_lowercase().contains(query)
        || event.description.to_lowercase().contains(query)
        || event.event_id.to_lowercase().starts_with(query)
        || (!tag_query.is_empty() && event.normalized_hashtags().any(|tag| tag == tag_query))
}

/// Keeps events carrying the given hashtag.
///
/// Comparison ignores a leading `#` and case on both sides. `None` or a
/// blank tag keeps everything.
#[must_use]
pub fn filter_by_hashtag(events: &[EventSummary], hashtag: Option<&str>) -> Vec<EventSummary> {
    let Some(wanted) = hashtag.map(normalize_tag).filter(|tag| !tag.is_empty()) else {
        return events.to_vec();
    };

    events
        .iter()
        .filter(|event| event.normalized_hashtags().any(|tag| tag == wanted))
        .cloned()
        .collect()
}

/// Keeps events belonging to a status tab.
///
/// Pages from the server may mix statuses; this narrows them to the active
/// tab on the client.
#[must_use]
pub fn filter_by_status(events: &[EventSummary], tab: StatusTab) -> Vec<EventSummary> {
    events.iter().filter(|event| tab.matches(event)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventStatus;
    use chrono::{TimeZone, Utc};

    fn event(event_id: &str, title: &str, description: &str, tags: &[&str]) -> EventSummary {
        EventSummary {
            id: 0,
            event_id: event_id.to_string(),
            status: EventStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            started_at: None,
            deadline_at: None,
            ended_at: None,
            title: title.to_string(),
            description: description.to_string(),
            event_type: String::new(),
            hashtags: tags.iter().map(|t| (*t).to_string()).collect(),
            total_reward_btc: "0".to_string(),
            total_stake_btc: "0".to_string(),
            participants_count: 0,
            top_replies: vec![],
        }
    }

    fn ids(events: &[EventSummary]) -> Vec<&str> {
        events.iter().map(|e| e.event_id.as_str()).collect()
    }

    fn sample() -> Vec<EventSummary> {
        vec![
            event("ABC-1", "Bitcoin halving date", "", &["#Crypto"]),
            event("ABC-2", "Election night", "who wins the Bitcoin vote", &[]),
            event("XYZ-3", "Rain tomorrow", "", &["#weather", "#Bitcoinish"]),
        ]
    }

    #[test]
    fn blank_query_is_identity() {
        let events = sample();
        assert_eq!(filter_by_search(&events, "   "), events);
    }

    #[test]
    fn matches_title_and_description_case_insensitively() {
        assert_eq!(ids(&filter_by_search(&sample(), "  BITCOIN ")), vec!["ABC-1", "ABC-2"]);
    }

    #[test]
    fn matches_event_id_prefix_only() {
        assert_eq!(ids(&filter_by_search(&sample(), "abc")), vec!["ABC-1", "ABC-2"]);
        assert!(filter_by_search(&sample(), "bc-1").is_empty());
    }

    #[test]
    fn matches_whole_hashtags_with_or_without_prefix() {
        assert_eq!(ids(&filter_by_search(&sample(), "#crypto")), vec!["ABC-1"]);
        assert_eq!(ids(&filter_by_search(&sample(), "Weather")), vec!["XYZ-3"]);
        assert!(filter_by_search(&sample(), "#weath").is_empty());
    }

    #[test]
    fn search_is_idempotent() {
        let once = filter_by_search(&sample(), "bitcoin");
        assert_eq!(filter_by_search(&once, "bitcoin"), once);
    }

    #[test]
    fn hashtag_filter_is_exact() {
        assert_eq!(ids(&filter_by_hashtag(&sample(), Some("crypto"))), vec!["ABC-1"]);
        assert_eq!(ids(&filter_by_hashtag(&sample(), Some("#WEATHER"))), vec!["XYZ-3"]);
        assert!(filter_by_hashtag(&sample(), Some("#bitcoin")).is_empty());
        assert_eq!(filter_by_hashtag(&sample(), None).len(), 3);
        assert_eq!(filter_by_hashtag(&sample(), Some(" # ")).len(), 3);
    }

    #[test]
    fn status_filter_narrows() {
        let mut events = sample();
        events[1].status = EventStatus::Completed;
        assert_eq!(ids(&filter_by_status(&events, StatusTab::Completed)), vec!["ABC-2"]);
        assert_eq!(ids(&filter_by_status(&events, StatusTab::Ongoing)), vec!["ABC-1", "XYZ-3"]);
        assert_eq!(filter_by_status(&events, StatusTab::All).len(), 3);
    }
}
