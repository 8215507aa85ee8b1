//! Event summary domain model.
//!
//! [`EventSummary`] is the client-side shape of one votable/fundable event as
//! it appears in the home feed. It is produced from raw API records by
//! [`crate::api::mapper`] and consumed by the query utilities, the feed store
//! and the countdown formatter.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-side lifecycle phase of an event.
///
/// The server tracks eight states (pending, preheat, active, ended,
/// completed, cancelled, refunded, expired). The client collapses them into
/// three: codes 2 and 3 keep their meaning, everything else reads as
/// `Completed`. Cancelled, refunded and expired events are therefore
/// indistinguishable from completed ones here. This narrowing is lossy on
/// purpose and must stay that way unless the feed starts to need the
/// distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Announced, not yet open for participation.
    Preheat,
    /// Open for participation until its deadline.
    Active,
    /// Every other server state.
    Completed,
}

impl EventStatus {
    /// Server code for the preheat state.
    pub const PREHEAT_CODE: i64 = 2;

    /// Server code for the active state.
    pub const ACTIVE_CODE: i64 = 3;

    /// Maps a server status code onto the client lifecycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use votefeed::domain::EventStatus;
    ///
    /// assert_eq!(EventStatus::from_code(2), EventStatus::Preheat);
    /// assert_eq!(EventStatus::from_code(3), EventStatus::Active);
    /// assert_eq!(EventStatus::from_code(7), EventStatus::Completed);
    /// ```
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            Self::PREHEAT_CODE => Self::Preheat,
            Self::ACTIVE_CODE => Self::Active,
            _ => Self::Completed,
        }
    }
}

/// One of the highest-weighted replies shown under an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopReply {
    pub id: String,
    pub body: String,
    /// Share of the total weight, 0-100.
    pub weight_percent: f64,
    /// Staked amount as an exact decimal BTC string.
    pub amount_btc: String,
}

/// Canonical client-side representation of one event.
///
/// `id` and `event_id` never change once the summary exists. Hashtags are
/// stored `#`-prefixed with their original case; case folding happens only
/// when filtering or comparing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    pub event_id: String,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub hashtags: Vec<String>,
    pub total_reward_btc: String,
    pub total_stake_btc: String,
    pub participants_count: u64,
    pub top_replies: Vec<TopReply>,
}

impl EventSummary {
    /// Timestamp used for time ordering: the first present of deadline,
    /// end, and creation time.
    #[must_use]
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.deadline_at
            .or(self.ended_at)
            .unwrap_or(self.created_at)
    }

    /// Hashtags with the `#` prefix stripped and lower-cased.
    pub fn normalized_hashtags(&self) -> impl Iterator<Item = String> + '_ {
        self.hashtags.iter().map(|tag| normalize_tag(tag))
    }
}

/// Adds the `#` prefix to a tag if it is missing. Case is left alone.
#[must_use]
pub fn prefix_hashtag(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    }
}

/// Comparison form of a tag: leading `#` characters stripped, lower-cased.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_lowercase()
}

/// Parses an API timestamp as UTC.
///
/// RFC 3339 strings are converted from their offset. Naive
/// `YYYY-MM-DD HH:MM:SS` strings (with a space or `T` separator, optional
/// fractional seconds) are taken to be UTC already.
///
/// # Examples
///
/// ```
/// use votefeed::domain::event::parse_timestamp;
///
/// let a = parse_timestamp("2024-01-10T01:30:45Z").unwrap();
/// let b = parse_timestamp("2024-01-10 01:30:45").unwrap();
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_collapse_to_three_states() {
        for code in [1, 4, 5, 6, 7, 8] {
            assert_eq!(EventStatus::from_code(code), EventStatus::Completed, "code {code}");
        }
        assert_eq!(EventStatus::from_code(2), EventStatus::Preheat);
        assert_eq!(EventStatus::from_code(3), EventStatus::Active);
        assert_eq!(EventStatus::from_code(0), EventStatus::Completed);
    }

    #[test]
    fn hashtag_prefix_keeps_case() {
        assert_eq!(prefix_hashtag("Bitcoin"), "#Bitcoin");
        assert_eq!(prefix_hashtag("#Bitcoin"), "#Bitcoin");
        assert_eq!(normalize_tag("#Bitcoin"), "bitcoin");
        assert_eq!(normalize_tag("Bitcoin"), "bitcoin");
    }

    #[test]
    fn timestamps_with_offsets_become_utc() {
        let shifted = parse_timestamp("2024-01-10T03:00:00+02:00");
        let utc = parse_timestamp("2024-01-10T01:00:00Z");
        assert!(shifted.is_some());
        assert_eq!(shifted, utc);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
