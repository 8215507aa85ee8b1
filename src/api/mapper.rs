//! Raw API record to [`EventSummary`] mapping.
//!
//! Mapping is a pure transform. A record missing a required field (`id`,
//! `event_id`, `status`, `title`, `created_at`), or carrying a timestamp or
//! amount that cannot be read, fails with [`FeedError::Mapping`]. Page-level
//! policy is the caller's: [`map_page`] rejects the whole page on the first
//! bad record so nothing is dropped silently, [`map_page_lenient`] skips and
//! logs bad records.

use crate::api::models::{RawAmount, RawEvent, RawReply};
use crate::domain::currency::{parse_satoshi, satoshi_to_btc};
use crate::domain::error::{FeedError, Result};
use crate::domain::event::{parse_timestamp, prefix_hashtag, EventStatus, EventSummary, TopReply};
use chrono::{DateTime, Utc};

/// Placeholder id used in errors for records without an `event_id`.
const UNKNOWN_EVENT_ID: &str = "<unknown>";

/// Maps one raw record.
///
/// # Errors
///
/// Returns [`FeedError::Mapping`] for missing required fields and unreadable
/// timestamps or amounts.
pub fn map_event(raw: RawEvent) -> Result<EventSummary> {
    let event_id = raw
        .event_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| FeedError::mapping(UNKNOWN_EVENT_ID, "missing field `event_id`"))?;

    let id = raw.id.ok_or_else(|| FeedError::mapping(&event_id, "missing field `id`"))?;
    let status = raw
        .status
        .map(EventStatus::from_code)
        .ok_or_else(|| FeedError::mapping(&event_id, "missing field `status`"))?;
    let title = raw
        .title
        .ok_or_else(|| FeedError::mapping(&event_id, "missing field `title`"))?;
    let created_at = raw
        .created_at
        .as_deref()
        .ok_or_else(|| FeedError::mapping(&event_id, "missing field `created_at`"))
        .and_then(|value| required_timestamp(&event_id, "created_at", value))?;

    let started_at = optional_timestamp(&event_id, "started_at", raw.started_at.as_deref())?;
    let deadline_at = optional_timestamp(&event_id, "deadline_at", raw.deadline_at.as_deref())?;
    let ended_at = optional_timestamp(&event_id, "ended_at", raw.ended_at.as_deref())?;

    let total_reward_btc = amount_to_btc(&event_id, "total_reward", raw.total_reward.as_ref())?;
    let total_stake_btc = amount_to_btc(&event_id, "total_stake", raw.total_stake.as_ref())?;

    let hashtags = raw
        .hashtags
        .iter()
        .filter(|tag| !tag.trim().trim_start_matches('#').is_empty())
        .map(|tag| prefix_hashtag(tag))
        .collect();

    let mut top_replies = raw
        .top_replies
        .into_iter()
        .map(|reply| map_reply(&event_id, reply))
        .collect::<Result<Vec<_>>>()?;
    top_replies.sort_by(|a, b| b.weight_percent.total_cmp(&a.weight_percent));

    Ok(EventSummary {
        id,
        event_id,
        status,
        created_at,
        started_at,
        deadline_at,
        ended_at,
        title,
        description: raw.description.unwrap_or_default(),
        event_type: raw.event_type.unwrap_or_default(),
        hashtags,
        total_reward_btc,
        total_stake_btc,
        participants_count: raw.participants_count.unwrap_or(0),
        top_replies,
    })
}

/// Maps a page of records, failing on the first bad one.
///
/// # Errors
///
/// Returns the first [`FeedError::Mapping`] encountered.
pub fn map_page(items: Vec<RawEvent>) -> Result<Vec<EventSummary>> {
    let _span = tracing::debug_span!("map_page", count = items.len()).entered();
    items.into_iter().map(map_event).collect()
}

/// Maps a page of records, skipping bad ones with a warning.
#[must_use]
pub fn map_page_lenient(items: Vec<RawEvent>) -> Vec<EventSummary> {
    items
        .into_iter()
        .filter_map(|raw| match map_event(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed event record");
                None
            }
        })
        .collect()
}

fn map_reply(event_id: &str, raw: RawReply) -> Result<TopReply> {
    let id = match raw.id {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(FeedError::mapping(event_id, "reply without `id`")),
    };

    Ok(TopReply {
        id,
        body: raw.body.unwrap_or_default(),
        weight_percent: raw.weight_percent.filter(|w| w.is_finite()).unwrap_or(0.0),
        amount_btc: amount_to_btc(event_id, "reply amount", raw.amount_satoshi.as_ref())?,
    })
}

fn amount_to_btc(event_id: &str, field: &str, amount: Option<&RawAmount>) -> Result<String> {
    match amount {
        None => Ok("0".to_string()),
        Some(RawAmount::Integer(sats)) => Ok(satoshi_to_btc(*sats)),
        Some(RawAmount::Text(text)) => parse_satoshi(text)
            .map(satoshi_to_btc)
            .ok_or_else(|| FeedError::mapping(event_id, format!("`{field}` is not a satoshi amount: {text:?}"))),
    }
}

fn required_timestamp(event_id: &str, field: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(value)
        .ok_or_else(|| FeedError::mapping(event_id, format!("`{field}` is not a timestamp: {value:?}")))
}

fn optional_timestamp(event_id: &str, field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => required_timestamp(event_id, field, v).map(Some),
    }
}
