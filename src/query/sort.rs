//! Stable multi-field sort for event lists.
//!
//! Economic fields are decimal strings. A value that does not parse as a
//! finite number cannot be compared numerically, so it gets a fixed place
//! instead: after every parsable value, whatever the direction, in its
//! original relative order. This keeps each field a total order and makes
//! sorting idempotent.

use super::{SortField, SortOrder};
use crate::domain::EventSummary;
use std::cmp::Ordering;

/// Returns a sorted copy of `events`; the input is left untouched.
///
/// - `Time` orders by the first present of `deadline_at`, `ended_at`,
///   `created_at`.
/// - `Bounty` orders by `total_reward_btc`.
/// - `Participation` orders by `total_stake_btc`.
#[must_use]
pub fn sort_events(events: &[EventSummary], field: SortField, order: SortOrder) -> Vec<EventSummary> {
    let mut sorted = events.to_vec();

    match field {
        SortField::Time => {
            sorted.sort_by(|a, b| directed(a.sort_timestamp().cmp(&b.sort_timestamp()), order));
        }
        SortField::Bounty => {
            sorted.sort_by(|a, b| compare_amounts(&a.total_reward_btc, &b.total_reward_btc, order));
        }
        SortField::Participation => {
            sorted.sort_by(|a, b| compare_amounts(&a.total_stake_btc, &b.total_stake_btc, order));
        }
    }

    sorted
}

/// Parses a decimal amount, rejecting NaN and infinities.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn compare_amounts(a: &str, b: &str, order: SortOrder) -> Ordering {
    match (parse_amount(a), parse_amount(b)) {
        (Some(x), Some(y)) => directed(x.total_cmp(&y), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

const fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
