//! Relative-time labels for event cards.
//!
//! [`format_countdown`] picks a label from the event's lifecycle phase: time
//! remaining for active events, time until start for preheat events, and time
//! since the end for completed ones. "Now" is always passed in so labels are
//! reproducible in tests.

use crate::domain::event::{EventStatus, EventSummary};
use crate::i18n::Translate;
use chrono::{DateTime, Utc};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Number of seconds in one week.
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// A non-negative duration split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breakdown {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl Breakdown {
    const fn from_seconds(total: i64) -> Self {
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        }
    }

    fn params(self) -> [(&'static str, String); 4] {
        [
            ("days", self.days.to_string()),
            ("hours", self.hours.to_string()),
            ("minutes", self.minutes.to_string()),
            ("seconds", self.seconds.to_string()),
        ]
    }
}

/// Produces the countdown label for an event card.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use votefeed::domain::countdown::format_countdown;
/// use votefeed::i18n::DefaultTranslator;
/// # use votefeed::domain::{EventStatus, EventSummary};
/// # let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
/// # let event = EventSummary {
/// #     id: 1, event_id: "ev-1".into(), status: EventStatus::Completed,
/// #     created_at: now, started_at: None, deadline_at: None,
/// #     ended_at: Some(Utc.with_ymd_and_hms(2024, 1, 9, 22, 0, 0).unwrap()),
/// #     title: String::new(), description: String::new(), event_type: String::new(),
/// #     hashtags: vec![], total_reward_btc: "0".into(), total_stake_btc: "0".into(),
/// #     participants_count: 0, top_replies: vec![],
/// # };
///
/// assert_eq!(format_countdown(&event, now, &DefaultTranslator), "2h ago");
/// ```
pub fn format_countdown(event: &EventSummary, now: DateTime<Utc>, t: &dyn Translate) -> String {
    match event.status {
        EventStatus::Active => format_ongoing(event.deadline_at, now, t),
        EventStatus::Preheat => format_preheat(event, now, t),
        EventStatus::Completed => format_completed(event, now, t),
    }
}

/// Time left until an active event's deadline.
///
/// Shows the two largest non-zero units. An absent or past deadline reads
/// as ended.
pub fn format_ongoing(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>, t: &dyn Translate) -> String {
    let Some(deadline) = deadline else {
        return ended_label(t);
    };

    let remaining = (deadline - now).num_seconds();
    if remaining <= 0 {
        return ended_label(t);
    }

    let parts = Breakdown::from_seconds(remaining);
    let params = parts.params();
    if parts.days > 0 {
        t.translate("countdown.left.days", "{{days}}d {{hours}}h left", &params)
    } else if parts.hours > 0 {
        t.translate("countdown.left.hours", "{{hours}}h {{minutes}}m left", &params)
    } else if parts.minutes > 0 {
        t.translate("countdown.left.minutes", "{{minutes}}m {{seconds}}s left", &params)
    } else {
        t.translate("countdown.left.seconds", "{{seconds}}s left", &params)
    }
}

fn format_preheat(event: &EventSummary, now: DateTime<Utc>, t: &dyn Translate) -> String {
    let Some(target) = event.started_at.or(event.deadline_at) else {
        return starting_soon_label(t);
    };

    let remaining = (target - now).num_seconds();
    if remaining <= 0 {
        return starting_soon_label(t);
    }

    let parts = Breakdown::from_seconds(remaining);
    let params = parts.params();
    if parts.days > 0 {
        t.translate(
            "countdown.starts.days",
            "{{days}}d {{hours}}h {{minutes}}m {{seconds}}s",
            &params,
        )
    } else if parts.hours > 0 {
        t.translate("countdown.starts.hours", "{{hours}}h {{minutes}}m {{seconds}}s", &params)
    } else if parts.minutes > 0 {
        t.translate("countdown.starts.minutes", "{{minutes}}m {{seconds}}s", &params)
    } else {
        t.translate("countdown.starts.seconds", "{{seconds}}s", &params)
    }
}

fn format_completed(event: &EventSummary, now: DateTime<Utc>, t: &dyn Translate) -> String {
    if let Some(ended_at) = event.ended_at {
        return format_elapsed(ended_at, now, t);
    }

    match event.deadline_at {
        Some(deadline) if deadline <= now => format_elapsed(deadline, now, t),
        Some(deadline) => {
            // Completed with a deadline still ahead and no end time: the record
            // is inconsistent. Surface it in the logs and show the generic label.
            tracing::warn!(
                event_id = %event.event_id,
                deadline = %deadline,
                "completed event has a future deadline and no end time"
            );
            ended_label(t)
        }
        None => ended_label(t),
    }
}

/// Time since `since`: hours under a day, days under a week, whole weeks after.
fn format_elapsed(since: DateTime<Utc>, now: DateTime<Utc>, t: &dyn Translate) -> String {
    let elapsed = (now - since).num_seconds().max(0);

    if elapsed < SECONDS_PER_DAY {
        let hours = elapsed / SECONDS_PER_HOUR;
        t.translate("countdown.ago.hours", "{{hours}}h ago", &[("hours", hours.to_string())])
    } else if elapsed < SECONDS_PER_WEEK {
        let days = elapsed / SECONDS_PER_DAY;
        t.translate("countdown.ago.days", "{{days}}d ago", &[("days", days.to_string())])
    } else {
        let weeks = elapsed / SECONDS_PER_WEEK;
        t.translate("countdown.ago.weeks", "{{weeks}}w ago", &[("weeks", weeks.to_string())])
    }
}

fn ended_label(t: &dyn Translate) -> String {
    t.translate("countdown.ended", "Ended", &[])
}

fn starting_soon_label(t: &dyn Translate) -> String {
    t.translate("countdown.starting_soon", "Starting soon", &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::DefaultTranslator;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at(2024, 1, 10, 0, 0, 0)
    }

    fn event(status: EventStatus) -> EventSummary {
        EventSummary {
            id: 1,
            event_id: "ev-1".to_string(),
            status,
            created_at: at(2023, 12, 1, 0, 0, 0),
            started_at: None,
            deadline_at: None,
            ended_at: None,
            title: "t".to_string(),
            description: String::new(),
            event_type: String::new(),
            hashtags: vec![],
            total_reward_btc: "0".to_string(),
            total_stake_btc: "0".to_string(),
            participants_count: 0,
            top_replies: vec![],
        }
    }

    fn label(event: &EventSummary) -> String {
        format_countdown(event, now(), &DefaultTranslator)
    }

    #[test]
    fn preheat_under_a_day_shows_hours_minutes_seconds() {
        let mut ev = event(EventStatus::Preheat);
        ev.started_at = Some(at(2024, 1, 10, 1, 30, 45));
        assert_eq!(label(&ev), "1h 30m 45s");
    }

    #[test]
    fn preheat_cascade() {
        let mut ev = event(EventStatus::Preheat);
        ev.started_at = Some(at(2024, 1, 12, 3, 4, 5));
        assert_eq!(label(&ev), "2d 3h 4m 5s");

        ev.started_at = Some(at(2024, 1, 10, 0, 4, 5));
        assert_eq!(label(&ev), "4m 5s");

        ev.started_at = Some(at(2024, 1, 10, 0, 0, 9));
        assert_eq!(label(&ev), "9s");
    }

    #[test]
    fn preheat_in_the_past_is_starting_soon() {
        let mut ev = event(EventStatus::Preheat);
        ev.started_at = Some(at(2024, 1, 9, 12, 0, 0));
        assert_eq!(label(&ev), "Starting soon");
    }

    #[test]
    fn preheat_falls_back_to_deadline() {
        let mut ev = event(EventStatus::Preheat);
        ev.deadline_at = Some(at(2024, 1, 10, 0, 2, 0));
        assert_eq!(label(&ev), "2m 0s");
    }

    #[test]
    fn completed_two_hours_ago() {
        let mut ev = event(EventStatus::Completed);
        ev.ended_at = Some(at(2024, 1, 9, 22, 0, 0));
        assert_eq!(label(&ev), "2h ago");
    }

    #[test]
    fn completed_nine_days_ago_is_one_week() {
        let mut ev = event(EventStatus::Completed);
        ev.ended_at = Some(at(2024, 1, 1, 0, 0, 0));
        assert_eq!(label(&ev), "1w ago");
    }

    #[test]
    fn completed_days_ago() {
        let mut ev = event(EventStatus::Completed);
        ev.ended_at = Some(at(2024, 1, 7, 0, 0, 0));
        assert_eq!(label(&ev), "3d ago");
    }

    #[test]
    fn completed_without_end_uses_past_deadline() {
        let mut ev = event(EventStatus::Completed);
        ev.deadline_at = Some(at(2024, 1, 9, 19, 0, 0));
        assert_eq!(label(&ev), "5h ago");
    }

    #[test]
    fn completed_with_future_deadline_and_no_end_is_generic() {
        let mut ev = event(EventStatus::Completed);
        ev.deadline_at = Some(at(2024, 2, 1, 0, 0, 0));
        assert_eq!(label(&ev), "Ended");
    }

    #[test]
    fn active_counts_down_to_deadline() {
        let mut ev = event(EventStatus::Active);
        ev.deadline_at = Some(at(2024, 1, 11, 5, 0, 0));
        assert_eq!(label(&ev), "1d 5h left");

        ev.deadline_at = Some(at(2024, 1, 9, 0, 0, 0));
        assert_eq!(label(&ev), "Ended");
    }

    #[test]
    fn translator_receives_keys() {
        let mut ev = event(EventStatus::Preheat);
        ev.started_at = Some(at(2024, 1, 1, 0, 0, 0));
        let keyed = |key: &str, _: &str, _: &[(&str, String)]| key.to_string();
        assert_eq!(format_countdown(&ev, now(), &keyed), "countdown.starting_soon");
    }
}
