//! Owned timers.
//!
//! The host only offers fire-and-forget wakeups, so the real timer state
//! lives here: at most one pending deadline per [`TimerKind`]. Scheduling a
//! kind that is already pending replaces it. A host wakeup that arrives
//! after its timer was replaced or cancelled finds nothing due and does
//! nothing.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// The timers the plugin owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Settles typed search text into the query.
    SearchDebounce,
    /// Periodic system parameter refresh.
    SystemRefresh,
    /// Redraw so countdown labels stay current.
    CountdownRefresh,
}

/// Identity of one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    due: DateTime<Utc>,
}

/// A requested host wakeup that has not arrived this long after its deadline
/// is assumed lost.
const WAKEUP_LOST_AFTER_SECS: i64 = 1;

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: BTreeMap<TimerKind, Pending>,
    generation: u64,
    requested: Option<DateTime<Utc>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` to fire `after` from `now`, replacing any pending
    /// timer of the same kind.
    pub fn schedule(&mut self, kind: TimerKind, after: Duration, now: DateTime<Utc>) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle {
            kind,
            generation: self.generation,
        };

        let due = now.checked_add_signed(after).unwrap_or(DateTime::<Utc>::MAX_UTC);
        if let Some(replaced) = self.pending.insert(kind, Pending { handle, due }) {
            tracing::trace!(?kind, replaced = replaced.handle.generation, "timer replaced");
        }
        handle
    }

    /// Cancels the pending timer of `kind`, returning its handle.
    pub fn cancel(&mut self, kind: TimerKind) -> Option<TimerHandle> {
        self.pending.remove(&kind).map(|pending| pending.handle)
    }

    #[must_use]
    pub fn handle(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.pending.get(&kind).map(|pending| pending.handle)
    }

    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.contains_key(&kind)
    }

    /// Removes and returns every timer whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<TimerKind> {
        let due: Vec<TimerKind> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .map(|(kind, _)| *kind)
            .collect();

        for kind in &due {
            self.pending.remove(kind);
        }
        due
    }


    /// Delay for a new host wakeup, or `None` when an already requested
    /// wakeup arrives no later than the earliest pending deadline.
    pub fn wakeup_request(&mut self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let due = self.pending.values().map(|pending| pending.due).min()?;

        let covered = self
            .requested
            .is_some_and(|at| at <= due && now <= at + Duration::seconds(WAKEUP_LOST_AFTER_SECS));
        if covered {
            return None;
        }

        self.requested = Some(due);
        Some((due - now).to_std().unwrap_or_default())
    }

    /// Records the arrival of a host wakeup. Any arrival consumes the
    /// outstanding request, early or not.
    pub fn on_wakeup(&mut self) {
        self.requested = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn rescheduling_replaces_instead_of_stacking() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(TimerKind::SystemRefresh, Duration::seconds(10), at(0));
        let second = scheduler.schedule(TimerKind::SystemRefresh, Duration::seconds(10), at(5));

        assert_ne!(first, second);
        assert_eq!(scheduler.handle(TimerKind::SystemRefresh), Some(second));
        assert!(scheduler.take_due(at(10)).is_empty());
        assert_eq!(scheduler.take_due(at(15)), vec![TimerKind::SystemRefresh]);
        assert!(scheduler.take_due(at(30)).is_empty());
    }

    #[test]
    fn kinds_are_independent() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SearchDebounce, Duration::milliseconds(300), at(0));
        scheduler.schedule(TimerKind::SystemRefresh, Duration::seconds(60), at(0));

        assert_eq!(scheduler.take_due(at(1)), vec![TimerKind::SearchDebounce]);
        assert!(scheduler.is_pending(TimerKind::SystemRefresh));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(1), at(0));
        assert!(scheduler.cancel(TimerKind::SearchDebounce).is_some());
        assert!(scheduler.take_due(at(5)).is_empty());
        assert_eq!(scheduler.wakeup_request(at(5)), None);
    }

    #[test]
    fn wakeup_targets_the_earliest_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SystemRefresh, Duration::seconds(30), at(0));
        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(2), at(0));

        assert_eq!(scheduler.wakeup_request(at(1)), Some(std::time::Duration::from_secs(1)));
        scheduler.on_wakeup();
        assert_eq!(scheduler.wakeup_request(at(3)), Some(std::time::Duration::ZERO));
    }

    #[test]
    fn early_wakeup_does_not_leave_the_next_deadline_covered() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(1), at(0));
        assert!(scheduler.wakeup_request(at(0)).is_some());

        let early = at(0) + Duration::milliseconds(800);
        scheduler.on_wakeup();
        assert!(scheduler.take_due(early).is_empty());
        assert_eq!(
            scheduler.wakeup_request(early),
            Some(std::time::Duration::from_millis(200))
        );
    }

    #[test]
    fn deadline_past_the_calendar_end_saturates() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SearchDebounce, Duration::MAX, at(0));
        assert!(scheduler.is_pending(TimerKind::SearchDebounce));
        assert!(scheduler.take_due(at(10)).is_empty());
    }

    #[test]
    fn host_wakeups_are_not_requested_twice() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(1), at(0));
        assert_eq!(scheduler.wakeup_request(at(0)), Some(std::time::Duration::from_secs(1)));

        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(1), at(0) + Duration::milliseconds(500));
        assert_eq!(scheduler.wakeup_request(at(0)), None);

        scheduler.on_wakeup();
        assert!(scheduler.take_due(at(1)).is_empty());
        assert_eq!(
            scheduler.wakeup_request(at(1)),
            Some(std::time::Duration::from_millis(500))
        );
    }

    #[test]
    fn earlier_deadline_gets_its_own_wakeup() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKind::SystemRefresh, Duration::seconds(60), at(0));
        assert!(scheduler.wakeup_request(at(0)).is_some());

        scheduler.schedule(TimerKind::SearchDebounce, Duration::seconds(1), at(0));
        assert_eq!(scheduler.wakeup_request(at(0)), Some(std::time::Duration::from_secs(1)));
    }
}
