//! System parameter store with optional periodic refresh.

use super::store::LoadState;
use super::timers::{Scheduler, TimerHandle, TimerKind};
use crate::api::{ApiClient, ApiRequest, SystemConfig};
use crate::domain::error::Result;
use chrono::{DateTime, Duration, Utc};

/// Last known system parameters and their fetch state.
#[derive(Debug, Clone)]
pub struct SystemParamsStore {
    client: ApiClient,
    config: Option<SystemConfig>,
    load: LoadState,
    in_flight: bool,
    refresh_every: Option<Duration>,
    updated_at: Option<DateTime<Utc>>,
}

impl SystemParamsStore {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            config: None,
            load: LoadState::Idle,
            in_flight: false,
            refresh_every: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> Option<&SystemConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub const fn load(&self) -> &LoadState {
        &self.load
    }

    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Requests the parameter set unless a request is already out.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built.
    pub fn fetch(&mut self) -> Result<Option<ApiRequest>> {
        if self.in_flight {
            return Ok(None);
        }

        let request = self.client.system_config()?;
        self.in_flight = true;
        self.load = LoadState::Loading;
        Ok(Some(request))
    }

    /// Stores a response. Previously fetched parameters survive a failure.
    pub fn receive(&mut self, result: Result<SystemConfig>, now: DateTime<Utc>) {
        self.in_flight = false;

        match result {
            Ok(config) => {
                tracing::debug!(params = config.params.len(), "system parameters updated");
                self.config = Some(config);
                self.load = LoadState::Idle;
                self.updated_at = Some(now);
            }
            Err(e) => {
                tracing::warn!(error = %e, "system parameter fetch failed");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Starts periodic refresh, replacing any refresh already scheduled.
    pub fn start_auto_refresh(
        &mut self,
        interval: Duration,
        now: DateTime<Utc>,
        scheduler: &mut Scheduler,
    ) -> TimerHandle {
        self.refresh_every = Some(interval);
        scheduler.schedule(TimerKind::SystemRefresh, interval, now)
    }

    pub fn stop_auto_refresh(&mut self, scheduler: &mut Scheduler) {
        self.refresh_every = None;
        scheduler.cancel(TimerKind::SystemRefresh);
    }

    /// Handles a due `SystemRefresh` timer: fetches and schedules the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built.
    pub fn on_refresh_due(&mut self, now: DateTime<Utc>, scheduler: &mut Scheduler) -> Result<Option<ApiRequest>> {
        let Some(interval) = self.refresh_every else {
            return Ok(None);
        };
        scheduler.schedule(TimerKind::SystemRefresh, interval, now);
        self.fetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedError;
    use chrono::TimeZone;
    use serde_json::json;

    fn store() -> SystemParamsStore {
        SystemParamsStore::new(ApiClient::new("https://example.org/api").unwrap())
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn config() -> SystemConfig {
        serde_json::from_value(json!({"site_name": "Votes", "min_stake": 1000})).unwrap()
    }

    #[test]
    fn one_request_at_a_time() {
        let mut store = store();
        assert!(store.fetch().unwrap().is_some());
        assert!(store.fetch().unwrap().is_none());

        store.receive(Ok(config()), at(0));
        assert!(store.fetch().unwrap().is_some());
    }

    #[test]
    fn failure_keeps_previous_parameters() {
        let mut store = store();
        store.fetch().unwrap();
        store.receive(Ok(config()), at(0));
        store.fetch().unwrap();
        store.receive(Err(FeedError::Api("maintenance".to_string())), at(1));

        assert_eq!(store.config().and_then(|c| c.get_str("site_name")).as_deref(), Some("Votes"));
        assert!(matches!(store.load(), LoadState::Failed(m) if m.contains("maintenance")));
        assert_eq!(store.updated_at(), Some(at(0)));
    }

    #[test]
    fn restarting_auto_refresh_keeps_a_single_timer() {
        let mut store = store();
        let mut scheduler = Scheduler::new();
        store.start_auto_refresh(Duration::seconds(30), at(0), &mut scheduler);
        store.start_auto_refresh(Duration::seconds(30), at(10), &mut scheduler);

        assert!(scheduler.take_due(at(30)).is_empty());
        assert_eq!(scheduler.take_due(at(40)), vec![TimerKind::SystemRefresh]);
    }

    #[test]
    fn refresh_tick_fetches_and_reschedules() {
        let mut store = store();
        let mut scheduler = Scheduler::new();
        store.start_auto_refresh(Duration::seconds(30), at(0), &mut scheduler);
        scheduler.take_due(at(30));

        assert!(store.on_refresh_due(at(30), &mut scheduler).unwrap().is_some());
        assert!(scheduler.is_pending(TimerKind::SystemRefresh));

        store.stop_auto_refresh(&mut scheduler);
        assert!(!scheduler.is_pending(TimerKind::SystemRefresh));
        assert!(store.on_refresh_due(at(60), &mut scheduler).unwrap().is_none());
    }
}
