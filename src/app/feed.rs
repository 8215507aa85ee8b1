//! Home feed pagination orchestrator.
//!
//! [`HomeFeed`] sits between the store and the API. It decides when a page
//! request may go out, tags every request with the query it belongs to, and
//! applies a response only if that tag is still the one being waited for.
//!
//! The orchestrator never performs I/O: `load_more`, `reload` and `retry`
//! return an [`ApiRequest`] for the runtime to execute, and the runtime
//! hands the response back through [`HomeFeed::receive_page`].
//!
//! ```text
//! load_more() ──► ApiRequest(tag) ──► host HTTP ──► receive_page(tag, result)
//!      ▲                                                   │
//!      └──── in-flight slot cleared, store updated ◄───────┘
//! ```

use super::store::{FeedAction, FeedState, FeedStore};
use crate::api::mapper::map_page;
use crate::api::{ApiClient, ApiRequest, EventsPage};
use crate::domain::error::Result;
use crate::query::QueryTag;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Rows from the end of the visible list at which the next page is requested.
pub const PREFETCH_THRESHOLD: usize = 5;

/// What happened to a page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was written to the store.
    Applied { fetched: usize },
    /// The response belonged to an older query and was dropped.
    Stale,
    /// The request or its mapping failed; loaded items were kept.
    Failed(String),
}

/// Pagination state machine over a [`FeedStore`].
#[derive(Debug, Clone)]
pub struct HomeFeed {
    store: FeedStore,
    client: ApiClient,
    page_size: usize,
    generation: u64,
    in_flight: Option<QueryTag>,
}

impl HomeFeed {
    /// Creates an empty feed. `page_size` is clamped to at least 1.
    #[must_use]
    pub fn new(client: ApiClient, page_size: usize) -> Self {
        Self {
            store: FeedStore::new(),
            client,
            page_size: page_size.max(1),
            generation: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FeedState {
        self.store.state()
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Tag of the page request currently awaited, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&QueryTag> {
        self.in_flight.as_ref()
    }

    /// Dispatches a store action, reloading when the query changed.
    ///
    /// Actions that reset the list or change the filter signature start a
    /// fresh first-page request, which is returned. Other actions (raw
    /// search text, scroll position) return `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload request cannot be built.
    pub fn apply(&mut self, action: FeedAction) -> Result<Option<ApiRequest>> {
        let restarts_query = matches!(
            action,
            FeedAction::SetStatus(_)
                | FeedAction::SetSort(..)
                | FeedAction::SetActiveHashtag(_)
                | FeedAction::SetDebouncedSearch(_)
        );
        let before = self.store.state().signature();

        self.store.dispatch(action);

        if restarts_query || self.store.state().signature() != before {
            return self.reload().map(Some);
        }
        Ok(None)
    }

    /// Requests the next page of the current query.
    ///
    /// Returns `None` while a page is in flight or once the server reported
    /// the end of the data. Safe to call on every proximity signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built; the store is marked
    /// failed as well.
    pub fn load_more(&mut self) -> Result<Option<ApiRequest>> {
        if self.in_flight.is_some() {
            tracing::trace!("load_more ignored: page in flight");
            return Ok(None);
        }
        if !self.store.state().has_more {
            tracing::trace!("load_more ignored: no more pages");
            return Ok(None);
        }

        let offset = self.store.state().offset;
        self.request_page(offset).map(Some)
    }

    /// Starts the current query over from the first page.
    ///
    /// Any response still in flight becomes stale and is dropped on arrival.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built; the store is marked
    /// failed as well.
    pub fn reload(&mut self) -> Result<ApiRequest> {
        self.generation = self.generation.wrapping_add(1);
        if let Some(stale) = self.in_flight.take() {
            tracing::debug!(generation = stale.generation, offset = stale.offset, "abandoning in-flight page");
        }
        self.store.reset_list();

        tracing::info!(generation = self.generation, "reloading home feed");
        self.request_page(0)
    }

    /// Re-attempts the query after a failure.
    ///
    /// Reloads when nothing is loaded yet, otherwise asks for the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built.
    pub fn retry(&mut self) -> Result<Option<ApiRequest>> {
        if self.in_flight.is_some() {
            return Ok(None);
        }
        self.store.dispatch(FeedAction::ClearError);

        if self.store.state().events.is_empty() {
            self.reload().map(Some)
        } else {
            self.load_more()
        }
    }

    /// Applies a page response, or drops it if its tag is stale.
    ///
    /// A failed request or a page containing a malformed record marks the
    /// store failed and keeps every loaded item.
    pub fn receive_page(&mut self, tag: &QueryTag, result: Result<EventsPage>) -> PageOutcome {
        let _span = tracing::debug_span!("receive_page", generation = tag.generation, offset = tag.offset).entered();

        if self.in_flight.as_ref() != Some(tag) {
            tracing::debug!(current_generation = self.generation, "discarding stale page");
            return PageOutcome::Stale;
        }
        self.in_flight = None;

        let mapped = result.and_then(|page| {
            let EventsPage { items, total, has_more } = page;
            map_page(items).map(|events| (events, total, has_more))
        });

        match mapped {
            Ok((events, total, server_has_more)) => {
                let fetched = events.len();
                let has_more = server_has_more.unwrap_or(true) && fetched >= self.page_size;
                let offset = tag.offset + fetched;

                if tag.offset == 0 {
                    self.store.set_events(events, total, has_more, offset);
                } else {
                    self.store.append_events(events, has_more, offset);
                }

                tracing::debug!(fetched, offset, has_more, "page applied");
                PageOutcome::Applied { fetched }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "page request failed");
                self.store.dispatch(FeedAction::SetError(message.clone()));
                PageOutcome::Failed(message)
            }
        }
    }

    /// Proximity signal: true when `cursor` is within
    /// [`PREFETCH_THRESHOLD`] rows of the end of a list of `visible_len`
    /// rows. An empty list always asks for more.
    #[must_use]
    pub const fn should_prefetch(visible_len: usize, cursor: usize) -> bool {
        cursor.saturating_add(PREFETCH_THRESHOLD) >= visible_len
    }

    fn request_page(&mut self, offset: usize) -> Result<ApiRequest> {
        let tag = QueryTag {
            signature: self.store.state().signature(),
            generation: self.generation,
            offset,
        };

        match self.client.events_page(tag.clone(), self.page_size) {
            Ok(request) => {
                tracing::debug!(url = %request.url, "page requested");
                self.in_flight = Some(tag);
                self.store.dispatch(FeedAction::SetLoading);
                Ok(request)
            }
            Err(e) => {
                self.store.dispatch(FeedAction::SetError(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::RawEvent;
    use crate::api::RequestKind;
    use crate::domain::FeedError;
    use crate::query::{SortField, SortOrder, StatusTab};
    use serde_json::json;

    fn feed(page_size: usize) -> HomeFeed {
        HomeFeed::new(ApiClient::new("https://example.org/api").unwrap(), page_size)
    }

    fn raw(event_id: &str) -> RawEvent {
        serde_json::from_value(json!({
            "id": 1,
            "event_id": event_id,
            "status": 3,
            "title": event_id,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn page(ids: &[&str], total: u64, has_more: Option<bool>) -> EventsPage {
        EventsPage {
            items: ids.iter().map(|id| raw(id)).collect(),
            total,
            has_more,
        }
    }

    fn tag_of(request: &ApiRequest) -> QueryTag {
        match &request.kind {
            RequestKind::EventsPage(tag) => tag.clone(),
            RequestKind::SystemConfig => panic!("not a page request"),
        }
    }

    fn ids(feed: &HomeFeed) -> Vec<&str> {
        feed.state().events.iter().map(|e| e.event_id.as_str()).collect()
    }

    #[test]
    fn second_load_more_while_in_flight_is_a_no_op() {
        let mut feed = feed(2);
        let first = feed.load_more().unwrap();
        assert!(first.is_some());
        assert!(feed.state().is_loading());
        assert_eq!(feed.load_more().unwrap(), None);
    }

    #[test]
    fn pages_append_in_order() {
        let mut feed = feed(2);
        let first = tag_of(&feed.load_more().unwrap().unwrap());
        assert_eq!(feed.receive_page(&first, Ok(page(&["a", "b"], 3, None))), PageOutcome::Applied { fetched: 2 });
        assert_eq!(feed.state().total, 3);

        let second = tag_of(&feed.load_more().unwrap().unwrap());
        assert_eq!(second.offset, 2);
        feed.receive_page(&second, Ok(page(&["c"], 3, None)));

        assert_eq!(ids(&feed), vec!["a", "b", "c"]);
        assert_eq!(feed.state().offset, 3);
        assert!(!feed.state().has_more);
        assert_eq!(feed.load_more().unwrap(), None);
    }

    #[test]
    fn explicit_end_of_data_stops_paging() {
        let mut feed = feed(2);
        let tag = tag_of(&feed.load_more().unwrap().unwrap());
        feed.receive_page(&tag, Ok(page(&["a", "b"], 2, Some(false))));
        assert!(!feed.state().has_more);
    }

    #[test]
    fn response_from_before_reload_is_discarded() {
        let mut feed = feed(2);
        let old = tag_of(&feed.load_more().unwrap().unwrap());

        let fresh = tag_of(&feed.reload().unwrap());
        assert_eq!(feed.receive_page(&old, Ok(page(&["old"], 1, None))), PageOutcome::Stale);
        assert!(feed.state().events.is_empty());
        assert!(feed.state().is_loading());

        feed.receive_page(&fresh, Ok(page(&["new"], 1, None)));
        assert_eq!(ids(&feed), vec!["new"]);
    }

    #[test]
    fn filter_change_restarts_the_query() {
        let mut feed = feed(2);
        let old = tag_of(&feed.load_more().unwrap().unwrap());

        let request = feed.apply(FeedAction::SetStatus(StatusTab::Completed)).unwrap().unwrap();
        let fresh = tag_of(&request);
        assert_eq!(fresh.signature.status, StatusTab::Completed);
        assert_eq!(fresh.offset, 0);
        assert_eq!(feed.receive_page(&old, Ok(page(&["old"], 1, None))), PageOutcome::Stale);
    }

    #[test]
    fn raw_search_and_scroll_do_not_fetch() {
        let mut feed = feed(2);
        assert_eq!(feed.apply(FeedAction::SetSearch("ra".to_string())).unwrap(), None);
        assert_eq!(feed.apply(FeedAction::SetScrollY(4)).unwrap(), None);
    }

    #[test]
    fn failure_keeps_loaded_items() {
        let mut feed = feed(2);
        let first = tag_of(&feed.load_more().unwrap().unwrap());
        feed.receive_page(&first, Ok(page(&["a", "b"], 4, None)));

        let second = tag_of(&feed.load_more().unwrap().unwrap());
        let outcome = feed.receive_page(&second, Err(FeedError::Api("down".to_string())));

        assert_eq!(outcome, PageOutcome::Failed("API error: down".to_string()));
        assert_eq!(ids(&feed), vec!["a", "b"]);
        assert_eq!(feed.state().error_message(), Some("API error: down"));
    }

    #[test]
    fn malformed_record_fails_the_page() {
        let mut feed = feed(2);
        let tag = tag_of(&feed.load_more().unwrap().unwrap());
        let mut bad = page(&["a"], 2, None);
        bad.items[0].title = None;

        assert!(matches!(feed.receive_page(&tag, Ok(bad)), PageOutcome::Failed(_)));
        assert!(feed.state().events.is_empty());
    }

    #[test]
    fn retry_continues_from_the_failed_offset() {
        let mut feed = feed(2);
        let first = tag_of(&feed.load_more().unwrap().unwrap());
        feed.receive_page(&first, Ok(page(&["a", "b"], 4, None)));
        let second = tag_of(&feed.load_more().unwrap().unwrap());
        feed.receive_page(&second, Err(FeedError::Api("down".to_string())));

        let retried = tag_of(&feed.retry().unwrap().unwrap());
        assert_eq!(retried.offset, 2);
        assert!(!feed.state().is_error());
    }

    #[test]
    fn retry_with_nothing_loaded_reloads() {
        let mut feed = feed(2);
        let first = tag_of(&feed.load_more().unwrap().unwrap());
        feed.receive_page(&first, Err(FeedError::Api("down".to_string())));

        let retried = tag_of(&feed.retry().unwrap().unwrap());
        assert_eq!(retried.offset, 0);
        assert!(retried.generation > first.generation);
    }

    #[test]
    fn sort_change_reloads_with_new_signature() {
        let mut feed = feed(2);
        let request = feed
            .apply(FeedAction::SetSort(SortField::Bounty, SortOrder::Asc))
            .unwrap()
            .unwrap();
        assert!(request.url.contains("sort=bounty"));
        assert!(request.url.contains("order=asc"));
    }

    #[test]
    fn prefetch_signal_near_the_end() {
        assert!(HomeFeed::should_prefetch(0, 0));
        assert!(HomeFeed::should_prefetch(20, 15));
        assert!(!HomeFeed::should_prefetch(20, 14));
    }
}
