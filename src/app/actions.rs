//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O. It returns
//! a list of [`Action`]s that the plugin runtime executes in order: HTTP
//! requests through the host, timer wakeups, preference writes.
//!
//! # Example
//!
//! ```
//! use votefeed::app::Action;
//! use std::time::Duration;
//!
//! let actions = vec![Action::ScheduleWakeup { after: Duration::from_millis(300) }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::api::ApiRequest;
use std::time::Duration;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Closes the plugin pane.
    CloseFocus,

    /// Performs a GET request. The response comes back as
    /// [`Event::HttpResponse`](crate::app::Event::HttpResponse) carrying the
    /// request's context.
    Fetch(ApiRequest),

    /// Asks the host to deliver [`Event::Tick`](crate::app::Event::Tick)
    /// after the given delay.
    ScheduleWakeup {
        after: Duration,
    },

    /// Persists a preference value.
    SavePreference {
        key: String,
        value: String,
    },
}
