//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the plugin runtime (main.rs) and the
//! domain/api/storage layers. Nothing here performs I/O.
//!
//! # Architecture
//!
//! ```text
//! Host events → Event → handle_event → FeedStore / HomeFeed / Scheduler → Actions
//!                   ↑                                                       ↓
//!                   └────────── HTTP responses, timer wakeups ──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: Feed state, named actions and the pure reducer
//! - [`feed`]: Pagination orchestrator with stale-response discarding
//! - [`system`]: System parameter store with periodic refresh
//! - [`timers`]: Owned timers over fire-and-forget host wakeups
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input mode state machine
//! - [`state`]: Central state container and view model computation

pub mod actions;
pub mod feed;
pub mod handler;
pub mod modes;
pub mod state;
pub mod store;
pub mod system;
pub mod timers;

pub use actions::Action;
pub use feed::{HomeFeed, PageOutcome, DEFAULT_PAGE_SIZE, PREFETCH_THRESHOLD};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, SearchFocus};
pub use state::{AppSettings, AppState};
pub use store::{FeedAction, FeedState, FeedStore, LoadState};
pub use system::SystemParamsStore;
pub use timers::{Scheduler, TimerHandle, TimerKind};
