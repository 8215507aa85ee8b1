//! Domain layer for the feed client.
//!
//! Core types and pure business rules, independent of the Zellij host and of
//! the HTTP transport.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`event`]: `EventSummary` model, lifecycle status and tag helpers
//! - [`currency`]: Exact satoshi to BTC conversion
//! - [`countdown`]: Lifecycle-aware relative time labels

pub mod countdown;
pub mod currency;
pub mod error;
pub mod event;

pub use countdown::format_countdown;
pub use error::{FeedError, Result};
pub use event::{EventStatus, EventSummary, TopReply};
