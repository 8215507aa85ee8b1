//! Wire layer of the feed API.
//!
//! - [`models`]: raw response shapes as the server sends them
//! - [`envelope`]: the `{ success, data, message }` wrapper and decoding
//! - [`mapper`]: raw records to [`crate::EventSummary`]
//! - [`client`]: request descriptors executed by the plugin host

pub mod client;
pub mod envelope;
pub mod mapper;
pub mod models;

pub use client::{ApiClient, ApiRequest, RequestKind};
pub use envelope::{decode, decode_response, ApiEnvelope};
pub use mapper::{map_event, map_page, map_page_lenient};
pub use models::{EventsPage, RawEvent, SystemConfig};
