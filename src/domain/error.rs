//! Error types for the feed client.
//!
//! This module defines the centralized error type [`FeedError`] and a type alias
//! [`Result`] used throughout the crate. Variants follow the failure taxonomy of
//! the home feed: record mapping, API envelopes, transport, decoding, and the
//! local concerns (storage, theme, configuration).

use thiserror::Error;

/// The main error type for feed operations.
///
/// # Examples
///
/// ```
/// use votefeed::FeedError;
///
/// let err = FeedError::Api("rate limited".to_string());
/// assert_eq!(err.to_string(), "API error: rate limited");
/// ```
#[derive(Debug, Error)]
pub enum FeedError {
    /// A raw API record could not be turned into an `EventSummary`.
    ///
    /// Local to one record. The caller decides whether the whole page is
    /// rejected (the default) or the record is skipped.
    #[error("Mapping error for event {event_id}: {reason}")]
    Mapping {
        /// Public id of the offending record, or `"<unknown>"` if missing.
        event_id: String,
        /// What was wrong with the record.
        reason: String,
    },

    /// The API answered with an envelope whose `success` flag is false.
    #[error("API error: {0}")]
    Api(String),

    /// The request did not produce a usable HTTP response.
    #[error("Transport error (status {status}): {message}")]
    Transport {
        /// HTTP status code reported by the host, 0 when none was received.
        status: u16,
        /// Description of the failure.
        message: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Reading or writing the preference store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// Builds a [`FeedError::Mapping`] for the given record id.
    pub fn mapping(event_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Mapping {
            event_id: event_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized `Result` type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
