//! Response envelope shared by every API endpoint.
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "message": "event not found" }
//! ```

use crate::domain::error::{FeedError, Result};
use serde::{Deserialize, Serialize};

/// Generic `{ success, data?, message? }` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Api`] carrying the server message when `success`
    /// is false, or when a successful envelope has no `data`.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "request failed".to_string());
            return Err(FeedError::Api(message));
        }

        self.data
            .ok_or_else(|| FeedError::Api("response contained no data".to_string()))
    }
}

/// Decodes an envelope from a response body and unwraps it.
///
/// # Errors
///
/// Returns [`FeedError::Decode`] if the body is not a valid envelope for `T`,
/// or the errors of [`ApiEnvelope::into_result`].
pub fn decode<T>(body: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    envelope.into_result()
}

/// Decodes a host HTTP response.
///
/// A 2xx status is decoded with [`decode`]. Any other status is a
/// [`FeedError::Transport`], using the envelope message when the body has one.
///
/// # Errors
///
/// See above.
pub fn decode_response<T>(status: u16, body: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if (200..300).contains(&status) {
        return decode(body);
    }

    let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().chars().take(200).collect());

    Err(FeedError::Transport { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn success_yields_data() {
        let value: Value = decode(br#"{"success":true,"data":{"a":1}}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn failure_carries_message() {
        let err = decode::<Value>(br#"{"success":false,"message":"nope"}"#).unwrap_err();
        assert_eq!(err.to_string(), "API error: nope");
    }

    #[test]
    fn failure_without_message_gets_a_generic_one() {
        let err = decode::<Value>(br#"{"success":false}"#).unwrap_err();
        assert!(matches!(err, FeedError::Api(ref m) if m == "request failed"));
    }

    #[test]
    fn success_without_data_is_an_error() {
        assert!(decode::<Value>(br#"{"success":true}"#).is_err());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode::<Value>(b"<html>").unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn non_success_status_is_transport() {
        let err = decode_response::<Value>(503, br#"{"success":false,"message":"maintenance"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Transport { status: 503, ref message } if message == "maintenance"));

        let err = decode_response::<Value>(0, b"connection refused").unwrap_err();
        assert!(matches!(err, FeedError::Transport { status: 0, ref message } if message == "connection refused"));
    }
}
