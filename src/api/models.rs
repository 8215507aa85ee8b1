//! Raw API payload types.
//!
//! These mirror the JSON the list API returns and are kept separate from the
//! domain model: every field a record could omit is optional here, and the
//! mapper decides which omissions are fatal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A satoshi amount as the API sends it: a JSON integer, or a decimal string
/// when the value may exceed what JavaScript clients can hold exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Text(String),
}

/// One reply attached to an event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReply {
    pub id: Option<serde_json::Value>,
    #[serde(alias = "content")]
    pub body: Option<String>,
    #[serde(alias = "weight_percentage", alias = "percentage")]
    pub weight_percent: Option<f64>,
    #[serde(alias = "amount")]
    pub amount_satoshi: Option<RawAmount>,
}

/// One entry of the event list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: Option<i64>,
    pub event_id: Option<String>,
    pub status: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(alias = "total_reward_satoshi")]
    pub total_reward: Option<RawAmount>,
    #[serde(alias = "total_stake_satoshi")]
    pub total_stake: Option<RawAmount>,
    pub participants_count: Option<u64>,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub deadline_at: Option<String>,
    pub ended_at: Option<String>,
    #[serde(default)]
    pub top_replies: Vec<RawReply>,
}

/// `data` payload of the event list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<RawEvent>,
    #[serde(default)]
    pub total: u64,
    /// Explicit end-of-data signal. Absent means "trust the item count".
    #[serde(default, alias = "hasMore")]
    pub has_more: Option<bool>,
}

/// `data` payload of the system configuration endpoint.
///
/// The parameter set is owned by the server; the client reads the few keys
/// it knows and keeps the rest verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl SystemConfig {
    /// Returns a parameter as a string, if present and scalar.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.params.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Returns a parameter as an unsigned integer, accepting numeric strings.
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.params.get(key)? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_numbers_and_strings() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id":1,"event_id":"e","total_reward":100,"total_stake":"9007199254740993"}"#,
        )
        .unwrap();
        assert_eq!(raw.total_reward, Some(RawAmount::Integer(100)));
        assert_eq!(raw.total_stake, Some(RawAmount::Text("9007199254740993".to_string())));
        assert!(raw.hashtags.is_empty());
    }

    #[test]
    fn page_accepts_camel_case_has_more() {
        let page: EventsPage = serde_json::from_str(r#"{"items":[],"total":3,"hasMore":false}"#).unwrap();
        assert_eq!(page.has_more, Some(false));
        assert_eq!(page.total, 3);
    }

    #[test]
    fn system_config_keeps_unknown_keys() {
        let config: SystemConfig =
            serde_json::from_str(r#"{"min_stake":"5000","maintenance":false,"banner":"hi"}"#).unwrap();
        assert_eq!(config.get_u64("min_stake"), Some(5000));
        assert_eq!(config.get_str("maintenance").as_deref(), Some("false"));
        assert_eq!(config.get_str("banner").as_deref(), Some("hi"));
        assert_eq!(config.get_str("missing"), None);
    }
}
