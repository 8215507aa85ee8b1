//! One-line JSON records for finished spans.
//!
//! ```json
//! {"service":"votefeed","trace_id":"4bf9…","span_id":"00f0…","parent_span_id":null,
//!  "name":"receive_page","kind":"internal","start_unix_nano":1704844800000000000,
//!  "duration_us":412,"status":"unset","attributes":{"offset":20},"events":[]}
//! ```

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize)]
pub struct SpanRecord {
    pub service: String,
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub kind: &'static str,
    pub start_unix_nano: u64,
    pub duration_us: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    pub attributes: BTreeMap<String, JsonValue>,
    pub events: Vec<EventRecord>,
}

/// A `tracing` event recorded inside a span.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub name: String,
    pub unix_nano: u64,
    pub attributes: BTreeMap<String, JsonValue>,
}

impl SpanRecord {
    #[must_use]
    pub fn from_span(service: &str, span: &SpanData) -> Self {
        let (status, status_message) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };

        let duration = span.end_time.duration_since(span.start_time).unwrap_or_default();

        Self {
            service: service.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id)),
            name: span.name.to_string(),
            kind: kind_name(&span.span_kind),
            start_unix_nano: unix_nanos(span.start_time),
            duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            status,
            status_message,
            attributes: attribute_map(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    name: event.name.to_string(),
                    unix_nano: unix_nanos(event.timestamp),
                    attributes: attribute_map(&event.attributes),
                })
                .collect(),
        }
    }

    /// Serializes the record as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; no field of the record can produce one
    /// in practice.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    let since = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since.as_nanos()).unwrap_or(u64::MAX)
}

fn attribute_map(attributes: &[KeyValue]) -> BTreeMap<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), json_value(&kv.value)))
        .collect()
}

fn json_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Array(_) => JsonValue::String(format!("{value:?}")),
    }
}
