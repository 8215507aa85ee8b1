//! Request descriptors for the feed API.
//!
//! The client never performs I/O. It builds [`ApiRequest`] values that the
//! plugin runtime hands to the host's HTTP facility; the request `context`
//! travels with the call and comes back with the response, which is how a
//! response is matched to the query that produced it.

use crate::domain::error::{FeedError, Result};
use crate::query::{FilterSignature, QueryTag};
use std::collections::BTreeMap;
use url::Url;

/// Context key naming the request kind.
const CONTEXT_KIND: &str = "votefeed.kind";

/// Context key holding the serialized [`QueryTag`] of a page request.
const CONTEXT_TAG: &str = "votefeed.tag";

/// Context key holding the trace id active when the request was built.
const CONTEXT_TRACE: &str = "votefeed.trace_id";

const KIND_EVENTS: &str = "events";
const KIND_SYSTEM_CONFIG: &str = "system_config";

/// What a request asks for, recovered from its context on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// One page of the home feed, tagged with its query identity.
    EventsPage(QueryTag),
    /// The system parameter set.
    SystemConfig,
}

/// A GET request ready to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub kind: RequestKind,
    pub url: String,
    pub context: BTreeMap<String, String>,
}

impl ApiRequest {
    fn new(kind: RequestKind, url: Url) -> Result<Self> {
        let mut context = BTreeMap::new();

        match &kind {
            RequestKind::EventsPage(tag) => {
                context.insert(CONTEXT_KIND.to_string(), KIND_EVENTS.to_string());
                context.insert(CONTEXT_TAG.to_string(), serde_json::to_string(tag)?);
            }
            RequestKind::SystemConfig => {
                context.insert(CONTEXT_KIND.to_string(), KIND_SYSTEM_CONFIG.to_string());
            }
        }

        if let Some(trace_id) = current_trace_id() {
            context.insert(CONTEXT_TRACE.to_string(), trace_id);
        }

        Ok(Self {
            kind,
            url: url.into(),
            context,
        })
    }

    /// Recovers the request kind from a context map returned by the host.
    ///
    /// Returns `None` for contexts that were not produced by this client.
    #[must_use]
    pub fn kind_from_context(context: &BTreeMap<String, String>) -> Option<RequestKind> {
        match context.get(CONTEXT_KIND)?.as_str() {
            KIND_EVENTS => {
                let raw = context.get(CONTEXT_TAG)?;
                match serde_json::from_str::<QueryTag>(raw) {
                    Ok(tag) => Some(RequestKind::EventsPage(tag)),
                    Err(e) => {
                        tracing::debug!(error = %e, "unreadable query tag in request context");
                        None
                    }
                }
            }
            KIND_SYSTEM_CONFIG => Some(RequestKind::SystemConfig),
            _ => None,
        }
    }
}

/// Builds requests against one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` (for example `https://example.org/api`).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the URL cannot be parsed or cannot be
    /// a base for relative paths.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| FeedError::Config(format!("invalid api_base_url {base_url:?}: {e}")))?;

        if base.cannot_be_a_base() {
            return Err(FeedError::Config(format!("api_base_url {base_url:?} cannot be a base URL")));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// `GET events?status=&search=&hashtag=&sort=&order=&offset=&limit=`
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be serialized into the context.
    pub fn events_page(&self, tag: QueryTag, limit: usize) -> Result<ApiRequest> {
        let mut url = self.endpoint("events")?;
        append_filters(&mut url, &tag.signature, tag.offset, limit);
        ApiRequest::new(RequestKind::EventsPage(tag), url)
    }

    /// `GET system/config`
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built.
    pub fn system_config(&self) -> Result<ApiRequest> {
        let url = self.endpoint("system/config")?;
        ApiRequest::new(RequestKind::SystemConfig, url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| FeedError::Config(format!("cannot build endpoint {path:?}: {e}")))
    }
}

fn append_filters(url: &mut Url, signature: &FilterSignature, offset: usize, limit: usize) {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("status", signature.status.as_param());

    let search = signature.search.trim();
    if !search.is_empty() {
        pairs.append_pair("search", search);
    }
    if let Some(tag) = signature.hashtag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        pairs.append_pair("hashtag", tag.trim_start_matches('#'));
    }

    pairs
        .append_pair("sort", signature.sort_field.as_param())
        .append_pair("order", signature.sort_order.as_param())
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &limit.to_string());
}

/// Trace id of the current span, when an OpenTelemetry context is active.
fn current_trace_id() -> Option<String> {
    use opentelemetry::trace::TraceContextExt;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let context = tracing::Span::current().context();
    let span = context.span();
    let span_context = span.span_context();

    span_context
        .is_valid()
        .then(|| format!("{:032x}", span_context.trace_id()))
}
