//! Subscriber setup.

use super::tracer;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "votefeed";

/// Filter used when `trace_level` is unset or unparsable.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Installs the global subscriber: an [`EnvFilter`] built from
/// `config.trace_level` in front of an OpenTelemetry layer that exports to
/// [`paths::trace_file`].
///
/// Best effort: returns `false` without installing anything if the data
/// directory cannot be created or a subscriber is already installed, so
/// calling it twice is harmless.
pub fn init_tracing(config: &Config) -> bool {
    let directive = config.trace_level.as_deref().unwrap_or(DEFAULT_TRACE_LEVEL);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_LEVEL));

    let data_dir = paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(SERVICE_NAME, paths::trace_file(), resource);
    let layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let installed = tracing_subscriber::registry().with(filter).with(layer).try_init().is_ok();
    if installed {
        tracing::info!(level = directive, "tracing initialized");
    }
    installed
}
