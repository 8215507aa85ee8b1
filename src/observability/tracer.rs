//! Tracer provider whose exporter appends finished spans to a local file.
//!
//! The plugin sandbox has no network collector to talk to, so spans are
//! written as JSON lines next to the preference file instead.

use super::file_writer::{RotatingFile, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};
use super::span_formatter::SpanRecord;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes each exported span as one JSON line.
#[derive(Debug)]
struct JsonLinesExporter {
    service: String,
    file: RotatingFile,
    stopped: bool,
}

impl JsonLinesExporter {
    fn write_batch(&self, batch: &[SpanData]) -> Result<(), TraceError> {
        for span in batch {
            let line = SpanRecord::from_span(&self.service, span)
                .to_line()
                .map_err(|e| TraceError::from(e.to_string()))?;
            self.file
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.stopped {
            Err(TraceError::from("span exporter already shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.stopped = true;
    }
}

/// Builds a provider that exports every span synchronously to `file_path`.
pub fn create_tracer_provider(service: &str, file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter {
        service: service.to_string(),
        file: RotatingFile::new(file_path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS),
        stopped: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
