//! Span export to a local JSON-lines file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → JsonLinesExporter → votefeed-spans.jsonl
//! ```
//!
//! The file lives in the plugin data directory and rotates by size, keeping
//! two numbered backups. The filter comes from the `trace_level` plugin
//! option (any `EnvFilter` directive, `info` by default).
//!
//! ```no_run
//! use votefeed::observability::init_tracing;
//! use votefeed::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("plugin loaded");
//! ```

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, DEFAULT_TRACE_LEVEL};
