#![warn(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Durations in millis fit in u64
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

//! Thin logging facade over Google Cloud Logging and Error Reporting.
//!
//! A [`Logger`] is bound once to either the cloud backend or a local file.
//! Cloud calls are retried with exponential backoff before an error reaches
//! the caller.

pub mod cloud;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod logger;
pub mod retry;
pub mod sink;

pub use config::{CloudConfig, ConfigError, Credentials, LocalConfig, LoggerConfig, Mode};
pub use domain::{ErrorReport, LogEntry, LogError, Severity};
pub use logger::Logger;
pub use retry::{Backoff, RetryConfig};
pub use sink::{CloudSink, LocalSink, Sink};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
