//! Domain layer for cloud-logs.
//!
//! Contains the types shared by every sink:
//! - `Severity`: the level label attached to a message
//! - `LogEntry`: one emitted log line
//! - `ErrorReport`: what `Logger::catch` captures from an error
//! - `LogError`: top-level error type

pub mod error;
pub mod error_report;
pub mod log_entry;
pub mod severity;

pub use error::LogError;
pub use error_report::{ErrorReport, ReportLocation};
pub use log_entry::LogEntry;
pub use severity::Severity;
