//! Destinations a `Logger` routes records to.

pub mod cloud;
pub mod local;

pub use cloud::CloudSink;
pub use local::LocalSink;

use crate::domain::{ErrorReport, LogEntry, LogError};

/// Capability set shared by every destination.
pub trait Sink: Send + Sync {
    /// Writes one leveled line.
    fn emit(&self, entry: &LogEntry) -> Result<(), LogError>;

    /// Records a caught error at CRITICAL.
    fn emit_critical(&self, report: &ErrorReport) -> Result<(), LogError>;
}
