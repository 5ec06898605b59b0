//! Clients for Cloud Logging and Cloud Error Reporting.
//!
//! Sinks only ever see the [`LogWriter`] and [`ErrorReporter`] traits; the
//! concrete REST clients live behind them.

pub mod auth;
pub mod client;
pub mod error_reporting;
pub mod logging;

pub use auth::TokenSource;
pub use client::CloudClient;
pub use error_reporting::{ErrorReportingClient, ServiceContext};
pub use logging::{CloudLogger, LoggingClient};

use crate::domain::{ErrorReport, LogEntry};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Anything that went wrong between us and the backend. Every variant is
/// treated as transient by the retry loop.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Writes one severity-tagged text line to a remote log stream.
#[cfg_attr(test, automock)]
pub trait LogWriter: Send + Sync {
    fn log_text(&self, entry: &LogEntry) -> Result<(), TransportError>;
}

/// Reports a captured error to a remote error-reporting service.
#[cfg_attr(test, automock)]
pub trait ErrorReporter: Send + Sync {
    fn report_exception(&self, report: &ErrorReport) -> Result<(), TransportError>;
}
