#![allow(dead_code)]

use cloud_logs::cloud::{ErrorReporter, LogWriter, TransportError};
use cloud_logs::{Backoff, ErrorReport, LogEntry, RetryConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Calls observed across a writer/reporter pair, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LogText { text: String, severity: String },
    ReportException { message: String },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn unavailable() -> TransportError {
    TransportError::HttpError {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

/// Fails the first `failures` calls, then succeeds.
pub struct FlakyWriter {
    pub calls: CallLog,
    failures: Mutex<u32>,
}

impl FlakyWriter {
    pub fn new(calls: CallLog, failures: u32) -> Self {
        Self {
            calls,
            failures: Mutex::new(failures),
        }
    }
}

impl LogWriter for FlakyWriter {
    fn log_text(&self, entry: &LogEntry) -> Result<(), TransportError> {
        self.calls.lock().push(Call::LogText {
            text: entry.message.clone(),
            severity: entry.severity.as_str().to_string(),
        });

        let mut failures = self.failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(unavailable());
        }
        Ok(())
    }
}

pub struct FlakyReporter {
    pub calls: CallLog,
    failures: Mutex<u32>,
}

impl FlakyReporter {
    pub fn new(calls: CallLog, failures: u32) -> Self {
        Self {
            calls,
            failures: Mutex::new(failures),
        }
    }
}

impl ErrorReporter for FlakyReporter {
    fn report_exception(&self, report: &ErrorReport) -> Result<(), TransportError> {
        self.calls.lock().push(Call::ReportException {
            message: report.message.clone(),
        });

        let mut failures = self.failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(unavailable());
        }
        Ok(())
    }
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_secs(1),
        jitter: false,
    }
}

pub fn fast_backoff() -> Backoff {
    Backoff::new(fast_retry()).unwrap()
}
