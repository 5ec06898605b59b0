mod common;

use cloud_logs::cloud::TransportError;
use cloud_logs::{Backoff, CloudSink, LogError, Logger, Mode, RetryConfig, Severity, Sink};
use common::{Call, CallLog, FlakyReporter, FlakyWriter, fast_backoff, unavailable};
use std::fmt;
use std::time::Duration;

fn cloud_logger(calls: &CallLog, write_failures: u32, report_failures: u32) -> Logger {
    let sink = CloudSink::new(
        Box::new(FlakyWriter::new(calls.clone(), write_failures)),
        Box::new(FlakyReporter::new(calls.clone(), report_failures)),
        fast_backoff(),
    );
    Logger::from_sink("trading", Mode::Cloud, Box::new(sink))
}

fn log_text(text: &str, severity: &str) -> Call {
    Call::LogText {
        text: text.to_string(),
        severity: severity.to_string(),
    }
}

#[test]
fn test_each_level_sends_once_with_its_severity() {
    let calls = CallLog::default();
    let logger = cloud_logger(&calls, 0, 0);

    logger.debug("d").unwrap();
    logger.info("i").unwrap();
    logger.warn("w").unwrap();
    logger.error("e").unwrap();

    assert_eq!(
        *calls.lock(),
        vec![
            log_text("d", "DEBUG"),
            log_text("i", "INFO"),
            log_text("w", "WARNING"),
            log_text("e", "ERROR"),
        ]
    );
}

#[test]
fn test_failures_below_budget_are_hidden() {
    for failures in 0..5 {
        let calls = CallLog::default();
        let logger = cloud_logger(&calls, failures, 0);

        assert!(logger.info("tick").is_ok(), "{} failures", failures);
        assert_eq!(calls.lock().len() as u32, failures + 1);
    }
}

#[test]
fn test_five_failures_surface_without_sixth_attempt() {
    let calls = CallLog::default();
    let logger = cloud_logger(&calls, 10, 0);

    let err = logger.warn("tock").unwrap_err();

    assert_eq!(calls.lock().len(), 5);
    match err {
        LogError::RetriesExhausted {
            operation,
            attempts,
            source,
        } => {
            assert_eq!(operation, "log_text");
            assert_eq!(attempts, 5);
            assert!(matches!(source, TransportError::HttpError { status: 503, .. }));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
}

#[test]
fn test_scheduled_delays_strictly_increase() {
    for jitter in [false, true] {
        let backoff = Backoff::new(RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(60),
            jitter,
        })
        .unwrap();

        let mut delays = Vec::new();
        let result: Result<(), LogError> =
            backoff.retry_with_sleep("log_text", |_| Err(unavailable()), |d| delays.push(d));

        assert!(result.is_err());
        assert_eq!(delays.len(), 4);
        for pair in delays.windows(2) {
            assert!(pair[1] > pair[0], "jitter={} delays={:?}", jitter, delays);
        }
    }
}

#[derive(Debug)]
struct TradeError {
    cause: std::io::Error,
}

impl fmt::Display for TradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade for GM failed")
    }
}

impl std::error::Error for TradeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[test]
fn test_catch_reports_before_critical_line() {
    let calls = CallLog::default();
    let logger = cloud_logger(&calls, 0, 0);
    let error = TradeError {
        cause: std::io::Error::other("connection reset"),
    };

    logger.catch(&error).unwrap();

    assert_eq!(
        *calls.lock(),
        vec![
            Call::ReportException {
                message: "trade for GM failed\nCaused by: connection reset".to_string(),
            },
            log_text("trade for GM failed", "CRITICAL"),
        ]
    );
}

#[test]
fn test_catch_steps_have_independent_budgets() {
    let calls = CallLog::default();
    // Four failures in each step still fit inside separate five-attempt budgets.
    let logger = cloud_logger(&calls, 4, 4);

    assert!(logger.catch(&std::io::Error::other("late fill")).is_ok());

    let calls = calls.lock();
    let reports = calls
        .iter()
        .filter(|c| matches!(c, Call::ReportException { .. }))
        .count();
    let lines = calls
        .iter()
        .filter(|c| matches!(c, Call::LogText { .. }))
        .count();
    assert_eq!(reports, 5);
    assert_eq!(lines, 5);
}

#[test]
fn test_sink_is_shareable_across_threads() {
    let calls = CallLog::default();
    let logger = std::sync::Arc::new(cloud_logger(&calls, 0, 0));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = logger.clone();
            std::thread::spawn(move || logger.info(&format!("worker {}", i)))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
    assert_eq!(calls.lock().len(), 4);
}

#[test]
fn test_emit_entry_directly() {
    let calls = CallLog::default();
    let sink = CloudSink::new(
        Box::new(FlakyWriter::new(calls.clone(), 0)),
        Box::new(FlakyReporter::new(calls.clone(), 0)),
        fast_backoff(),
    );

    sink.emit(&cloud_logs::LogEntry::new("raw", Severity::Critical))
        .unwrap();

    assert_eq!(*calls.lock(), vec![log_text("raw", "CRITICAL")]);
}
