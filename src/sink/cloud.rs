use super::Sink;
use crate::cloud::{
    CloudClient, ErrorReporter, ErrorReportingClient, LogWriter, LoggingClient, ServiceContext,
};
use crate::config::CloudConfig;
use crate::domain::{ErrorReport, LogEntry, LogError, Severity};
use crate::retry::Backoff;

/// Sends records to Cloud Logging and errors to Error Reporting, each call
/// wrapped in its own retry loop.
pub struct CloudSink {
    writer: Box<dyn LogWriter>,
    reporter: Box<dyn ErrorReporter>,
    backoff: Backoff,
}

impl CloudSink {
    pub fn new(
        writer: Box<dyn LogWriter>,
        reporter: Box<dyn ErrorReporter>,
        backoff: Backoff,
    ) -> Self {
        Self {
            writer,
            reporter,
            backoff,
        }
    }

    /// Builds both REST clients over one shared transport.
    pub fn connect(name: &str, config: CloudConfig, backoff: Backoff) -> Result<Self, LogError> {
        let service = ServiceContext {
            service: name.to_string(),
            version: config.service_version.clone(),
        };

        let client = CloudClient::new(config)?;
        let writer = LoggingClient::new(client.clone()).logger(name)?;
        let reporter = ErrorReportingClient::new(client, service);

        Ok(Self::new(Box::new(writer), Box::new(reporter), backoff))
    }

    fn log_text(&self, entry: &LogEntry) -> Result<(), LogError> {
        self.backoff.retry("log_text", |_| self.writer.log_text(entry))
    }

    fn report_exception(&self, report: &ErrorReport) -> Result<(), LogError> {
        self.backoff.retry("report_exception", |_| self.reporter.report_exception(report))
    }
}

impl Sink for CloudSink {
    fn emit(&self, entry: &LogEntry) -> Result<(), LogError> {
        self.log_text(entry)
    }

    fn emit_critical(&self, report: &ErrorReport) -> Result<(), LogError> {
        self.report_exception(report)?;
        self.log_text(&LogEntry::new(report.text.clone(), Severity::Critical))
    }
}
