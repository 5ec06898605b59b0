use crate::config::{LoggerConfig, Mode};
use crate::domain::{ErrorReport, LogEntry, LogError, Severity};
use crate::retry::Backoff;
use crate::sink::{CloudSink, LocalSink, Sink};
use std::error::Error;
use std::fmt;
use tracing::debug;

/// Logs locally or to the cloud, decided once at construction.
///
/// Every call blocks until the record is written. In cloud mode that may
/// include several backoff sleeps; an error is returned only once all
/// attempts are used up.
pub struct Logger {
    name: String,
    mode: Mode,
    sink: Box<dyn Sink>,
}

impl Logger {
    /// Creates a logger with default settings. Cloud mode authenticates
    /// through the GCE metadata server.
    pub fn new(name: impl Into<String>, to_cloud: bool) -> Result<Self, LogError> {
        Self::from_config(LoggerConfig::new(name, to_cloud))
    }

    pub fn from_config(config: LoggerConfig) -> Result<Self, LogError> {
        config.validate()?;

        let sink: Box<dyn Sink> = match config.mode {
            Mode::Cloud => {
                let backoff = Backoff::new(config.retry)?;
                Box::new(CloudSink::connect(&config.name, config.cloud, backoff)?)
            }
            Mode::Local => Box::new(LocalSink::new(config.name.clone(), &config.local)?),
        };

        debug!("Created {:?} logger {}", config.mode, config.name);

        Ok(Self {
            name: config.name,
            mode: config.mode,
            sink,
        })
    }

    /// Wraps an already built sink.
    pub fn from_sink(name: impl Into<String>, mode: Mode, sink: Box<dyn Sink>) -> Self {
        Self {
            name: name.into(),
            mode,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn debug(&self, text: &str) -> Result<(), LogError> {
        self.log(text, Severity::Debug)
    }

    pub fn info(&self, text: &str) -> Result<(), LogError> {
        self.log(text, Severity::Info)
    }

    pub fn warn(&self, text: &str) -> Result<(), LogError> {
        self.log(text, Severity::Warning)
    }

    pub fn error(&self, text: &str) -> Result<(), LogError> {
        self.log(text, Severity::Error)
    }

    /// Records a caught error.
    ///
    /// In cloud mode the error is first sent to Error Reporting and then
    /// logged at CRITICAL; each step has its own retry budget.
    #[track_caller]
    pub fn catch<E: Error + ?Sized>(&self, error: &E) -> Result<(), LogError> {
        let report = ErrorReport::capture(error);
        self.sink.emit_critical(&report)
    }

    fn log(&self, text: &str, severity: Severity) -> Result<(), LogError> {
        self.sink.emit(&LogEntry::new(text, severity))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
