use crate::cloud::TransportError;
use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error returned by every `Logger` call.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client construction failed. Never retried.
    #[error("Failed to construct cloud client: {0}")]
    Construction(#[source] TransportError),

    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("Local log write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Number of transport attempts made before giving up, if this error
    /// came out of the retry loop.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            LogError::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
