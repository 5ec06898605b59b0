pub mod duration_millis;

use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// The path local-mode loggers append to.
pub const DEFAULT_LOG_FILE: &str = "/tmp/trump2cash.log";

pub const DEFAULT_LOGGING_ENDPOINT: &str = "https://logging.googleapis.com";
pub const DEFAULT_ERROR_REPORTING_ENDPOINT: &str = "https://clouderrorreporting.googleapis.com";
pub const DEFAULT_METADATA_ENDPOINT: &str = "http://metadata.google.internal";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Where a logger sends its records. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Cloud,
    Local,
}

/// How the cloud clients obtain an OAuth access token.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// Default service account token from the GCE metadata server.
    #[default]
    MetadataServer,
    /// A pre-issued bearer token, used as is.
    Static { access_token: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::MetadataServer => f.write_str("MetadataServer"),
            Credentials::Static { .. } => f
                .debug_struct("Static")
                .field("access_token", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Resolved from the metadata server when unset.
    pub project_id: Option<String>,
    pub credentials: Credentials,
    pub logging_endpoint: String,
    pub error_reporting_endpoint: String,
    pub metadata_endpoint: String,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    /// Reported as `serviceContext.version` to Error Reporting.
    pub service_version: Option<String>,
    /// Monitored resource type attached to every log entry.
    pub resource_type: String,
    pub user_agent: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            credentials: Credentials::default(),
            logging_endpoint: DEFAULT_LOGGING_ENDPOINT.to_string(),
            error_reporting_endpoint: DEFAULT_ERROR_REPORTING_ENDPOINT.to_string(),
            metadata_endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            service_version: None,
            resource_type: "global".to_string(),
            user_agent: format!("cloud-logs/{}", crate::VERSION),
        }
    }
}

impl CloudConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, endpoint) in [
            ("logging_endpoint", &self.logging_endpoint),
            ("error_reporting_endpoint", &self.error_reporting_endpoint),
            ("metadata_endpoint", &self.metadata_endpoint),
        ] {
            Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid {field} '{endpoint}': {e}"))
            })?;
        }

        if let Some(project_id) = &self.project_id
            && project_id.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Project id must not be empty".to_string(),
            ));
        }

        if let Credentials::Static { access_token } = &self.credentials
            && access_token.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Static access token must not be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.resource_type.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Resource type must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub path: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Log stream name in cloud mode, logger name column in local mode.
    pub name: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub cloud: CloudConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>, to_cloud: bool) -> Self {
        Self {
            name: name.into(),
            mode: if to_cloud { Mode::Cloud } else { Mode::Local },
            cloud: CloudConfig::default(),
            local: LocalConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoggerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Logger name must not be empty".to_string(),
            ));
        }

        if self.mode == Mode::Cloud {
            self.cloud.validate()?;
            self.retry.validate()?;
        }

        Ok(())
    }
}
