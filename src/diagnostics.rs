//! Subscriber setup for the crate's own `tracing` output (retry warnings,
//! token refreshes). This is separate from the records a `Logger` writes.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsError {
    #[error("Invalid filter '{filter}': {details}")]
    InvalidFilter { filter: String, details: String },
    #[error("Failed to set global tracing subscriber: {0}")]
    SubscriberInstall(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warn => "warn",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Debug => "debug",
            DiagnosticLevel::Trace => "trace",
        }
    }
}

/// HTTP internals stay quiet regardless of the chosen level.
const DEFAULT_DIRECTIVES: &[(&str, DiagnosticLevel)] = &[
    ("hyper", DiagnosticLevel::Warn),
    ("hyper_util", DiagnosticLevel::Warn),
    ("reqwest", DiagnosticLevel::Warn),
    ("rustls", DiagnosticLevel::Warn),
];

pub fn build_filter_string(level: DiagnosticLevel) -> String {
    let mut filter_parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 1);
    filter_parts.push(level.as_str().to_string());

    for (target, target_level) in DEFAULT_DIRECTIVES {
        filter_parts.push(format!("{}={}", target, target_level.as_str()));
    }

    filter_parts.join(",")
}

/// Installs a compact stderr subscriber. Only the first call does any work;
/// later calls return the first call's result.
pub fn init_diagnostics(level: DiagnosticLevel) -> Result<(), DiagnosticsError> {
    static INIT: OnceLock<Result<(), DiagnosticsError>> = OnceLock::new();

    INIT.get_or_init(|| {
        let filter_string = build_filter_string(level);
        let env_filter =
            EnvFilter::try_new(&filter_string).map_err(|e| DiagnosticsError::InvalidFilter {
                filter: filter_string.clone(),
                details: e.to_string(),
            })?;

        let subscriber = tracing_subscriber::registry().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .compact(),
        );

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| DiagnosticsError::SubscriberInstall(e.to_string()))
    })
    .clone()
}
