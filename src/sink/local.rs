use super::Sink;
use crate::config::LocalConfig;
use crate::domain::{ErrorReport, LogEntry, LogError, Severity};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Appends plain text lines to a local file.
///
/// Line layout: `<asctime> <name> <pid> <thread> <LEVEL> <message>`.
/// Nothing is filtered and nothing is retried.
#[derive(Debug)]
pub struct LocalSink {
    name: String,
    path: PathBuf,
    file: Mutex<File>,
}

impl LocalSink {
    pub fn new(name: impl Into<String>, config: &LocalConfig) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;

        Ok(Self {
            name: name.into(),
            path: config.path.clone(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, entry: &LogEntry) -> Result<(), LogError> {
        let line = format_line(&self.name, entry, std::process::id(), current_thread_id());

        // One write per line under the lock keeps concurrent lines whole.
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl Sink for LocalSink {
    fn emit(&self, entry: &LogEntry) -> Result<(), LogError> {
        self.write_line(entry)
    }

    fn emit_critical(&self, report: &ErrorReport) -> Result<(), LogError> {
        self.write_line(&LogEntry::new(report.text.clone(), Severity::Critical))
    }
}

pub fn format_line(name: &str, entry: &LogEntry, pid: u32, thread_id: u64) -> String {
    let asctime = entry
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S,%3f");

    format!(
        "{} {} {} {} {} {}\n",
        asctime,
        name,
        pid,
        thread_id,
        entry.severity.as_str(),
        entry.message
    )
}

/// Process-wide number for the calling thread, assigned on its first line.
fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}
