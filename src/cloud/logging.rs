use super::client::CloudClient;
use super::{LogWriter, TransportError};
use crate::config::ConfigError;
use crate::domain::LogEntry;
use serde::Serialize;
use url::Url;

/// Only used to borrow `url`'s path-segment encoding for log ids.
const LOG_ID_BASE: &str = "https://logging.googleapis.com/";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteEntriesRequest<'a> {
    log_name: &'a str,
    resource: MonitoredResource<'a>,
    entries: [WireEntry<'a>; 1],
}

#[derive(Serialize)]
struct MonitoredResource<'a> {
    #[serde(rename = "type")]
    resource_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry<'a> {
    severity: &'static str,
    text_payload: &'a str,
    timestamp: String,
}

/// Client for the Cloud Logging `entries:write` API.
#[derive(Debug, Clone)]
pub struct LoggingClient {
    client: CloudClient,
    write_url: String,
}

impl LoggingClient {
    pub fn new(client: CloudClient) -> Self {
        let write_url = format!(
            "{}/v2/entries:write",
            client.config().logging_endpoint.trim_end_matches('/')
        );
        Self { client, write_url }
    }

    /// Returns a handle that writes to the log stream called `name`.
    pub fn logger(&self, name: &str) -> Result<CloudLogger, ConfigError> {
        let log_name = format!(
            "projects/{}/logs/{}",
            self.client.project_id(),
            encode_log_id(name)?
        );
        Ok(CloudLogger {
            client: self.clone(),
            log_name,
        })
    }
}

/// Handle on a single named log stream.
#[derive(Debug, Clone)]
pub struct CloudLogger {
    client: LoggingClient,
    log_name: String,
}

impl LogWriter for CloudLogger {
    fn log_text(&self, entry: &LogEntry) -> Result<(), TransportError> {
        let config = self.client.client.config();
        let request = WriteEntriesRequest {
            log_name: &self.log_name,
            resource: MonitoredResource {
                resource_type: &config.resource_type,
            },
            entries: [WireEntry {
                severity: entry.severity.as_str(),
                text_payload: &entry.message,
                timestamp: entry.timestamp.to_rfc3339(),
            }],
        };

        self.client.client.post_json(&self.client.write_url, &request)
    }
}

/// Log ids go into a resource path as a single segment, so slashes and
/// other path-reserved characters are percent-encoded.
fn encode_log_id(name: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(LOG_ID_BASE).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ConfigError::InvalidUrl(format!("{LOG_ID_BASE} cannot hold a path")))?
        .clear()
        .push(name);
    Ok(url.path().trim_start_matches('/').to_string())
}
