use super::TransportError;
use crate::config::Credentials;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Tokens are refreshed this long before the metadata server says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const PROJECT_ID_PATH: &str = "/computeMetadata/v1/project/project-id";

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Supplies OAuth bearer tokens for the cloud APIs.
///
/// Metadata server tokens are cached and shared by every thread using the
/// same source; only one refresh runs at a time.
pub struct TokenSource {
    credentials: Credentials,
    metadata_endpoint: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(credentials: Credentials, metadata_endpoint: &str) -> Self {
        Self {
            credentials,
            metadata_endpoint: metadata_endpoint.trim_end_matches('/').to_string(),
            cached: Mutex::new(None),
        }
    }

    pub fn access_token(&self, http: &Client) -> Result<String, TransportError> {
        match &self.credentials {
            Credentials::Static { access_token } => Ok(access_token.clone()),
            Credentials::MetadataServer => self.metadata_token(http),
        }
    }

    fn metadata_token(&self, http: &Client) -> Result<String, TransportError> {
        let mut cached = self.cached.lock();

        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now() + REFRESH_MARGIN
        {
            return Ok(token.access_token.clone());
        }

        let url = format!("{}{}", self.metadata_endpoint, TOKEN_PATH);
        let response = http.get(url).header("Metadata-Flavor", "Google").send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::AuthError(format!(
                "Metadata server returned HTTP {} for token request",
                status.as_u16()
            )));
        }

        let token: MetadataToken = response
            .json()
            .map_err(|e| TransportError::InvalidResponse(format!("Malformed token: {}", e)))?;

        if let Some(token_type) = &token.token_type
            && !token_type.eq_ignore_ascii_case("bearer")
        {
            return Err(TransportError::AuthError(format!(
                "Unsupported token type: {}",
                token_type
            )));
        }

        debug!("Refreshed access token, expires in {}s", token.expires_in);

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(access_token)
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSource")
            .field("credentials", &self.credentials)
            .field("metadata_endpoint", &self.metadata_endpoint)
            .field("cached", &self.cached.try_lock().map(|token| token.is_some()))
            .finish()
    }
}

/// Looks up the project the instance runs in.
pub fn fetch_project_id(http: &Client, metadata_endpoint: &str) -> Result<String, TransportError> {
    let url = format!("{}{}", metadata_endpoint.trim_end_matches('/'), PROJECT_ID_PATH);
    let response = http.get(url).header("Metadata-Flavor", "Google").send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::HttpError {
            status: status.as_u16(),
            message: "Project id lookup failed".to_string(),
        });
    }

    let project_id = response.text()?.trim().to_string();
    if project_id.is_empty() {
        return Err(TransportError::InvalidResponse(
            "Metadata server returned an empty project id".to_string(),
        ));
    }

    Ok(project_id)
}
