use super::TransportError;
use super::auth::{TokenSource, fetch_project_id};
use crate::config::CloudConfig;
use crate::domain::LogError;
use reqwest::blocking::{Client, ClientBuilder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Authenticated blocking HTTP transport shared by the logging and
/// error-reporting clients. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: Client,
    tokens: Arc<TokenSource>,
    project_id: Arc<str>,
    config: Arc<CloudConfig>,
}

impl CloudClient {
    /// Builds the transport and resolves the project id.
    ///
    /// Failures here are construction failures and are never retried.
    pub fn new(config: CloudConfig) -> Result<Self, LogError> {
        config.validate()?;

        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| LogError::Construction(TransportError::NetworkError(e)))?;

        let project_id = match &config.project_id {
            Some(project_id) => project_id.clone(),
            None => {
                let project_id = fetch_project_id(&http, &config.metadata_endpoint)
                    .map_err(LogError::Construction)?;
                info!("Resolved project id {} from metadata server", project_id);
                project_id
            }
        };

        let tokens = Arc::new(TokenSource::new(
            config.credentials.clone(),
            &config.metadata_endpoint,
        ));

        Ok(Self {
            http,
            tokens,
            project_id: project_id.into(),
            config: Arc::new(config),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// POSTs `body` as JSON with a bearer token. Any non-2xx status is an error.
    pub fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<(), TransportError> {
        let token = self.tokens.access_token(&self.http)?;
        let start = Instant::now();

        let response = self.http.post(url).bearer_auth(token).json(body).send()?;

        let status = response.status();
        debug!("POST {} -> {} in {:?}", url, status.as_u16(), start.elapsed());

        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            Err(TransportError::HttpError {
                status: status.as_u16(),
                message,
            })
        }
    }
}
