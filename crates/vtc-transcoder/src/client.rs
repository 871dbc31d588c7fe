//! Transcoder REST API client.
//!
//! Two operations: create a job from a preset template and fetch a job's
//! current state. Requests carry a cached bearer token; a 401 caused by an
//! expired token invalidates the cache and the request is reissued once.

use std::sync::Arc;
use std::time::Duration;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, StatusCode};
use tracing::{debug, info_span, Instrument};

use vtc_models::{Job, JobId};

use crate::error::{TranscoderError, TranscoderResult};
use crate::token_cache::TokenCache;
use crate::types::JobSpec;

/// Service endpoint for the Transcoder v1 surface.
const TRANSCODER_ENDPOINT: &str = "https://transcoder.googleapis.com/v1";

// =============================================================================
// Configuration
// =============================================================================

/// Transcoder client configuration.
#[derive(Debug, Clone)]
pub struct TranscoderConfig {
    /// GCP project ID scoping all calls
    pub project_id: String,
    /// Processing region scoping all calls
    pub location: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl TranscoderConfig {
    /// Create a config for a project and region with default timeouts.
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> TranscoderResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("PROJ_ID"))
            .map_err(|_| {
                TranscoderError::auth_error("GCP_PROJECT_ID or PROJ_ID must be set")
            })?;

        let location = std::env::var("TRANSCODER_LOCATION")
            .or_else(|_| std::env::var("TRANSCODER_LOC"))
            .map_err(|_| {
                TranscoderError::auth_error("TRANSCODER_LOCATION or TRANSCODER_LOC must be set")
            })?;

        if project_id.is_empty() || location.is_empty() {
            return Err(TranscoderError::auth_error(
                "project id and location cannot be empty",
            ));
        }

        Ok(Self::new(project_id, location))
    }
}

// =============================================================================
// Client
// =============================================================================

/// Transcoder REST API client.
pub struct TranscoderClient {
    http: Client,
    config: TranscoderConfig,
    token_cache: Arc<TokenCache>,
}

impl Clone for TranscoderClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            token_cache: Arc::clone(&self.token_cache),
        }
    }
}

impl TranscoderClient {
    /// Create a new Transcoder client.
    pub fn new(config: TranscoderConfig) -> TranscoderResult<Self> {
        let auth = Self::create_auth_provider()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("vtc-transcoder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TranscoderError::Network)?;

        Ok(Self {
            http,
            config,
            token_cache: Arc::new(TokenCache::new(auth)),
        })
    }

    fn create_auth_provider() -> TranscoderResult<Arc<dyn TokenProvider>> {
        let service_account = CustomServiceAccount::from_env().map_err(|e| {
            TranscoderError::auth_error(format!("Failed to load service account: {}", e))
        })?;

        match service_account {
            Some(sa) => Ok(Arc::new(sa)),
            None => Err(TranscoderError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file.",
            )),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> TranscoderResult<Self> {
        Self::new(TranscoderConfig::from_env()?)
    }

    /// The configured project ID.
    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    /// The configured processing region.
    pub fn location(&self) -> &str {
        &self.config.location
    }

    /// Resource path of the configured location scope.
    pub fn location_path(&self) -> String {
        location_path(&self.config.project_id, &self.config.location)
    }

    /// Fully-qualified resource name of a job in the configured scope.
    pub fn job_path(&self, id: &JobId) -> String {
        format!("{}/jobs/{}", self.location_path(), id)
    }

    async fn get_token(&self) -> TranscoderResult<String> {
        self.token_cache.get_token().await
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a transcode job from a preset template.
    ///
    /// Issues exactly one create call; callers that want retries own that
    /// policy themselves.
    pub async fn create_job(&self, spec: &JobSpec) -> TranscoderResult<Job> {
        let url = format!("{}/{}/jobs", TRANSCODER_ENDPOINT, self.location_path());
        let span = info_span!("transcoder_create_job", input_uri = %spec.input_uri);

        async {
            debug!("Submitting transcode job to {}", url);

            let mut token = self.get_token().await?;
            let mut response = self
                .http
                .post(&url)
                .bearer_auth(&token)
                .json(spec)
                .send()
                .await?;
            let mut status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                let body = response.text().await.unwrap_or_default();
                if Self::is_access_token_expired(&body) {
                    self.token_cache.invalidate().await;
                    token = self.get_token().await?;
                    response = self
                        .http
                        .post(&url)
                        .bearer_auth(&token)
                        .json(spec)
                        .send()
                        .await?;
                    status = response.status();
                } else {
                    return Err(TranscoderError::from_http_status(
                        status.as_u16(),
                        format!("{} failed: {}", url, body),
                    ));
                }
            }

            match status {
                StatusCode::OK | StatusCode::CREATED => {
                    let job: Job = response.json().await?;
                    if job.name.is_empty() {
                        return Err(TranscoderError::InvalidResponse(
                            "create response is missing the job name".to_string(),
                        ));
                    }
                    Ok(job)
                }
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch the current state of a job.
    pub async fn get_job(&self, id: &JobId) -> TranscoderResult<Job> {
        let url = format!("{}/{}", TRANSCODER_ENDPOINT, self.job_path(id));
        let span = info_span!("transcoder_get_job", job_id = %id);

        async {
            let mut token = self.get_token().await?;
            let mut response = self.http.get(&url).bearer_auth(&token).send().await?;
            let mut status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                let body = response.text().await.unwrap_or_default();
                if Self::is_access_token_expired(&body) {
                    self.token_cache.invalidate().await;
                    token = self.get_token().await?;
                    response = self.http.get(&url).bearer_auth(&token).send().await?;
                    status = response.status();
                } else {
                    return Err(TranscoderError::from_http_status(
                        status.as_u16(),
                        format!("{} failed: {}", url, body),
                    ));
                }
            }

            match status {
                StatusCode::OK => {
                    let job: Job = response.json().await?;
                    Ok(job)
                }
                StatusCode::NOT_FOUND => Err(TranscoderError::not_found(self.job_path(id))),
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        }
        .instrument(span)
        .await
    }

    async fn handle_error_response(
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> TranscoderError {
        let body = response.text().await.unwrap_or_default();
        TranscoderError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

/// Resource path of a location scope.
pub fn location_path(project_id: &str, location: &str) -> String {
    format!("projects/{}/locations/{}", project_id, location)
}

// =============================================================================
// Tests
// =============================================================================
