//! Function configuration.
//!
//! Built once at startup and passed into the handler; nothing on the
//! request path reads the environment.

use std::time::Duration;

use crate::error::{FunctionError, FunctionResult};

/// Function configuration.
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    /// GCP project ID scoping all remote calls
    pub project_id: String,
    /// Processing region scoping all remote calls
    pub location: String,
    /// Bucket receiving transcoded output
    pub output_bucket: String,
    /// Fixed delay between job status checks
    pub poll_interval: Duration,
    /// Maximum total time to wait for a terminal state
    pub poll_timeout: Duration,
    /// Server host
    pub host: String,
    /// Server port (functions contract: `PORT`)
    pub port: u16,
}

impl FunctionConfig {
    /// Create config from environment variables.
    ///
    /// The project, region and output bucket are required; the poll
    /// interval and deadline fall back to defaults.
    pub fn from_env() -> FunctionResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("PROJ_ID"))
            .map_err(|_| FunctionError::config("GCP_PROJECT_ID or PROJ_ID must be set"))?;

        let location = std::env::var("TRANSCODER_LOCATION")
            .or_else(|_| std::env::var("TRANSCODER_LOC"))
            .map_err(|_| {
                FunctionError::config("TRANSCODER_LOCATION or TRANSCODER_LOC must be set")
            })?;

        let output_bucket = std::env::var("OUTPUT_BUCKET")
            .map_err(|_| FunctionError::config("OUTPUT_BUCKET must be set"))?;

        if project_id.is_empty() || location.is_empty() || output_bucket.is_empty() {
            return Err(FunctionError::config(
                "project id, location and output bucket cannot be empty",
            ));
        }

        Ok(Self {
            project_id,
            location,
            output_bucket,
            poll_interval: Duration::from_millis(
                std::env::var("POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1500),
            ),
            poll_timeout: Duration::from_secs(
                std::env::var("POLL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1800),
            ),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "GCP_PROJECT_ID",
            "PROJ_ID",
            "TRANSCODER_LOCATION",
            "TRANSCODER_LOC",
            "OUTPUT_BUCKET",
            "POLL_INTERVAL_MS",
            "POLL_TIMEOUT_SECS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_output_bucket() {
        clear_env();
        std::env::set_var("GCP_PROJECT_ID", "proj");
        std::env::set_var("TRANSCODER_LOCATION", "us-central1");

        let result = FunctionConfig::from_env();
        assert!(result.is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("GCP_PROJECT_ID", "proj");
        std::env::set_var("TRANSCODER_LOCATION", "us-central1");
        std::env::set_var("OUTPUT_BUCKET", "out-bucket");

        let config = FunctionConfig::from_env().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(config.poll_timeout, Duration::from_secs(1800));
        assert_eq!(config.port, 8080);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_tunables() {
        clear_env();
        std::env::set_var("GCP_PROJECT_ID", "proj");
        std::env::set_var("TRANSCODER_LOCATION", "us-central1");
        std::env::set_var("OUTPUT_BUCKET", "out-bucket");
        std::env::set_var("POLL_INTERVAL_MS", "250");
        std::env::set_var("POLL_TIMEOUT_SECS", "60");

        let config = FunctionConfig::from_env().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.poll_timeout, Duration::from_secs(60));
        clear_env();
    }
}
