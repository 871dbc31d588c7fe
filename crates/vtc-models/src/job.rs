//! Transcoder job records and lifecycle states.
//!
//! These types mirror the wire shape of the remote service's job resource.
//! The job is owned by the remote service; this system only ever holds the
//! read-only view returned by the create and get calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a transcode job.
///
/// The service assigns the id; locally it is the trailing segment of the
/// fully-qualified job name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Extract the id from a fully-qualified job name
    /// (`projects/{p}/locations/{l}/jobs/{id}`).
    pub fn from_job_name(name: &str) -> Self {
        let id = name.rsplit('/').next().unwrap_or(name);
        Self(id.to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Job accepted, waiting for capacity
    Pending,
    /// Job is being processed
    Running,
    /// Job completed successfully
    Succeeded,
    /// Job failed
    Failed,
    /// State not yet reported (and any value this build does not know)
    #[default]
    #[serde(rename = "PROCESSING_STATE_UNSPECIFIED", other)]
    Unspecified,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Unspecified => "PROCESSING_STATE_UNSPECIFIED",
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
        }
    }

    /// Check if this is a terminal state (no more polling needed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error status attached to a failed job by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
    /// Canonical status code
    #[serde(default)]
    pub code: i32,
    /// Human-readable failure description
    #[serde(default)]
    pub message: String,
}

/// Read-only view of a transcode job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Fully-qualified resource name assigned by the service
    pub name: String,

    /// Current lifecycle state
    #[serde(default)]
    pub state: JobState,

    /// Source media location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_uri: Option<String>,

    /// Destination prefix for transcoded output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_uri: Option<String>,

    /// Preset template the job was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    /// When the job was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    /// When processing started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// When the job reached a terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Failure status, present on failed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
}

impl Job {
    /// Derive the short job id from the fully-qualified name.
    pub fn id(&self) -> JobId {
        JobId::from_job_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_from_job_name() {
        let id = JobId::from_job_name("projects/my-proj/locations/us-central1/jobs/abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_job_id_from_bare_name() {
        // No slash: the whole string is the id.
        let id = JobId::from_job_name("abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_state_terminality() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(!JobState::Unspecified.is_terminal());
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(serde_json::to_string(&JobState::Succeeded).unwrap(), "\"SUCCEEDED\"");
        let state: JobState = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(state, JobState::Running);
    }

    #[test]
    fn test_state_unknown_value_maps_to_unspecified() {
        let state: JobState = serde_json::from_str("\"SOME_FUTURE_STATE\"").unwrap();
        assert_eq!(state, JobState::Unspecified);
    }

    #[test]
    fn test_job_deserializes_service_response() {
        let json = r#"{
            "name": "projects/my-proj/locations/us-central1/jobs/7f9c24e8",
            "inputUri": "gs://in/video.mp4",
            "outputUri": "gs://out/7f9c24e8-4a3d/",
            "templateId": "preset/web-hd",
            "state": "RUNNING",
            "createTime": "2025-08-30T14:00:35Z",
            "startTime": "2025-08-30T14:00:40Z"
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id().as_str(), "7f9c24e8");
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.template_id.as_deref(), Some("preset/web-hd"));
        assert!(job.end_time.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_failed_job_carries_error_status() {
        let json = r#"{
            "name": "projects/p/locations/l/jobs/bad",
            "state": "FAILED",
            "error": {"code": 3, "message": "Unsupported input codec"}
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert!(job.state.is_terminal());
        assert_eq!(job.error.unwrap().message, "Unsupported input codec");
    }
}
