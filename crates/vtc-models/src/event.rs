//! Storage-change notification payload.
//!
//! A finalize notification on a bucket carries the object metadata below.
//! Only `bucket` and `name` drive the transcode request; the remaining
//! fields are kept for logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for event validation.
pub type EventResult<T> = Result<T, EventError>;

/// Errors raised by [`StorageEvent::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("event has an empty bucket")]
    EmptyBucket,

    #[error("event has an empty object name")]
    EmptyName,
}

/// A storage-change notification for a single object.
///
/// Produced by the platform once per upload; consumed once per invocation
/// and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Bucket holding the uploaded object
    pub bucket: String,

    /// Object key within the bucket
    pub name: String,

    /// Content type reported by the upload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Object generation (changes on overwrite)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,

    /// Object size in bytes, as reported by the notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Upload timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

impl StorageEvent {
    /// Create an event from its two required fields.
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
            content_type: None,
            generation: None,
            size: None,
            time_created: None,
        }
    }

    /// Reject events that cannot form a valid input URI.
    pub fn validate(&self) -> EventResult<()> {
        if self.bucket.is_empty() {
            return Err(EventError::EmptyBucket);
        }
        if self.name.is_empty() {
            return Err(EventError::EmptyName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_validate_ok() {
        let event = StorageEvent::new("uploads", "videos/raw.mp4");
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_event_validate_empty_bucket() {
        let event = StorageEvent::new("", "videos/raw.mp4");
        assert_eq!(event.validate(), Err(EventError::EmptyBucket));
    }

    #[test]
    fn test_event_validate_empty_name() {
        let event = StorageEvent::new("uploads", "");
        assert_eq!(event.validate(), Err(EventError::EmptyName));
    }

    #[test]
    fn test_event_deserializes_notification_payload() {
        // Shape of a real finalize notification; unknown fields are ignored.
        let json = r#"{
            "kind": "storage#object",
            "bucket": "my-input-bucket",
            "name": "clips/session-42.mov",
            "contentType": "video/quicktime",
            "generation": "1725031234567890",
            "size": "104857600",
            "timeCreated": "2025-08-30T14:00:34.567Z",
            "metageneration": "1"
        }"#;

        let event: StorageEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.bucket, "my-input-bucket");
        assert_eq!(event.name, "clips/session-42.mov");
        assert_eq!(event.content_type.as_deref(), Some("video/quicktime"));
        assert!(event.time_created.is_some());
    }
}
