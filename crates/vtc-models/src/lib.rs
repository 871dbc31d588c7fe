//! Shared data models for the VTC transcode trigger.
//!
//! This crate provides Serde-serializable types for:
//! - Storage-change notifications (the inbound trigger payload)
//! - Transcoder jobs and their lifecycle states

pub mod event;
pub mod job;

// Re-export common types
pub use event::{EventError, StorageEvent};
pub use job::{Job, JobError, JobId, JobState};
