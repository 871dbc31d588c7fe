//! Client for the managed video-transcoding service.
//!
//! Exposes the two operations the trigger needs: create a job from a preset
//! template and fetch a job's current state. Calls go over the service's
//! REST surface with cached OAuth tokens.

pub mod client;
pub mod error;
pub mod token_cache;
pub mod types;

pub use client::{TranscoderClient, TranscoderConfig};
pub use error::{TranscoderError, TranscoderResult};
pub use types::JobSpec;
