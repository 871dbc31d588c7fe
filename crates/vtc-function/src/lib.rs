//! Storage-triggered transcode job submitter.
//!
//! On a bucket upload notification this function submits a transcode job
//! from the fixed web-HD preset and polls the job until it reaches a
//! terminal state. The invocation completes only once the job has either
//! succeeded, failed, or the polling deadline elapsed.

pub mod config;
pub mod error;
pub mod handler;
pub mod poller;
pub mod server;

pub use config::FunctionConfig;
pub use error::{FunctionError, FunctionResult};
pub use server::{create_router, AppState};
