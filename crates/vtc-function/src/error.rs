//! Function error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vtc_models::{EventError, JobId};
use vtc_transcoder::TranscoderError;

pub type FunctionResult<T> = Result<T, FunctionError>;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(#[from] EventError),

    #[error("Malformed event payload: {0}")]
    MalformedEvent(String),

    #[error("Transcoder error: {0}")]
    Transcoder(#[from] TranscoderError),

    #[error("Job {job_id} did not reach a terminal state within {waited_secs}s")]
    PollTimeout { job_id: JobId, waited_secs: u64 },
}

impl FunctionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            FunctionError::InvalidEvent(_) | FunctionError::MalformedEvent(_) => {
                StatusCode::BAD_REQUEST
            }
            FunctionError::Transcoder(_) => StatusCode::BAD_GATEWAY,
            FunctionError::PollTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            FunctionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
