//! Transcoder client error types.

use thiserror::Error;

/// Result type for Transcoder operations.
pub type TranscoderResult<T> = Result<T, TranscoderError>;

/// Errors that can occur while talking to the transcoding service.
#[derive(Debug, Error)]
pub enum TranscoderError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscoderError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    /// Map an HTTP status from the service onto the error taxonomy.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            400 => Self::InvalidArgument(msg),
            401 => Self::AuthError(msg),
            403 => Self::PermissionDenied(msg),
            404 => Self::NotFound(msg),
            429 => Self::QuotaExceeded(msg),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(msg),
        }
    }

    /// Check if error is retryable by a caller that chooses to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TranscoderError::Network(_)
                | TranscoderError::QuotaExceeded(_)
                | TranscoderError::ServerError(_, _)
        )
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            TranscoderError::InvalidArgument(_) => Some(400),
            TranscoderError::AuthError(_) => Some(401),
            TranscoderError::PermissionDenied(_) => Some(403),
            TranscoderError::NotFound(_) => Some(404),
            TranscoderError::QuotaExceeded(_) => Some(429),
            TranscoderError::ServerError(status, _) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_400() {
        let err = TranscoderError::from_http_status(400, "bad template id");
        assert!(matches!(err, TranscoderError::InvalidArgument(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_http_status_403() {
        let err = TranscoderError::from_http_status(403, "missing role");
        assert!(matches!(err, TranscoderError::PermissionDenied(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_http_status_404() {
        let err = TranscoderError::from_http_status(404, "no such job");
        assert!(matches!(err, TranscoderError::NotFound(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_http_status_429() {
        let err = TranscoderError::from_http_status(429, "quota");
        assert!(matches!(err, TranscoderError::QuotaExceeded(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_http_status_503() {
        let err = TranscoderError::from_http_status(503, "unavailable");
        assert!(matches!(err, TranscoderError::ServerError(503, _)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_http_status_getter() {
        assert_eq!(
            TranscoderError::ServerError(502, "bad gateway".into()).http_status(),
            Some(502)
        );
        assert_eq!(TranscoderError::QuotaExceeded("q".into()).http_status(), Some(429));
        assert_eq!(TranscoderError::request_failed("x").http_status(), None);
    }
}
