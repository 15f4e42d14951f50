//! Error types for the listings backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the listings backend.
#[derive(Error, Debug)]
pub enum AppError {
    /// Listing not found in the repository
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The cache store could not be reached (refused, timed out, dropped)
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A cached or outgoing payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the error means the cache store is unreachable.
    pub fn is_cache_unavailable(&self) -> bool {
        matches!(self, AppError::CacheUnavailable(_))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_timeout()
            || err.is_connection_dropped()
        {
            AppError::CacheUnavailable(err.to_string())
        } else {
            AppError::Internal(format!("redis: {}", err))
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the listings backend.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::CacheUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_redis_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: AppError = redis::RedisError::from(io).into();
        assert!(err.is_cache_unavailable());
    }

    #[test]
    fn test_redis_type_error_is_internal() {
        let redis_err =
            redis::RedisError::from((redis::ErrorKind::TypeError, "unexpected reply"));
        let err: AppError = redis_err.into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
