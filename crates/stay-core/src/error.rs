//! # API Error Types
//!
//! Typed error handling for the stay-booking backend.
//! Store, payment, and HTTP operations return `Result<T, ApiError>`.

use thiserror::Error;

/// Core error type for all backend operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or unverifiable bearer token
    #[error("Unauthorized access")]
    Unauthorized,

    /// Authenticated identity does not own the requested resource
    #[error("Forbidden access")]
    Forbidden,

    /// Document store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap any store-layer failure
    pub fn store(err: impl std::fmt::Display) -> Self {
        ApiError::Store(err.to_string())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Configuration(_) => 500,
            ApiError::InvalidRequest(_) => 400,
            ApiError::Unauthorized => 401,
            ApiError::Forbidden => 403,
            ApiError::Store(_) => 500,
            ApiError::ProviderError { .. } => 502,
            ApiError::NetworkError(_) => 503,
            ApiError::Serialization(_) => 500,
            ApiError::Internal(_) => 500,
        }
    }
}

/// Result type alias for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), 401);
        assert_eq!(ApiError::Forbidden.status_code(), 403);
        assert_eq!(ApiError::InvalidRequest("test".into()).status_code(), 400);
        assert_eq!(
            ApiError::ProviderError {
                provider: "stripe".into(),
                message: "boom".into()
            }
            .status_code(),
            502
        );
        assert_eq!(ApiError::store("locked").status_code(), 500);
    }

    #[test]
    fn test_fixed_auth_messages() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized access");
        assert_eq!(ApiError::Forbidden.to_string(), "Forbidden access");
    }
}
