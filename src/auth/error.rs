// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::auth::models::Role;
use crate::error::ErrorResponse;

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    /// User lacks required permissions for the operation
    #[error("Insufficient permissions: required role '{required}', but user has role '{actual}'")]
    InsufficientPermissions { required: Role, actual: Role },

    /// Configuration error in the identity system
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code used in the error envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InsufficientPermissions { .. } => "FORBIDDEN",
            AuthError::ConfigError(_) => "INTERNAL_ERROR",
        }
    }

    /// A message that is safe to send to clients
    pub fn error_message(&self) -> String {
        match self {
            AuthError::InsufficientPermissions { required, .. } => {
                format!("Insufficient permissions: required role '{}'", required)
            }
            AuthError::ConfigError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InsufficientPermissions { required, actual } => {
                warn!(
                    "Authorization failed: required role '{}', user has role '{}'",
                    required, actual
                )
            }
            AuthError::ConfigError(msg) => error!("Identity configuration error: {}", msg),
        }

        ErrorResponse::new(self.error_code(), self.error_message())
            .into_response_with(self.status_code())
    }
}
