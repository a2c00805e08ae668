// Error handling module for the booking gateway
// Provides the shared error envelope and the gateway-level error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use tracing::{debug, error, warn};

use crate::auth::AuthError;
use crate::booking::BookingError;

/// Consistent error response structure
///
/// Every error leaving the gateway uses this JSON shape so the UI can show
/// `message` directly and branch on `error_code`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "VALIDATION_REJECTED", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable message, safe for display
    pub message: String,

    /// Optional additional details (e.g. field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Pair the envelope with a status code and render it
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Gateway-level error type
///
/// Handlers return `Result<T, ApiError>`; module errors convert into it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed `validator` checks
    #[error("Request validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Unknown session or resource
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal failures; details never reach the client
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn session_not_found(id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: "Session".to_string(),
            id: id.to_string(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Booking(err) => err.status_code(),
            ApiError::Auth(err) => err.status_code(),
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(serde_json::to_value(&errors).unwrap_or(serde_json::json!({})))
                    .into_response_with(StatusCode::BAD_REQUEST)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id))
                    .into_response_with(StatusCode::NOT_FOUND)
            }
            ApiError::Booking(err) => err.into_response(),
            ApiError::Auth(err) => err.into_response(),
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Log helper for refused operations that never reached the remote API
pub(crate) fn log_refusal(operation: &str, reason: &dyn std::fmt::Display) {
    warn!("{} refused locally: {}", operation, reason);
}
