use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ErrorResponse;
use crate::remote::RemoteError;

/// Error types for booking workflow operations
///
/// Every variant is terminal for the operation that raised it; nothing is
/// partially applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("Please sign in to book a room")]
    Unauthenticated,

    #[error("Room not found")]
    RoomNotFound,

    #[error("{0}")]
    ValidationRejected(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("This booking is already being submitted")]
    DuplicateSubmission,

    /// Non-2xx or transport failure from a remote collaborator
    #[error("{message}")]
    ServiceError { status: Option<u16>, message: String },
}

impl BookingError {
    /// Build a `ServiceError` from a remote failure
    ///
    /// The server's own message is preferred for display; `fallback` is used
    /// when the body carried none.
    pub fn service(err: &RemoteError, fallback: &str) -> Self {
        warn!("Remote call failed: {}", err);
        BookingError::ServiceError {
            status: err.status(),
            message: err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BookingError::RoomNotFound => StatusCode::NOT_FOUND,
            BookingError::ValidationRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::InvalidTransition(_) => StatusCode::CONFLICT,
            BookingError::DuplicateSubmission => StatusCode::CONFLICT,
            BookingError::ServiceError { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BookingError::Unauthenticated => "UNAUTHENTICATED",
            BookingError::RoomNotFound => "ROOM_NOT_FOUND",
            BookingError::ValidationRejected(_) => "VALIDATION_REJECTED",
            BookingError::InvalidTransition(_) => "INVALID_TRANSITION",
            BookingError::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            BookingError::ServiceError { .. } => "SERVICE_ERROR",
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let mut body = ErrorResponse::new(self.error_code(), self.to_string());
        if let BookingError::ServiceError { status: Some(status), .. } = &self {
            body = body.with_details(serde_json::json!({ "upstream_status": status }));
        }
        body.into_response_with(self.status_code())
    }
}
