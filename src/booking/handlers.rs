// HTTP handlers for reservation endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::auth::{AdminIdentity, Identity, MaybeIdentity};
use crate::booking::{
    AdminListingQuery, BookingError, CancelBookingRequest, HorizonWindow, LifecycleOutcome, Page,
    ReservationListItem, ReservationPage, UserListingQuery,
};
use crate::error::{ApiError, ErrorResponse};
use crate::validation::validate_positive_id;
use crate::AppState;

/// Anonymous callers cannot touch reservations
pub(crate) fn require_identity(identity: MaybeIdentity) -> Result<Identity, BookingError> {
    identity.0.ok_or(BookingError::Unauthenticated)
}

fn check_id(id: i64) -> Result<(), BookingError> {
    validate_positive_id(id)
        .map_err(|_| BookingError::ValidationRejected(format!("Invalid booking id: {}", id)))
}

/// Handler for GET /api/calendar/window
/// Selectable date window, evaluated against today's date
#[utoipa::path(
    get,
    path = "/api/calendar/window",
    responses(
        (status = 200, description = "Inclusive bounds of selectable dates", body = HorizonWindow)
    ),
    tag = "calendar"
)]
pub async fn calendar_window_handler(State(state): State<AppState>) -> Json<HorizonWindow> {
    Json(state.horizon.window(state.today()))
}

/// Handler for GET /api/bookings
/// Reservations of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(UserListingQuery),
    responses(
        (status = 200, description = "One page of the caller's reservations", body = ReservationPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 502, description = "Booking Service failure", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn list_user_bookings_handler(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Query(query): Query<UserListingQuery>,
) -> Result<Json<Page<ReservationListItem>>, ApiError> {
    query.validate()?;
    let identity = require_identity(identity)?;

    let page = state.lifecycle.list_for_user(&identity, query).await?;
    Ok(Json(page.map(ReservationListItem::from)))
}

/// Handler for GET /api/admin/bookings
/// All reservations, filtered by keyword and status (Admin only)
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(AdminListingQuery),
    responses(
        (status = 200, description = "One page of reservations", body = ReservationPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 502, description = "Booking Service failure", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn list_all_bookings_handler(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Query(query): Query<AdminListingQuery>,
) -> Result<Json<Page<ReservationListItem>>, ApiError> {
    query.validate()?;

    let page = state.lifecycle.list_all(&identity, query).await?;
    Ok(Json(page.map(ReservationListItem::from)))
}

/// Handler for PATCH /api/bookings/{id}/cancel
/// Cancels a reservation; a reason is mandatory
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}/cancel",
    params(("id" = i64, Path, description = "Reservation id")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Reservation cancelled", body = LifecycleOutcome),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Reservation is already final", body = ErrorResponse),
        (status = 422, description = "Missing reason", body = ErrorResponse,
            example = json!({"error_code": "VALIDATION_REJECTED", "message": "A cancellation reason is required"})),
        (status = 502, description = "Booking Service failure", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<i64>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    let identity = require_identity(identity)?;
    check_id(id)?;

    let outcome = state.lifecycle.cancel(id, &request.reason, &identity).await?;
    Ok(Json(outcome))
}

/// Handler for PATCH /api/bookings/{id}/confirm
/// Confirms a pending reservation (Admin only)
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}/confirm",
    params(("id" = i64, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation confirmed", body = LifecycleOutcome),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Reservation is already final", body = ErrorResponse),
        (status = 502, description = "Booking Service failure", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn confirm_booking_handler(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    check_id(id)?;

    let outcome = state.lifecycle.confirm(id, &identity).await?;
    Ok(Json(outcome))
}

/// Handler for DELETE /api/bookings/{id}
/// Hard-deletes a reservation regardless of its status
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    params(("id" = i64, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation deleted", body = LifecycleOutcome),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 502, description = "Booking Service failure", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn remove_booking_handler(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<i64>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    let identity = require_identity(identity)?;
    check_id(id)?;

    let outcome = state.lifecycle.remove(id, &identity).await?;
    Ok(Json(outcome))
}
