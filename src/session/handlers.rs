// HTTP handlers for session drafts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::MaybeIdentity;
use crate::booking::{BookingDraft, BookingError, ModalKind, StayRange};
use crate::directory::Room;
use crate::error::{ApiError, ErrorResponse};
use crate::session::models::{
    DateRangeRequest, GuestAdjustRequest, GuestUpdateResponse, LocationRequest, ModalRequest,
    QuoteQuery, QuoteResponse, SessionView, SubmitBookingRequest, SubmitResponse,
};
use crate::AppState;

const ROOM_LOOKUP_FAILED: &str = "Could not load room, please try again!";

async fn resolve_room(state: &AppState, room_id: i64) -> Result<Option<Room>, BookingError> {
    state
        .rooms
        .find_room(room_id)
        .await
        .map_err(|err| BookingError::service(&err, ROOM_LOOKUP_FAILED))
}

async fn require_room(state: &AppState, room_id: i64) -> Result<Room, BookingError> {
    resolve_room(state, room_id)
        .await?
        .ok_or(BookingError::RoomNotFound)
}

async fn snapshot(state: &AppState, sid: Uuid) -> Result<BookingDraft, ApiError> {
    state
        .sessions
        .snapshot(sid)
        .await
        .ok_or_else(|| ApiError::session_not_found(sid))
}

/// Apply `f` to the draft and return the resulting view
async fn mutate<F>(state: &AppState, sid: Uuid, f: F) -> Result<Json<SessionView>, ApiError>
where
    F: FnOnce(&mut BookingDraft),
{
    let draft = state
        .sessions
        .update(sid, |draft| {
            f(draft);
            draft.clone()
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(sid))?;

    Ok(Json(SessionView { session_id: sid, draft }))
}

/// Handler for POST /api/sessions
/// Starts a session with a default draft
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionView)
    ),
    tag = "sessions"
)]
pub async fn create_session_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (session_id, draft) = state.sessions.create(state.today()).await;
    (StatusCode::CREATED, Json(SessionView { session_id, draft }))
}

/// Handler for GET /api/sessions/{sid}
#[utoipa::path(
    get,
    path = "/api/sessions/{sid}",
    params(("sid" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current draft", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn get_session_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let draft = snapshot(&state, sid).await?;
    Ok(Json(SessionView { session_id: sid, draft }))
}

/// Handler for DELETE /api/sessions/{sid}
#[utoipa::path(
    delete,
    path = "/api/sessions/{sid}",
    params(("sid" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(sid).await {
        return Err(ApiError::session_not_found(sid));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT /api/sessions/{sid}/dates
/// Sets both dates and the night count at once; both dates must be inside
/// the booking horizon
#[utoipa::path(
    put,
    path = "/api/sessions/{sid}/dates",
    params(("sid" = Uuid, Path, description = "Session id")),
    request_body = DateRangeRequest,
    responses(
        (status = 200, description = "Draft updated", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 422, description = "Unordered range or date outside the horizon", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn set_dates_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<DateRangeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let range = StayRange::new(request.check_in, request.check_out)?;
    state.horizon.check_range(&range, state.today())?;

    let pricing = *state.lifecycle.pricing();
    mutate(&state, sid, |draft| draft.set_date_range(range, &pricing)).await
}

/// Handler for PUT /api/sessions/{sid}/guests
/// Applies a guest delta, clamped to `[1, room.guest_count]`
#[utoipa::path(
    put,
    path = "/api/sessions/{sid}/guests",
    params(("sid" = Uuid, Path, description = "Session id")),
    request_body = GuestAdjustRequest,
    responses(
        (status = 200, description = "Guest count applied, possibly clamped with a warning", body = GuestUpdateResponse),
        (status = 404, description = "Unknown session or room", body = ErrorResponse),
        (status = 502, description = "Room directory failure", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn adjust_guests_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<GuestAdjustRequest>,
) -> Result<Json<GuestUpdateResponse>, ApiError> {
    request.validate()?;
    snapshot(&state, sid).await?;
    let room = require_room(&state, request.room_id).await?;

    let (adjustment, draft) = state
        .sessions
        .update(sid, |draft| {
            let adjustment = draft.adjust_guest_quantity(request.delta, &room);
            (adjustment, draft.clone())
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(sid))?;

    let message = adjustment.warning.map(|warning| warning.message());
    if let Some(message) = &message {
        warn!("Guest count clamped for session {}: {}", sid, message);
    } else {
        debug!("Guest count for session {} set to {}", sid, adjustment.quantity);
    }

    Ok(Json(GuestUpdateResponse {
        draft,
        quantity: adjustment.quantity,
        warning: adjustment.warning,
        message,
    }))
}

/// Handler for PUT /api/sessions/{sid}/location
#[utoipa::path(
    put,
    path = "/api/sessions/{sid}/location",
    params(("sid" = Uuid, Path, description = "Session id")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Location filter replaced", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn set_location_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<SessionView>, ApiError> {
    mutate(&state, sid, |draft| draft.set_location_id(request.location_id)).await
}

/// Handler for PUT /api/sessions/{sid}/modals/{which}
#[utoipa::path(
    put,
    path = "/api/sessions/{sid}/modals/{which}",
    params(
        ("sid" = Uuid, Path, description = "Session id"),
        ("which" = ModalKind, Path, description = "payment, calendar or rebooking")
    ),
    request_body = ModalRequest,
    responses(
        (status = 200, description = "Modal flag set", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn set_modal_handler(
    State(state): State<AppState>,
    Path((sid, which)): Path<(Uuid, ModalKind)>,
    Json(request): Json<ModalRequest>,
) -> Result<Json<SessionView>, ApiError> {
    mutate(&state, sid, |draft| draft.set_modal_open(which, request.open)).await
}

/// Handler for POST /api/sessions/{sid}/rebooking/confirm
/// Closes the rebooking modal and opens payment
#[utoipa::path(
    post,
    path = "/api/sessions/{sid}/rebooking/confirm",
    params(("sid" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Payment modal open", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn confirm_rebooking_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    mutate(&state, sid, BookingDraft::confirm_rebooking).await
}

/// Handler for DELETE /api/sessions/{sid}/draft
/// Restores the default draft
#[utoipa::path(
    delete,
    path = "/api/sessions/{sid}/draft",
    params(("sid" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Draft reset", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn reset_draft_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let today = state.today();
    mutate(&state, sid, |draft| draft.reset_booking(today)).await
}

/// Handler for GET /api/sessions/{sid}/quote
/// Prices the draft for a room and stores the total in the draft
#[utoipa::path(
    get,
    path = "/api/sessions/{sid}/quote",
    params(("sid" = Uuid, Path, description = "Session id"), QuoteQuery),
    responses(
        (status = 200, description = "Price breakdown", body = QuoteResponse),
        (status = 404, description = "Unknown session or room", body = ErrorResponse),
        (status = 502, description = "Room directory failure", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn quote_handler(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, ApiError> {
    query.validate()?;
    snapshot(&state, sid).await?;
    let room = require_room(&state, query.room_id).await?;

    let pricing = *state.lifecycle.pricing();
    let (quote, draft) = state
        .sessions
        .update(sid, |draft| {
            let quote = draft.refresh_price(Some(&room), &pricing);
            (quote, draft.clone())
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(sid))?;

    let quote = quote.ok_or(BookingError::RoomNotFound)?;
    Ok(Json(QuoteResponse { quote, draft }))
}

/// Handler for POST /api/sessions/{sid}/bookings
/// Submits the draft as a PENDING reservation
#[utoipa::path(
    post,
    path = "/api/sessions/{sid}/bookings",
    params(("sid" = Uuid, Path, description = "Session id")),
    request_body = SubmitBookingRequest,
    responses(
        (status = 201, description = "Reservation created; draft reset", body = SubmitResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Unknown session or room", body = ErrorResponse),
        (status = 409, description = "Same draft already being submitted", body = ErrorResponse),
        (status = 422, description = "Draft fails validation", body = ErrorResponse),
        (status = 502, description = "Booking Service failure", body = ErrorResponse,
            example = json!({"error_code": "SERVICE_ERROR", "message": "Booking failed!"}))
    ),
    tag = "sessions"
)]
pub async fn submit_booking_handler(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(sid): Path<Uuid>,
    Json(request): Json<SubmitBookingRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    request.validate()?;
    let draft = snapshot(&state, sid).await?;
    let MaybeIdentity(identity) = identity;

    // Anonymous submits are refused before any lookup
    let room = match identity {
        Some(_) => resolve_room(&state, request.room_id).await?,
        None => None,
    };

    let outcome = state
        .lifecycle
        .submit(&draft, room.as_ref(), identity.as_ref())
        .await?;

    let key = draft.submission_key();
    let today = state.today();
    let draft = state
        .sessions
        .update(sid, |current| {
            if current.submission_key() == key {
                current.complete_submission(today);
            }
            current.clone()
        })
        .await
        .unwrap_or(draft);

    Ok((StatusCode::CREATED, Json(SubmitResponse { outcome, draft })))
}
