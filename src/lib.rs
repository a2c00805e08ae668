// Booking gateway
// Owns per-session booking drafts and fronts the remote Booking Service

pub mod auth;
pub mod booking;
pub mod config;
pub mod directory;
pub mod error;
pub mod remote;
pub mod session;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::auth::TokenService;
use crate::booking::{
    handlers as booking_handlers, BookingLifecycle, DateHorizon, HttpBookingService, ListingCache,
    PriceCalculator,
};
use crate::config::AppConfig;
use crate::directory::{CachedRoomDirectory, HttpRoomDirectory, RoomDirectory};
use crate::remote::{ApiClient, RemoteError};
use crate::session::{handlers as session_handlers, SessionRegistry};

/// Source of "today" for horizon checks and draft defaults
pub type Clock = fn() -> NaiveDate;

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        booking_handlers::calendar_window_handler,
        booking_handlers::list_user_bookings_handler,
        booking_handlers::list_all_bookings_handler,
        booking_handlers::cancel_booking_handler,
        booking_handlers::confirm_booking_handler,
        booking_handlers::remove_booking_handler,
        session_handlers::create_session_handler,
        session_handlers::get_session_handler,
        session_handlers::delete_session_handler,
        session_handlers::set_dates_handler,
        session_handlers::adjust_guests_handler,
        session_handlers::set_location_handler,
        session_handlers::set_modal_handler,
        session_handlers::confirm_rebooking_handler,
        session_handlers::reset_draft_handler,
        session_handlers::quote_handler,
        session_handlers::submit_booking_handler,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::booking::BookingDraft,
            crate::booking::PricedRoom,
            crate::booking::Reservation,
            crate::booking::ReservationListItem,
            crate::booking::ReservationPage,
            crate::booking::ReservationStatus,
            crate::booking::CancelledBy,
            crate::booking::CancelBookingRequest,
            crate::booking::LifecycleOutcome,
            crate::booking::ModalKind,
            crate::booking::PriceQuote,
            crate::booking::HorizonWindow,
            crate::booking::GuestWarning,
            crate::session::models::SessionView,
            crate::session::models::DateRangeRequest,
            crate::session::models::GuestAdjustRequest,
            crate::session::models::GuestUpdateResponse,
            crate::session::models::LocationRequest,
            crate::session::models::ModalRequest,
            crate::session::models::QuoteResponse,
            crate::session::models::SubmitBookingRequest,
            crate::session::models::SubmitResponse,
        )
    ),
    tags(
        (name = "sessions", description = "Booking draft of one session"),
        (name = "bookings", description = "Reservation listing and lifecycle"),
        (name = "calendar", description = "Selectable date window")
    ),
    info(
        title = "Stayflow Booking Gateway",
        version = "0.1.0",
        description = "Booking drafts, pricing and reservation lifecycle over the remote Booking Service"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub lifecycle: Arc<BookingLifecycle>,
    pub rooms: Arc<dyn RoomDirectory>,
    pub tokens: Arc<TokenService>,
    pub horizon: DateHorizon,
    pub clock: Clock,
}

impl AppState {
    /// Wire the remote clients and caches described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, RemoteError> {
        let api = ApiClient::new(config.booking_api_url.clone())?;
        tracing::info!("Booking Service at {}", api.base_url());

        let rooms: Arc<dyn RoomDirectory> = Arc::new(CachedRoomDirectory::new(
            Arc::new(HttpRoomDirectory::new(api.clone())),
            config.directory_cache_ttl,
        ));
        let lifecycle = BookingLifecycle::new(
            Arc::new(HttpBookingService::new(api)),
            ListingCache::new(config.listing_cache_ttl),
            PriceCalculator::new(config.cleaning_fee),
        );

        Ok(Self {
            sessions: Arc::new(SessionRegistry::new(config.session_idle_ttl)),
            lifecycle: Arc::new(lifecycle),
            rooms,
            tokens: Arc::new(TokenService::new(config.jwt_secret.clone())),
            horizon: DateHorizon::new(config.horizon_days),
            clock: local_today,
        })
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Handler for GET /health
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/calendar/window", get(booking_handlers::calendar_window_handler))
        // Session drafts
        .route("/api/sessions", post(session_handlers::create_session_handler))
        .route(
            "/api/sessions/:sid",
            get(session_handlers::get_session_handler).delete(session_handlers::delete_session_handler),
        )
        .route("/api/sessions/:sid/dates", put(session_handlers::set_dates_handler))
        .route("/api/sessions/:sid/guests", put(session_handlers::adjust_guests_handler))
        .route("/api/sessions/:sid/location", put(session_handlers::set_location_handler))
        .route("/api/sessions/:sid/modals/:which", put(session_handlers::set_modal_handler))
        .route(
            "/api/sessions/:sid/rebooking/confirm",
            post(session_handlers::confirm_rebooking_handler),
        )
        .route("/api/sessions/:sid/draft", delete(session_handlers::reset_draft_handler))
        .route("/api/sessions/:sid/quote", get(session_handlers::quote_handler))
        .route("/api/sessions/:sid/bookings", post(session_handlers::submit_booking_handler))
        // Reservations
        .route("/api/bookings", get(booking_handlers::list_user_bookings_handler))
        .route("/api/admin/bookings", get(booking_handlers::list_all_bookings_handler))
        .route("/api/bookings/:id/cancel", patch(booking_handlers::cancel_booking_handler))
        .route("/api/bookings/:id/confirm", patch(booking_handlers::confirm_booking_handler))
        .route("/api/bookings/:id", delete(booking_handlers::remove_booking_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;
