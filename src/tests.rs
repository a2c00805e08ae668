// Gateway tests for the booking API
// Drives the full router against in-memory Booking Service and room fakes

use super::*;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use crate::auth::Role;
use crate::booking::{
    BookingLifecycle, DateHorizon, ListingCache, PriceCalculator, ReservationStatus,
};
use crate::session::SessionRegistry;
use crate::test_support::{reservation, room, RecordingBookings, StaticDirectory};

// ============================================================================
// Test Helpers
// ============================================================================

const SECRET: &str = "gateway-test-secret";

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 17).unwrap()
}

struct Harness {
    server: TestServer,
    bookings: Arc<RecordingBookings>,
    rooms: Arc<StaticDirectory>,
    tokens: Arc<TokenService>,
}

impl Harness {
    fn new() -> Self {
        Self::with_bookings(RecordingBookings::default())
    }

    fn with_bookings(bookings: RecordingBookings) -> Self {
        let bookings = Arc::new(bookings);
        let rooms = Arc::new(StaticDirectory::with_rooms(vec![room(3, 4), room(5, 1)]));
        let tokens = Arc::new(TokenService::new(SECRET.to_string()));

        let state = AppState {
            sessions: Arc::new(SessionRegistry::default()),
            lifecycle: Arc::new(BookingLifecycle::new(
                bookings.clone(),
                ListingCache::default(),
                PriceCalculator::default(),
            )),
            rooms: rooms.clone(),
            tokens: tokens.clone(),
            horizon: DateHorizon::default(),
            clock: fixed_today,
        };

        Self {
            server: TestServer::new(create_router(state)).unwrap(),
            bookings,
            rooms,
            tokens,
        }
    }

    fn bearer(&self, user_id: i64, role: Role) -> HeaderValue {
        let token = self.tokens.issue(user_id, role).unwrap();
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    /// Create a session and return its id
    async fn session(&self) -> String {
        let response = self.server.post("/api/sessions").await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn set_dates(&self, sid: &str, check_in: &str, check_out: &str) -> axum_test::TestResponse {
        self.server
            .put(&format!("/api/sessions/{}/dates", sid))
            .json(&json!({ "check_in": check_in, "check_out": check_out }))
            .await
    }
}

// ============================================================================
// Session draft tests
// ============================================================================

#[tokio::test]
async fn test_new_session_has_default_draft() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness.server.get(&format!("/api/sessions/{}", sid)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["check_in"], "2025-10-17");
    assert_eq!(body["draft"]["check_out"], "2025-10-18");
    assert_eq!(body["draft"]["guest_quantity"], 1);
    assert_eq!(body["draft"]["total_day"], 1);
    assert!(body["draft"]["computed_total_price"].is_null());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let harness = Harness::new();

    let response = harness
        .server
        .get("/api/sessions/6f9619ff-8b86-4d01-b42d-00cf4fc964ff")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_session() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness.server.delete(&format!("/api/sessions/{}", sid)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = harness.server.get(&format!("/api/sessions/{}", sid)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_dates_updates_nights() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness.set_dates(&sid, "2025-10-20", "2025-10-23").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["check_in"], "2025-10-20");
    assert_eq!(body["draft"]["check_out"], "2025-10-23");
    assert_eq!(body["draft"]["total_day"], 3);
}

#[tokio::test]
async fn test_dates_outside_horizon_are_rejected() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let past = harness.set_dates(&sid, "2025-10-10", "2025-10-12").await;
    assert_eq!(past.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let far = harness.set_dates(&sid, "2026-06-01", "2026-06-03").await;
    assert_eq!(far.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = far.json();
    assert_eq!(body["error_code"], "VALIDATION_REJECTED");

    let draft: serde_json::Value = harness.server.get(&format!("/api/sessions/{}", sid)).await.json();
    assert_eq!(draft["draft"]["check_in"], "2025-10-17");
}

#[tokio::test]
async fn test_unordered_dates_are_rejected() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness.set_dates(&sid, "2025-10-23", "2025-10-20").await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_guest_count_is_clamped_with_warning() {
    let harness = Harness::new();
    let sid = harness.session().await;
    let url = format!("/api/sessions/{}/guests", sid);

    let below = harness
        .server
        .put(&url)
        .json(&json!({ "room_id": 3, "delta": -1 }))
        .await;
    assert_eq!(below.status_code(), StatusCode::OK);
    let body: serde_json::Value = below.json();
    assert_eq!(body["quantity"], 1);
    assert_eq!(body["warning"]["kind"], "below_minimum");
    assert_eq!(body["message"], "The minimum number of guests is 1.");

    for _ in 0..3 {
        harness
            .server
            .put(&url)
            .json(&json!({ "room_id": 3, "delta": 1 }))
            .await;
    }
    let above = harness
        .server
        .put(&url)
        .json(&json!({ "room_id": 3, "delta": 1 }))
        .await;
    let body: serde_json::Value = above.json();
    assert_eq!(body["quantity"], 4);
    assert_eq!(body["message"], "The number of guests exceeds the room limit of 4.");
}

#[tokio::test]
async fn test_guest_adjust_for_unknown_room() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .put(&format!("/api/sessions/{}/guests", sid))
        .json(&json!({ "room_id": 99, "delta": 1 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn test_modals_and_rebooking() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .put(&format!("/api/sessions/{}/modals/rebooking", sid))
        .json(&json!({ "open": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["rebooking_open"], true);

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/rebooking/confirm", sid))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["rebooking_open"], false);
    assert_eq!(body["draft"]["payment_open"], true);
}

#[tokio::test]
async fn test_location_and_reset() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .put(&format!("/api/sessions/{}/location", sid))
        .json(&json!({ "location_id": 12 }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["location_id"], 12);
    let key = body["draft"]["submission_key"].clone();

    let response = harness.server.delete(&format!("/api/sessions/{}/draft", sid)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["draft"]["location_id"].is_null());
    assert_eq!(body["draft"]["submission_key"], key);
}

#[tokio::test]
async fn test_quote_prices_the_draft() {
    let harness = Harness::new();
    let sid = harness.session().await;
    harness.set_dates(&sid, "2025-10-20", "2025-10-23").await;

    let response = harness
        .server
        .get(&format!("/api/sessions/{}/quote?room_id=3", sid))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["quote"]["nightly_subtotal"], 1500000.0);
    assert_eq!(body["quote"]["cleaning_fee"], 100000.0);
    assert_eq!(body["quote"]["total"], 1600000.0);
    assert_eq!(body["draft"]["computed_total_price"], 1600000.0);
}

#[tokio::test]
async fn test_calendar_window() {
    let harness = Harness::new();

    let body: serde_json::Value = harness.server.get("/api/calendar/window").await.json();
    assert_eq!(body["earliest"], "2025-10-17");
    assert_eq!(body["latest"], "2026-04-15");
}

// ============================================================================
// Submission tests (POST /api/sessions/{sid}/bookings)
// ============================================================================

#[tokio::test]
async fn test_submit_without_identity_makes_no_calls() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/bookings", sid))
        .json(&json!({ "room_id": 3 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Please sign in to book a room");
    assert_eq!(harness.bookings.call_count(), 0);
    assert_eq!(harness.rooms.lookups(), 0);
}

#[tokio::test]
async fn test_submit_creates_pending_booking_and_resets_draft() {
    let harness = Harness::new();
    let sid = harness.session().await;
    harness.set_dates(&sid, "2025-10-20", "2025-10-23").await;
    harness
        .server
        .put(&format!("/api/sessions/{}/guests", sid))
        .json(&json!({ "room_id": 3, "delta": 1 }))
        .await;

    let before: serde_json::Value = harness.server.get(&format!("/api/sessions/{}", sid)).await.json();
    let key = before["draft"]["submission_key"].as_str().unwrap().to_string();

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/bookings", sid))
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "room_id": 3 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"]["message"], "Booking created successfully!");
    assert_eq!(body["outcome"]["reservation"]["status"], "PENDING");
    assert_eq!(body["draft"]["guest_quantity"], 1);
    assert_eq!(body["draft"]["check_in"], "2025-10-17");
    assert_ne!(body["draft"]["submission_key"], key.as_str());

    let created = harness.bookings.created();
    assert_eq!(created.len(), 1);
    let (payload, submission_key, _) = &created[0];
    assert_eq!(submission_key.to_string(), key);
    assert_eq!(payload.user_id, 7);
    assert_eq!(payload.room_id, 3);
    assert_eq!(payload.check_in, NaiveDate::from_ymd_opt(2025, 10, 21).unwrap());
    assert_eq!(payload.check_out, NaiveDate::from_ymd_opt(2025, 10, 24).unwrap());
    assert_eq!(payload.guest_quantity, 2);
    assert_eq!(payload.total_price, rust_decimal_macros::dec!(1600000));
    assert_eq!(payload.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn test_failed_submit_keeps_draft() {
    let harness = Harness::with_bookings(RecordingBookings::failing(Some("Room already booked")));
    let sid = harness.session().await;
    harness.set_dates(&sid, "2025-10-20", "2025-10-23").await;

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/bookings", sid))
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "room_id": 3 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "SERVICE_ERROR");
    assert_eq!(body["message"], "Room already booked");

    let draft: serde_json::Value = harness.server.get(&format!("/api/sessions/{}", sid)).await.json();
    assert_eq!(draft["draft"]["check_in"], "2025-10-20");
    assert_eq!(draft["draft"]["total_day"], 3);
}

#[tokio::test]
async fn test_submit_for_unknown_room() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/bookings", sid))
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "room_id": 99 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(harness.bookings.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let harness = Harness::new();
    let sid = harness.session().await;

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/bookings", sid))
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not.a.jwt"))
        .json(&json!({ "room_id": 3 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.bookings.call_count(), 0);
}

// ============================================================================
// Reservation lifecycle tests
// ============================================================================

#[tokio::test]
async fn test_cancel_requires_reason() {
    let harness = Harness::new();

    for body in [json!({}), json!({ "reason": "   " })] {
        let response = harness
            .server
            .patch("/api/bookings/42/cancel")
            .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
            .json(&body)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert_eq!(harness.bookings.call_count(), 0);
}

#[tokio::test]
async fn test_cancel_forwards_trimmed_reason() {
    let harness = Harness::new();

    let response = harness
        .server
        .patch("/api/bookings/42/cancel")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "reason": "  plans changed " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Booking cancelled successfully!");
    assert_eq!(harness.bookings.cancelled(), vec![(42, "plans changed".to_string())]);
}

#[tokio::test]
async fn test_cancel_of_confirmed_booking_is_refused_locally() {
    let harness = Harness::new();
    harness
        .bookings
        .set_listing(vec![reservation(42, ReservationStatus::Confirmed)]);

    harness
        .server
        .get("/api/bookings")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;

    let response = harness
        .server
        .patch("/api/bookings/42/cancel")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "reason": "too late" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "INVALID_TRANSITION");
    assert!(harness.bookings.cancelled().is_empty());
}

#[tokio::test]
async fn test_user_listing_is_cached_until_a_change() {
    let harness = Harness::new();
    harness
        .bookings
        .set_listing(vec![reservation(42, ReservationStatus::Pending)]);

    for _ in 0..2 {
        let response = harness
            .server
            .get("/api/bookings")
            .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["items"][0]["id"], 42);
        assert_eq!(body["items"][0]["nights"], 3);
    }
    assert_eq!(harness.bookings.list_calls(), 1);

    harness
        .server
        .patch("/api/bookings/42/cancel")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .json(&json!({ "reason": "plans changed" }))
        .await;
    harness
        .server
        .get("/api/bookings")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;
    assert_eq!(harness.bookings.list_calls(), 2);
}

#[tokio::test]
async fn test_user_listing_requires_identity() {
    let harness = Harness::new();

    let response = harness.server.get("/api/bookings").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.bookings.call_count(), 0);
}

#[tokio::test]
async fn test_admin_routes_refuse_users() {
    let harness = Harness::new();

    let listing = harness
        .server
        .get("/api/admin/bookings")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;
    assert_eq!(listing.status_code(), StatusCode::FORBIDDEN);

    let confirm = harness
        .server
        .patch("/api/bookings/42/confirm")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;
    assert_eq!(confirm.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(harness.bookings.call_count(), 0);
}

#[tokio::test]
async fn test_admin_confirms_and_lists() {
    let harness = Harness::new();
    harness
        .bookings
        .set_listing(vec![reservation(42, ReservationStatus::Pending)]);

    let listing = harness
        .server
        .get("/api/admin/bookings")
        .add_header(header::AUTHORIZATION, harness.bearer(1, Role::Admin))
        .await;
    assert_eq!(listing.status_code(), StatusCode::OK);

    let confirm = harness
        .server
        .patch("/api/bookings/42/confirm")
        .add_header(header::AUTHORIZATION, harness.bearer(1, Role::Admin))
        .await;
    assert_eq!(confirm.status_code(), StatusCode::OK);
    let body: serde_json::Value = confirm.json();
    assert_eq!(body["message"], "Booking confirmed successfully!");
    assert_eq!(body["reservation"]["status"], "CONFIRMED");
    assert_eq!(harness.bookings.confirmed(), vec![42]);
}

#[tokio::test]
async fn test_remove_booking() {
    let harness = Harness::new();

    let response = harness
        .server
        .delete("/api/bookings/42")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Booking deleted successfully!");
    assert_eq!(harness.bookings.removed(), vec![42]);
}

#[tokio::test]
async fn test_non_positive_booking_id_is_rejected() {
    let harness = Harness::new();

    let response = harness
        .server
        .delete("/api/bookings/0")
        .add_header(header::AUTHORIZATION, harness.bearer(7, Role::User))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.bookings.call_count(), 0);
}

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn test_health_and_openapi() {
    let harness = Harness::new();

    let health: serde_json::Value = harness.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");

    let doc: serde_json::Value = harness.server.get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"]["/api/sessions/{sid}/bookings"].is_object());
    assert!(doc["components"]["schemas"]["ReservationPage"].is_object());
}
