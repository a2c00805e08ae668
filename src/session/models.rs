use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::booking::{BookingDraft, GuestWarning, LifecycleOutcome, PriceQuote};

/// A session and its current draft
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    pub draft: BookingDraft,
}

/// Body of `PUT /api/sessions/{sid}/dates`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DateRangeRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Body of `PUT /api/sessions/{sid}/guests`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GuestAdjustRequest {
    /// Room whose capacity bounds the count
    #[validate(range(min = 1, message = "room_id must be positive"))]
    pub room_id: i64,
    /// Signed change, usually +1 or -1
    pub delta: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuestUpdateResponse {
    pub draft: BookingDraft,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<GuestWarning>,
    /// Display text for `warning`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `PUT /api/sessions/{sid}/location`; `null` clears the filter
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationRequest {
    #[serde(default)]
    pub location_id: Option<i64>,
}

/// Body of `PUT /api/sessions/{sid}/modals/{which}`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ModalRequest {
    pub open: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteQuery {
    #[validate(range(min = 1, message = "room_id must be positive"))]
    pub room_id: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub quote: PriceQuote,
    pub draft: BookingDraft,
}

/// Body of `POST /api/sessions/{sid}/bookings`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitBookingRequest {
    #[validate(range(min = 1, message = "room_id must be positive"))]
    pub room_id: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub outcome: LifecycleOutcome,
    /// Draft after the submission (reset on success)
    pub draft: BookingDraft,
}
