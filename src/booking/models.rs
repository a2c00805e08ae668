use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Reservation status as reported by the Booking Service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Convert status to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }

    /// CONFIRMED and CANCELLED accept no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Pending)
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who cancelled a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    User,
    Manager,
}

/// Server-owned reservation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    #[serde(with = "wire_date")]
    pub check_in: NaiveDate,
    #[serde(with = "wire_date")]
    pub check_out: NaiveDate,
    pub guest_quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub status: ReservationStatus,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_by: Option<CancelledBy>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

impl Reservation {
    /// Nights between check-in and check-out as stored by the server
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Listing row: a reservation plus its night count
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReservationListItem {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub nights: i64,
}

impl From<Reservation> for ReservationListItem {
    fn from(reservation: Reservation) -> Self {
        Self {
            nights: reservation.nights(),
            reservation,
        }
    }
}

/// Body of `POST /bookings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingPayload {
    pub user_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: ReservationStatus,
}

/// Generic `{message, data}` response from the Booking Service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl BookingEnvelope {
    /// The reservation carried in `data`, if it has that shape
    pub fn reservation(&self) -> Option<Reservation> {
        self.data
            .clone()
            .and_then(|data| serde_json::from_value(data).ok())
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(ReservationPage = Page<ReservationListItem>)]
pub struct Page<T> {
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total_item: u64,
    #[serde(default)]
    pub total_page: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Same paging, items converted by `f`
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            page_size: self.page_size,
            total_item: self.total_item,
            total_page: self.total_page,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// `{message?, data: Page}` listing response
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEnvelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Page<T>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// Listing of the caller's own reservations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListingQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "pageSize must be between 1 and 100"))]
    pub page_size: u32,
}

impl Default for UserListingQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Admin listing with keyword and status filters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminListingQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "pageSize must be between 1 and 100"))]
    pub page_size: u32,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

impl Default for AdminListingQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            keyword: None,
            status: None,
        }
    }
}

/// Request DTO for cancelling a reservation
///
/// A blank reason is refused by the lifecycle controller, not at decode time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub reason: String,
}

/// Success outcome of a lifecycle operation
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LifecycleOutcome {
    /// Display message (server-provided when available)
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

/// One of the three modal flags owned by the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Payment,
    Calendar,
    Rebooking,
}

/// Dates on the wire are `YYYY-MM-DD`; some responses carry full
/// RFC 3339 timestamps, which are truncated to their UTC date.
pub(crate) mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc().date()))
    }
}
