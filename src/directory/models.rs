use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Room as published by the Room directory
///
/// Only the fields the booking workflow reads are kept; the directory
/// sends more (amenities, bed counts, nested location) which are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: i64,
    #[serde(default)]
    pub room_name: String,
    /// Maximum number of guests
    pub guest_count: u32,
    /// Nightly price
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /rooms/{id}` response body
#[derive(Debug, Clone, Deserialize)]
pub struct RoomEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<Room>,
}
