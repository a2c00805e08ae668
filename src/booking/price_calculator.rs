use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::directory::Room;

/// Fixed cleaning fee added once per stay
pub const CLEANING_FEE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Breakdown of a stay price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PriceQuote {
    pub room_id: i64,
    pub total_day: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub nightly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub nightly_subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub cleaning_fee: Decimal,
    /// Total before tax; no tax is applied
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

/// Service for calculating stay prices
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    cleaning_fee: Decimal,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self { cleaning_fee: CLEANING_FEE }
    }
}

impl PriceCalculator {
    pub fn new(cleaning_fee: Decimal) -> Self {
        Self { cleaning_fee }
    }

    pub fn cleaning_fee(&self) -> Decimal {
        self.cleaning_fee
    }

    /// Calculate the room charge for the stay
    ///
    /// # Arguments
    /// * `price` - Nightly room price
    /// * `total_day` - Number of nights
    pub fn nightly_subtotal(price: Decimal, total_day: u32) -> Decimal {
        price * Decimal::from(total_day)
    }

    /// Calculate the stay total: `price * total_day + cleaning_fee`
    pub fn total(&self, price: Decimal, total_day: u32) -> Decimal {
        Self::nightly_subtotal(price, total_day) + self.cleaning_fee
    }

    /// Price a stay in `room`
    ///
    /// # Returns
    /// `None` while the room is unresolved; a missing room is "not ready",
    /// never a zero price
    pub fn quote(&self, room: Option<&Room>, total_day: u32) -> Option<PriceQuote> {
        let room = room?;
        let nightly_subtotal = Self::nightly_subtotal(room.price, total_day);

        Some(PriceQuote {
            room_id: room.id,
            total_day,
            nightly_rate: room.price,
            nightly_subtotal,
            cleaning_fee: self.cleaning_fee,
            total: nightly_subtotal + self.cleaning_fee,
        })
    }
}
