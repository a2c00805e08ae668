// Booking draft
//
// The in-progress, unsubmitted selection of one session. Fields are private;
// every change goes through a named operation below.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::booking::constraints::{adjust_guests, GuestAdjustment, StayRange, MIN_GUESTS};
use crate::booking::error::BookingError;
use crate::booking::models::ModalKind;
use crate::booking::price_calculator::{PriceCalculator, PriceQuote};
use crate::directory::Room;

/// Room the current price was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PricedRoom {
    pub room_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub nightly_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookingDraft {
    check_in: NaiveDate,
    check_out: NaiveDate,
    guest_quantity: u32,
    total_day: u32,
    location_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    computed_total_price: Option<Decimal>,
    priced_room: Option<PricedRoom>,
    payment_open: bool,
    calendar_open: bool,
    rebooking_open: bool,
    submission_key: Uuid,
}

impl BookingDraft {
    /// Default draft: today to tomorrow, one guest, no location filter
    pub fn new(today: NaiveDate) -> Self {
        Self::defaults(today, Uuid::new_v4())
    }

    fn defaults(today: NaiveDate, submission_key: Uuid) -> Self {
        Self {
            check_in: today,
            check_out: today.checked_add_days(Days::new(1)).unwrap_or(today),
            guest_quantity: MIN_GUESTS,
            total_day: 1,
            location_id: None,
            computed_total_price: None,
            priced_room: None,
            payment_open: false,
            calendar_open: false,
            rebooking_open: false,
            submission_key,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn guest_quantity(&self) -> u32 {
        self.guest_quantity
    }

    pub fn total_day(&self) -> u32 {
        self.total_day
    }

    pub fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    pub fn computed_total_price(&self) -> Option<Decimal> {
        self.computed_total_price
    }

    pub fn priced_room(&self) -> Option<PricedRoom> {
        self.priced_room
    }

    /// Key identifying the next submission of this draft
    pub fn submission_key(&self) -> Uuid {
        self.submission_key
    }

    /// Replace the check-in bound only
    ///
    /// Neither ordering nor `total_day` is touched; prefer `set_date_range`.
    pub fn set_check_in(&mut self, date: NaiveDate) {
        self.check_in = date;
    }

    /// Replace the check-out bound only
    pub fn set_check_out(&mut self, date: NaiveDate) {
        self.check_out = date;
    }

    pub fn set_total_day(&mut self, nights: u32) -> Result<(), BookingError> {
        if nights == 0 {
            return Err(BookingError::ValidationRejected(
                "total_day must be a positive number of nights".to_string(),
            ));
        }
        self.total_day = nights;
        Ok(())
    }

    /// Store a raw guest count. Bounds belong to `adjust_guest_quantity`.
    pub fn set_guest_quantity(&mut self, quantity: u32) {
        self.guest_quantity = quantity;
    }

    pub fn set_location_id(&mut self, location_id: Option<i64>) {
        self.location_id = location_id;
    }

    pub fn set_modal_open(&mut self, which: ModalKind, open: bool) {
        match which {
            ModalKind::Payment => self.payment_open = open,
            ModalKind::Calendar => self.calendar_open = open,
            ModalKind::Rebooking => self.rebooking_open = open,
        }
    }

    pub fn is_modal_open(&self, which: ModalKind) -> bool {
        match which {
            ModalKind::Payment => self.payment_open,
            ModalKind::Calendar => self.calendar_open,
            ModalKind::Rebooking => self.rebooking_open,
        }
    }

    /// Restore defaults, keeping the submission key
    pub fn reset_booking(&mut self, today: NaiveDate) {
        *self = Self::defaults(today, self.submission_key);
    }

    /// Set both bounds and the night count in one step
    ///
    /// If a room has already been priced, the price follows the new night
    /// count.
    pub fn set_date_range(&mut self, range: StayRange, pricing: &PriceCalculator) {
        self.check_in = range.check_in();
        self.check_out = range.check_out();
        self.total_day = range.nights();

        if let Some(priced) = self.priced_room {
            self.computed_total_price = Some(pricing.total(priced.nightly_rate, self.total_day));
        }
        debug!(
            "Draft dates set: {} to {} ({} nights)",
            self.check_in, self.check_out, self.total_day
        );
    }

    /// Apply a guest delta against `room` capacity, clamping out-of-range values
    pub fn adjust_guest_quantity(&mut self, delta: i32, room: &Room) -> GuestAdjustment {
        let adjustment = adjust_guests(self.guest_quantity, delta, room.guest_count);
        self.guest_quantity = adjustment.quantity;
        adjustment
    }

    /// Recompute the price for `room`
    ///
    /// An unresolved room leaves the stored price untouched.
    pub fn refresh_price(
        &mut self,
        room: Option<&Room>,
        pricing: &PriceCalculator,
    ) -> Option<PriceQuote> {
        let quote = pricing.quote(room, self.total_day)?;
        self.computed_total_price = Some(quote.total);
        self.priced_room = Some(PricedRoom {
            room_id: quote.room_id,
            nightly_rate: quote.nightly_rate,
        });
        Some(quote)
    }

    /// Rebooking confirmed: swap the rebooking modal for payment
    pub fn confirm_rebooking(&mut self) {
        self.rebooking_open = false;
        self.payment_open = true;
    }

    /// Reset after a successful submission and issue a fresh key
    pub fn complete_submission(&mut self, today: NaiveDate) {
        *self = Self::defaults(today, Uuid::new_v4());
    }
}
