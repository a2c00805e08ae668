// Guest-count and date-horizon constraints
//
// Checked at the point of a user-driven mutation, not as invariants of the
// draft itself.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::booking::error::BookingError;

/// Days ahead of today that may be selected
pub const HORIZON_DAYS: u32 = 180;

/// Fewest guests a booking can carry
pub const MIN_GUESTS: u32 = 1;

/// A validated `[check_in, check_out)` pair with `check_out > check_in`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::ValidationRejected(format!(
                "check-out {} must be after check-in {}",
                check_out, check_in
            )));
        }
        Ok(Self { check_in, check_out })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Whole nights in the range, never less than 1
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(u32::MAX).max(1)
    }
}

/// Sliding window of selectable dates, evaluated against the `today`
/// passed in at selection time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateHorizon {
    days: u32,
}

impl Default for DateHorizon {
    fn default() -> Self {
        Self { days: HORIZON_DAYS }
    }
}

/// Inclusive bounds of the selectable window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct HorizonWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateHorizon {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn window(&self, today: NaiveDate) -> HorizonWindow {
        HorizonWindow {
            earliest: today,
            latest: today
                .checked_add_days(Days::new(u64::from(self.days)))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Whether a single day may be picked
    pub fn accepts(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let window = self.window(today);
        date >= window.earliest && date <= window.latest
    }

    /// Both bounds of a range must fall inside the window
    pub fn check_range(&self, range: &StayRange, today: NaiveDate) -> Result<(), BookingError> {
        for date in [range.check_in(), range.check_out()] {
            if !self.accepts(date, today) {
                let window = self.window(today);
                return Err(BookingError::ValidationRejected(format!(
                    "{} is outside the bookable window {} to {}",
                    date, window.earliest, window.latest
                )));
            }
        }
        Ok(())
    }
}

/// Warning surfaced when a guest change had to be clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuestWarning {
    BelowMinimum,
    AboveMaximum { capacity: u32 },
}

impl GuestWarning {
    pub fn message(&self) -> String {
        match self {
            GuestWarning::BelowMinimum => format!("The minimum number of guests is {}.", MIN_GUESTS),
            GuestWarning::AboveMaximum { capacity } => {
                format!("The number of guests exceeds the room limit of {}.", capacity)
            }
        }
    }
}

/// Result of applying a guest delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct GuestAdjustment {
    pub quantity: u32,
    pub warning: Option<GuestWarning>,
}

/// Apply `delta` to `current` within `[1, capacity]`
///
/// Out-of-range candidates are clamped (never rejected) and carry a
/// warning. A room reporting a capacity below 1 is treated as capacity 1.
pub fn adjust_guests(current: u32, delta: i32, capacity: u32) -> GuestAdjustment {
    let capacity = capacity.max(MIN_GUESTS);
    let candidate = i64::from(current) + i64::from(delta);

    if candidate < i64::from(MIN_GUESTS) {
        return GuestAdjustment {
            quantity: MIN_GUESTS,
            warning: Some(GuestWarning::BelowMinimum),
        };
    }

    if candidate > i64::from(capacity) {
        return GuestAdjustment {
            quantity: capacity,
            warning: Some(GuestWarning::AboveMaximum { capacity }),
        };
    }

    GuestAdjustment {
        // candidate is within [1, capacity] here
        quantity: candidate as u32,
        warning: None,
    }
}
