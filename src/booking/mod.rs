// Booking Workflow Engine
// Draft store, pricing, constraints and the reservation lifecycle

pub mod client;
pub mod constraints;
pub mod draft_store;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod listing_cache;
pub mod models;
pub mod price_calculator;
pub mod service;
pub mod status_machine;

pub use client::{BookingService, HttpBookingService, IDEMPOTENCY_KEY_HEADER};
pub use constraints::{
    adjust_guests, DateHorizon, GuestAdjustment, GuestWarning, HorizonWindow, StayRange,
    HORIZON_DAYS, MIN_GUESTS,
};
pub use draft_store::{BookingDraft, PricedRoom};
pub use error::BookingError;
pub use ledger::{Admission, SubmissionClaim, SubmissionLedger};
pub use listing_cache::{ListingCache, ListingKey};
pub use models::{
    AdminListingQuery, BookingEnvelope, CancelBookingRequest, CancelledBy, CreateBookingPayload,
    LifecycleOutcome, ListingEnvelope, ModalKind, Page, Reservation, ReservationListItem,
    ReservationPage, ReservationStatus, UserListingQuery,
};
pub use price_calculator::{PriceCalculator, PriceQuote, CLEANING_FEE};
pub use service::BookingLifecycle;
pub use status_machine::StatusMachine;
