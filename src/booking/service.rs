use std::sync::Arc;

use chrono::Days;
use tracing::{debug, info};

use crate::auth::Identity;
use crate::booking::{
    client::BookingService,
    constraints::{StayRange, MIN_GUESTS},
    draft_store::BookingDraft,
    error::BookingError,
    ledger::{Admission, SubmissionLedger},
    listing_cache::{ListingCache, ListingKey},
    models::{
        AdminListingQuery, BookingEnvelope, CreateBookingPayload, LifecycleOutcome, Page,
        Reservation, ReservationStatus, UserListingQuery,
    },
    price_calculator::PriceCalculator,
    status_machine::StatusMachine,
};
use crate::directory::Room;
use crate::error::log_refusal;
use crate::validation::validate_non_blank;

const CREATED: &str = "Booking created successfully!";
const CREATE_FAILED: &str = "Booking failed!";
const CANCELLED: &str = "Booking cancelled successfully!";
const CANCEL_FAILED: &str = "Could not cancel booking, please try again!";
const CONFIRMED: &str = "Booking confirmed successfully!";
const CONFIRM_FAILED: &str = "Could not confirm booking, please try again!";
const REMOVED: &str = "Booking deleted successfully!";
const REMOVE_FAILED: &str = "Could not delete booking, please try again!";
const LIST_FAILED: &str = "Could not load bookings, please try again!";

/// Reservation Lifecycle Controller
///
/// Turns a validated draft into a create request and drives status changes
/// of existing reservations. Refusals that can be decided locally never
/// reach the Booking Service.
pub struct BookingLifecycle {
    bookings: Arc<dyn BookingService>,
    ledger: SubmissionLedger,
    listings: ListingCache,
    pricing: PriceCalculator,
}

impl BookingLifecycle {
    pub fn new(
        bookings: Arc<dyn BookingService>,
        listings: ListingCache,
        pricing: PriceCalculator,
    ) -> Self {
        Self {
            bookings,
            ledger: SubmissionLedger::default(),
            listings,
            pricing,
        }
    }

    pub fn pricing(&self) -> &PriceCalculator {
        &self.pricing
    }

    /// Submit a draft as a new PENDING reservation
    ///
    /// # Arguments
    /// * `draft` - Snapshot of the session draft
    /// * `room` - The targeted room, `None` when it failed to resolve
    /// * `identity` - The caller, `None` when anonymous
    ///
    /// # Validation
    /// - An identity must be present (`Unauthenticated`)
    /// - The room must be resolved (`RoomNotFound`)
    /// - `check_out > check_in` and `1 <= guest_quantity <= room.guest_count`
    /// - A submission already in flight for the same draft is refused
    ///
    /// Both dates are sent shifted forward by one day.
    pub async fn submit(
        &self,
        draft: &BookingDraft,
        room: Option<&Room>,
        identity: Option<&Identity>,
    ) -> Result<LifecycleOutcome, BookingError> {
        let Some(identity) = identity else {
            log_refusal("submit", &BookingError::Unauthenticated);
            return Err(BookingError::Unauthenticated);
        };
        let Some(room) = room else {
            log_refusal("submit", &BookingError::RoomNotFound);
            return Err(BookingError::RoomNotFound);
        };

        let payload = self.build_payload(draft, room, identity)?;

        let key = draft.submission_key();
        // Released on drop if the request is abandoned mid-flight
        let claim = match self.ledger.begin(key)? {
            Admission::Proceed(claim) => claim,
            Admission::Replay(outcome) => return Ok(outcome),
        };

        match self.bookings.create(&payload, key, &identity.token).await {
            Ok(envelope) => {
                let outcome = outcome_from(envelope, CREATED);
                claim.complete(outcome.clone());
                self.listings.invalidate_all().await;
                info!(
                    "Booking created: user_id={}, room_id={}, {} to {}",
                    payload.user_id, payload.room_id, payload.check_in, payload.check_out
                );
                Ok(outcome)
            }
            Err(err) => {
                drop(claim);
                Err(BookingError::service(&err, CREATE_FAILED))
            }
        }
    }

    fn build_payload(
        &self,
        draft: &BookingDraft,
        room: &Room,
        identity: &Identity,
    ) -> Result<CreateBookingPayload, BookingError> {
        let range = StayRange::new(draft.check_in(), draft.check_out()).map_err(|err| {
            log_refusal("submit", &err);
            err
        })?;

        let capacity = room.guest_count.max(MIN_GUESTS);
        let guests = draft.guest_quantity();
        if !(MIN_GUESTS..=capacity).contains(&guests) {
            let err = BookingError::ValidationRejected(format!(
                "guest_quantity must be between {} and {}, got {}",
                MIN_GUESTS, capacity, guests
            ));
            log_refusal("submit", &err);
            return Err(err);
        }

        let shift = |date: chrono::NaiveDate| {
            date.checked_add_days(Days::new(1)).ok_or_else(|| {
                BookingError::ValidationRejected(format!("{} cannot be shifted", date))
            })
        };

        Ok(CreateBookingPayload {
            user_id: identity.user_id,
            room_id: room.id,
            check_in: shift(range.check_in())?,
            check_out: shift(range.check_out())?,
            guest_quantity: guests,
            total_price: self.pricing.total(room.price, draft.total_day()),
            status: ReservationStatus::Pending,
        })
    }

    /// Cancel a reservation with a mandatory reason
    ///
    /// Attribution (user or manager) follows the role carried by the
    /// forwarded token.
    pub async fn cancel(
        &self,
        id: i64,
        reason: &str,
        identity: &Identity,
    ) -> Result<LifecycleOutcome, BookingError> {
        if validate_non_blank(reason).is_err() {
            let err = BookingError::ValidationRejected("A cancellation reason is required".to_string());
            log_refusal("cancel", &err);
            return Err(err);
        }
        self.check_transition(id, ReservationStatus::Cancelled).await?;

        let envelope = self
            .bookings
            .cancel(id, reason.trim(), &identity.token)
            .await
            .map_err(|err| BookingError::service(&err, CANCEL_FAILED))?;

        self.listings.invalidate_all().await;
        info!(
            "Booking {} cancelled by {:?} (user_id={})",
            id,
            identity.cancellation_actor(),
            identity.user_id
        );
        Ok(outcome_from(envelope, CANCELLED))
    }

    /// PENDING → CONFIRMED
    pub async fn confirm(&self, id: i64, identity: &Identity) -> Result<LifecycleOutcome, BookingError> {
        self.check_transition(id, ReservationStatus::Confirmed).await?;

        let envelope = self
            .bookings
            .confirm(id, &identity.token)
            .await
            .map_err(|err| BookingError::service(&err, CONFIRM_FAILED))?;

        self.listings.invalidate_all().await;
        info!("Booking {} confirmed by user_id={}", id, identity.user_id);
        Ok(outcome_from(envelope, CONFIRMED))
    }

    /// Hard delete; no status guard
    pub async fn remove(&self, id: i64, identity: &Identity) -> Result<LifecycleOutcome, BookingError> {
        let envelope = self
            .bookings
            .remove(id, &identity.token)
            .await
            .map_err(|err| BookingError::service(&err, REMOVE_FAILED))?;

        self.listings.invalidate_all().await;
        info!("Booking {} removed by user_id={}", id, identity.user_id);
        Ok(outcome_from(envelope, REMOVED))
    }

    /// The caller's own reservations
    pub async fn list_for_user(
        &self,
        identity: &Identity,
        query: UserListingQuery,
    ) -> Result<Page<Reservation>, BookingError> {
        let key = ListingKey::User {
            user_id: identity.user_id,
            query: query.clone(),
        };
        if let Some(page) = self.listings.get(&key).await {
            return Ok(page);
        }

        let page = self
            .bookings
            .list_for_user(identity.user_id, &query, &identity.token)
            .await
            .map_err(|err| BookingError::service(&err, LIST_FAILED))?;

        self.listings.put(key, page.clone()).await;
        Ok(page)
    }

    /// Every reservation, filtered by keyword and status
    pub async fn list_all(
        &self,
        identity: &Identity,
        query: AdminListingQuery,
    ) -> Result<Page<Reservation>, BookingError> {
        let key = ListingKey::Admin(query.clone());
        if let Some(page) = self.listings.get(&key).await {
            return Ok(page);
        }

        let page = self
            .bookings
            .list_all(&query, &identity.token)
            .await
            .map_err(|err| BookingError::service(&err, LIST_FAILED))?;

        self.listings.put(key, page.clone()).await;
        Ok(page)
    }

    /// Refuse locally when a cached listing already shows the reservation
    /// in a status that cannot reach `target`
    async fn check_transition(&self, id: i64, target: ReservationStatus) -> Result<(), BookingError> {
        let Some(current) = self.listings.known_status(id).await else {
            debug!("Status of booking {} unknown, deferring to the Booking Service", id);
            return Ok(());
        };

        StatusMachine::transition(current, target)
            .map(|_| ())
            .map_err(|msg| {
                let err = BookingError::InvalidTransition(msg);
                log_refusal("status change", &err);
                err
            })
    }
}

fn outcome_from(envelope: BookingEnvelope, fallback: &str) -> LifecycleOutcome {
    let reservation = envelope.reservation();
    LifecycleOutcome {
        message: envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
        reservation,
    }
}
