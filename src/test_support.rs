// In-memory collaborators for unit and gateway tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::booking::{
    AdminListingQuery, BookingEnvelope, BookingService, CreateBookingPayload, Page, Reservation,
    ReservationStatus, UserListingQuery,
};
use crate::directory::{Room, RoomDirectory};
use crate::remote::RemoteError;

pub fn room(id: i64, guest_count: u32) -> Room {
    Room {
        id,
        room_name: format!("Room {}", id),
        guest_count,
        price: dec!(500000),
        location_id: Some(1),
        description: None,
        image: None,
    }
}

pub fn reservation(id: i64, status: ReservationStatus) -> Reservation {
    Reservation {
        id,
        user_id: 7,
        room_id: 3,
        check_in: NaiveDate::from_ymd_opt(2025, 10, 21).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
        guest_quantity: 2,
        total_price: dec!(1600000),
        status,
        cancelled_at: None,
        cancelled_by: None,
        cancel_reason: None,
    }
}

#[derive(Default)]
struct Recorded {
    calls: usize,
    list_calls: usize,
    created: Vec<(CreateBookingPayload, Uuid, String)>,
    cancelled: Vec<(i64, String)>,
    confirmed: Vec<i64>,
    removed: Vec<i64>,
    listing: Vec<Reservation>,
    /// `Some(message)` makes every call fail with a 400
    failure: Option<Option<String>>,
    /// The next `create` never resolves
    hang_next_create: bool,
}

/// Booking Service fake that records every call it receives
#[derive(Default)]
pub struct RecordingBookings {
    state: Mutex<Recorded>,
}

impl RecordingBookings {
    pub fn failing(message: Option<&str>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().failure = Some(message.map(str::to_string));
        fake
    }

    pub fn succeed(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub fn hang_next_create(&self) {
        self.state.lock().unwrap().hang_next_create = true;
    }

    pub fn set_listing(&self, items: Vec<Reservation>) {
        self.state.lock().unwrap().listing = items;
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn created(&self) -> Vec<(CreateBookingPayload, Uuid, String)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn cancelled(&self) -> Vec<(i64, String)> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn confirmed(&self) -> Vec<i64> {
        self.state.lock().unwrap().confirmed.clone()
    }

    pub fn removed(&self) -> Vec<i64> {
        self.state.lock().unwrap().removed.clone()
    }

    fn record(&self) -> Result<std::sync::MutexGuard<'_, Recorded>, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if let Some(message) = state.failure.clone() {
            return Err(RemoteError::Status { status: 400, message });
        }
        Ok(state)
    }

    fn page(items: Vec<Reservation>, page: u32, page_size: u32) -> Page<Reservation> {
        Page {
            page,
            page_size,
            total_item: items.len() as u64,
            total_page: 1,
            items,
        }
    }
}

fn envelope_for(rsvp: Reservation) -> BookingEnvelope {
    BookingEnvelope {
        message: None,
        data: serde_json::to_value(rsvp).ok(),
    }
}

#[async_trait]
impl BookingService for RecordingBookings {
    async fn create(
        &self,
        payload: &CreateBookingPayload,
        submission_key: Uuid,
        token: &str,
    ) -> Result<BookingEnvelope, RemoteError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            std::mem::take(&mut state.hang_next_create)
        };
        if hang {
            self.state.lock().unwrap().calls += 1;
            std::future::pending::<()>().await;
        }

        let mut state = self.record()?;
        state
            .created
            .push((payload.clone(), submission_key, token.to_string()));

        let mut rsvp = reservation(100 + state.created.len() as i64, ReservationStatus::Pending);
        rsvp.user_id = payload.user_id;
        rsvp.room_id = payload.room_id;
        rsvp.check_in = payload.check_in;
        rsvp.check_out = payload.check_out;
        rsvp.total_price = payload.total_price;
        Ok(envelope_for(rsvp))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        query: &UserListingQuery,
        _token: &str,
    ) -> Result<Page<Reservation>, RemoteError> {
        let mut state = self.record()?;
        state.list_calls += 1;
        let items = state
            .listing
            .iter()
            .filter(|rsvp| rsvp.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::page(items, query.page, query.page_size))
    }

    async fn list_all(
        &self,
        query: &AdminListingQuery,
        _token: &str,
    ) -> Result<Page<Reservation>, RemoteError> {
        let mut state = self.record()?;
        state.list_calls += 1;
        let items = state
            .listing
            .iter()
            .filter(|rsvp| query.status.map_or(true, |status| rsvp.status == status))
            .cloned()
            .collect();
        Ok(Self::page(items, query.page, query.page_size))
    }

    async fn cancel(
        &self,
        id: i64,
        reason: &str,
        _token: &str,
    ) -> Result<BookingEnvelope, RemoteError> {
        let mut state = self.record()?;
        state.cancelled.push((id, reason.to_string()));

        let mut rsvp = reservation(id, ReservationStatus::Cancelled);
        rsvp.cancel_reason = Some(reason.to_string());
        Ok(envelope_for(rsvp))
    }

    async fn confirm(&self, id: i64, _token: &str) -> Result<BookingEnvelope, RemoteError> {
        let mut state = self.record()?;
        state.confirmed.push(id);
        Ok(envelope_for(reservation(id, ReservationStatus::Confirmed)))
    }

    async fn remove(&self, id: i64, _token: &str) -> Result<BookingEnvelope, RemoteError> {
        let mut state = self.record()?;
        state.removed.push(id);
        Ok(BookingEnvelope::default())
    }
}

/// Room directory fake backed by a fixed map
#[derive(Default)]
pub struct StaticDirectory {
    rooms: HashMap<i64, Room>,
    lookups: Mutex<usize>,
}

impl StaticDirectory {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms: rooms.into_iter().map(|room| (room.id, room)).collect(),
            lookups: Mutex::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

#[async_trait]
impl RoomDirectory for StaticDirectory {
    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, RemoteError> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self.rooms.get(&room_id).cloned())
    }
}
