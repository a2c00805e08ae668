// Booking Service collaborator
//
// REST client for the remote reservation store. Every call forwards the
// caller's bearer token; nothing here retries.

use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use crate::booking::models::{
    AdminListingQuery, BookingEnvelope, CreateBookingPayload, ListingEnvelope, Page, Reservation,
    UserListingQuery,
};
use crate::remote::{ApiClient, RemoteError};

/// Header carrying the per-draft submission key
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[async_trait]
pub trait BookingService: Send + Sync {
    /// `POST /bookings`
    async fn create(
        &self,
        payload: &CreateBookingPayload,
        submission_key: Uuid,
        token: &str,
    ) -> Result<BookingEnvelope, RemoteError>;

    /// `GET /bookings?page&pageSize&user_id`
    async fn list_for_user(
        &self,
        user_id: i64,
        query: &UserListingQuery,
        token: &str,
    ) -> Result<Page<Reservation>, RemoteError>;

    /// `GET /bookings?page&pageSize&keyword&status`
    async fn list_all(
        &self,
        query: &AdminListingQuery,
        token: &str,
    ) -> Result<Page<Reservation>, RemoteError>;

    /// `PATCH /bookings/cancel/{id}` with `{reason}`
    async fn cancel(&self, id: i64, reason: &str, token: &str)
        -> Result<BookingEnvelope, RemoteError>;

    /// `PATCH /bookings/confirm/{id}`
    async fn confirm(&self, id: i64, token: &str) -> Result<BookingEnvelope, RemoteError>;

    /// `DELETE /bookings/{id}`
    async fn remove(&self, id: i64, token: &str) -> Result<BookingEnvelope, RemoteError>;
}

#[derive(Debug, Clone)]
pub struct HttpBookingService {
    api: ApiClient,
}

impl HttpBookingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BookingService for HttpBookingService {
    async fn create(
        &self,
        payload: &CreateBookingPayload,
        submission_key: Uuid,
        token: &str,
    ) -> Result<BookingEnvelope, RemoteError> {
        let request = self
            .api
            .request(Method::POST, "/bookings", Some(token))
            .header(IDEMPOTENCY_KEY_HEADER, submission_key.to_string())
            .json(payload);

        self.api.send_or_default(request).await
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        query: &UserListingQuery,
        token: &str,
    ) -> Result<Page<Reservation>, RemoteError> {
        let request = self
            .api
            .request(Method::GET, "/bookings", Some(token))
            .query(&[
                ("page", query.page.to_string()),
                ("pageSize", query.page_size.to_string()),
                ("user_id", user_id.to_string()),
            ]);

        let envelope: ListingEnvelope<Reservation> = self.api.send(request).await?;
        Ok(envelope.data)
    }

    async fn list_all(
        &self,
        query: &AdminListingQuery,
        token: &str,
    ) -> Result<Page<Reservation>, RemoteError> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("pageSize", query.page_size.to_string()),
        ];
        if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            params.push(("keyword", keyword.to_string()));
        }
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }

        let request = self
            .api
            .request(Method::GET, "/bookings", Some(token))
            .query(&params);

        let envelope: ListingEnvelope<Reservation> = self.api.send(request).await?;
        Ok(envelope.data)
    }

    async fn cancel(
        &self,
        id: i64,
        reason: &str,
        token: &str,
    ) -> Result<BookingEnvelope, RemoteError> {
        let request = self
            .api
            .request(Method::PATCH, &format!("/bookings/cancel/{}", id), Some(token))
            .json(&serde_json::json!({ "reason": reason }));

        self.api.send_or_default(request).await
    }

    async fn confirm(&self, id: i64, token: &str) -> Result<BookingEnvelope, RemoteError> {
        let request = self
            .api
            .request(Method::PATCH, &format!("/bookings/confirm/{}", id), Some(token));

        self.api.send_or_default(request).await
    }

    async fn remove(&self, id: i64, token: &str) -> Result<BookingEnvelope, RemoteError> {
        let request = self
            .api
            .request(Method::DELETE, &format!("/bookings/{}", id), Some(token));

        self.api.send_or_default(request).await
    }
}
