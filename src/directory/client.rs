use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use crate::directory::models::{Room, RoomEnvelope};
use crate::remote::{ApiClient, RemoteError};

/// Resolves rooms by id
///
/// `Ok(None)` means the directory answered but has no such room.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, RemoteError>;
}

/// Room directory backed by `GET /rooms/{id}`
#[derive(Debug, Clone)]
pub struct HttpRoomDirectory {
    api: ApiClient,
}

impl HttpRoomDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RoomDirectory for HttpRoomDirectory {
    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, RemoteError> {
        let request = self
            .api
            .request(Method::GET, &format!("/rooms/{}", room_id), None);

        let envelope: Option<RoomEnvelope> = self.api.send_optional(request).await?;
        let room = envelope.and_then(|envelope| envelope.data);
        debug!("Room {} resolved: {}", room_id, room.is_some());

        Ok(room)
    }
}
