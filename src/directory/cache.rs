// Room lookup cache
//
// Time-based cache in front of a `RoomDirectory`. Entries older than the
// TTL are reloaded on next access; misses (`None`) are not cached so a room
// created after the first lookup becomes visible immediately.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::directory::client::RoomDirectory;
use crate::directory::models::Room;
use crate::remote::RemoteError;

#[derive(Debug, Clone)]
struct CachedRoom {
    room: Room,
    loaded_at: Instant,
}

impl CachedRoom {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() > ttl
    }
}

pub struct CachedRoomDirectory {
    inner: Arc<dyn RoomDirectory>,
    cache: RwLock<HashMap<i64, CachedRoom>>,
    ttl: Duration,
}

impl CachedRoomDirectory {
    pub fn new(inner: Arc<dyn RoomDirectory>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Drop one room so the next lookup reloads it
    pub async fn invalidate(&self, room_id: i64) {
        self.cache.write().await.remove(&room_id);
    }
}

#[async_trait]
impl RoomDirectory for CachedRoomDirectory {
    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, RemoteError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&room_id) {
                if !entry.is_stale(self.ttl) {
                    debug!("Room cache hit: {}", room_id);
                    return Ok(Some(entry.room.clone()));
                }
            }
        }

        debug!("Room cache miss: {}", room_id);
        let room = self.inner.find_room(room_id).await?;

        let mut cache = self.cache.write().await;
        match &room {
            Some(room) => {
                cache.insert(
                    room_id,
                    CachedRoom {
                        room: room.clone(),
                        loaded_at: Instant::now(),
                    },
                );
            }
            None => {
                cache.remove(&room_id);
            }
        }

        Ok(room)
    }
}
