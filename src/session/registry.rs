// Session registry
//
// Owns one booking draft per session. Drafts are handed out as snapshots
// and changed only through `update`, so no lock is held across a remote call.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::BookingDraft;

/// Idle time after which a session is evicted (1 hour)
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct SessionEntry {
    draft: BookingDraft,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SESSION_IDLE_TTL)
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Start a session with a default draft
    pub async fn create(&self, today: NaiveDate) -> (Uuid, BookingDraft) {
        let id = Uuid::new_v4();
        let draft = BookingDraft::new(today);

        self.sessions.write().await.insert(
            id,
            SessionEntry {
                draft: draft.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!("Session created: {}", id);
        (id, draft)
    }

    /// Copy of the session draft
    pub async fn snapshot(&self, id: Uuid) -> Option<BookingDraft> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.draft.clone())
    }

    /// Run `f` against the session draft
    ///
    /// Returns `None` for an unknown session; `f` is not called then.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut BookingDraft) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(f(&mut entry.draft))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop sessions idle for longer than the TTL; returns how many went
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.idle_ttl;
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= ttl);

        let pruned = before - sessions.len();
        if pruned > 0 {
            info!("Evicted {} idle sessions", pruned);
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
