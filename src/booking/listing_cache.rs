// Reservation listing cache
//
// Time-based cache of listing pages. Any successful lifecycle operation
// invalidates every page, so the next read refetches from the Booking
// Service.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::booking::models::{AdminListingQuery, Page, Reservation, ReservationStatus, UserListingQuery};

/// Time-to-live for cached listings (30 seconds)
pub const LISTING_CACHE_TTL: Duration = Duration::from_secs(30);

/// Identifies one cached listing page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingKey {
    User { user_id: i64, query: UserListingQuery },
    Admin(AdminListingQuery),
}

#[derive(Debug, Clone)]
struct CachedPage {
    page: Page<Reservation>,
    loaded_at: Instant,
}

impl CachedPage {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() > ttl
    }
}

#[derive(Debug)]
pub struct ListingCache {
    pages: RwLock<HashMap<ListingKey, CachedPage>>,
    ttl: Duration,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(LISTING_CACHE_TTL)
    }
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh page for `key`, if any
    pub async fn get(&self, key: &ListingKey) -> Option<Page<Reservation>> {
        let pages = self.pages.read().await;
        let entry = pages.get(key)?;
        if entry.is_stale(self.ttl) {
            return None;
        }
        debug!("Listing cache hit: {:?}", key);
        Some(entry.page.clone())
    }

    pub async fn put(&self, key: ListingKey, page: Page<Reservation>) {
        self.pages.write().await.insert(
            key,
            CachedPage {
                page,
                loaded_at: Instant::now(),
            },
        );
    }

    /// Forces the next listing read to go to the Booking Service
    pub async fn invalidate_all(&self) {
        let mut pages = self.pages.write().await;
        debug!("Invalidating {} cached listing pages", pages.len());
        pages.clear();
    }

    /// Status of reservation `id` as seen in any fresh cached page
    pub async fn known_status(&self, id: i64) -> Option<ReservationStatus> {
        let pages = self.pages.read().await;
        pages
            .values()
            .filter(|entry| !entry.is_stale(self.ttl))
            .flat_map(|entry| entry.page.items.iter())
            .find(|rsvp| rsvp.id == id)
            .map(|rsvp| rsvp.status)
    }
}
