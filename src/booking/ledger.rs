// Submission ledger
//
// Tracks submit attempts by draft submission key so a repeated trigger for
// the same draft cannot create a second reservation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::booking::error::BookingError;
use crate::booking::models::LifecycleOutcome;

/// How long a completed outcome stays replayable
const REPLAY_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims older than this are treated as abandoned
const IN_FLIGHT_TIMEOUT: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Clone)]
enum Entry {
    InFlight { since: Instant },
    Completed { outcome: LifecycleOutcome, at: Instant },
}

/// What the caller should do with a submit attempt
#[derive(Debug)]
pub enum Admission<'a> {
    /// First attempt for this key; go ahead and call the Booking Service
    Proceed(SubmissionClaim<'a>),
    /// Already succeeded; return the stored outcome without a remote call
    Replay(LifecycleOutcome),
}

#[derive(Debug)]
pub struct SubmissionLedger {
    entries: Mutex<HashMap<Uuid, Entry>>,
    retention: Duration,
    in_flight_timeout: Duration,
}

impl Default for SubmissionLedger {
    fn default() -> Self {
        Self::new(REPLAY_RETENTION, IN_FLIGHT_TIMEOUT)
    }
}

impl SubmissionLedger {
    pub fn new(retention: Duration, in_flight_timeout: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention,
            in_flight_timeout,
        }
    }

    /// Claim `key` for a submit attempt
    ///
    /// The returned claim releases the key when dropped unless it was
    /// completed, so an attempt that never finishes cannot block retries.
    ///
    /// # Errors
    /// `DuplicateSubmission` while another attempt with the same key is in flight
    pub fn begin(&self, key: Uuid) -> Result<Admission<'_>, BookingError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let (retention, in_flight_timeout) = (self.retention, self.in_flight_timeout);
        entries.retain(|id, entry| match entry {
            Entry::InFlight { since } => {
                let live = since.elapsed() <= in_flight_timeout;
                if !live {
                    warn!("Submission {} timed out in flight, releasing it", id);
                }
                live
            }
            Entry::Completed { at, .. } => at.elapsed() <= retention,
        });

        match entries.get(&key) {
            Some(Entry::InFlight { .. }) => Err(BookingError::DuplicateSubmission),
            Some(Entry::Completed { outcome, .. }) => {
                debug!("Replaying completed submission {}", key);
                Ok(Admission::Replay(outcome.clone()))
            }
            None => {
                entries.insert(key, Entry::InFlight { since: Instant::now() });
                Ok(Admission::Proceed(SubmissionClaim {
                    ledger: self,
                    key,
                    settled: false,
                }))
            }
        }
    }

    fn settle(&self, key: Uuid, outcome: Option<LifecycleOutcome>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match outcome {
            Some(outcome) => {
                entries.insert(key, Entry::Completed { outcome, at: Instant::now() });
            }
            None => {
                entries.remove(&key);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// An in-flight submit attempt
///
/// `complete` records the outcome for replay. Dropping the claim any other
/// way (failure, cancelled request) forgets the key so the draft can be
/// submitted again.
#[derive(Debug)]
pub struct SubmissionClaim<'a> {
    ledger: &'a SubmissionLedger,
    key: Uuid,
    settled: bool,
}

impl SubmissionClaim<'_> {
    pub fn complete(mut self, outcome: LifecycleOutcome) {
        self.ledger.settle(self.key, Some(outcome));
        self.settled = true;
    }
}

impl Drop for SubmissionClaim<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Releasing submission {}", self.key);
            self.ledger.settle(self.key, None);
        }
    }
}
