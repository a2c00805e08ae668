use crate::booking::ReservationStatus;

/// Service for reservation status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Arguments
    /// * `from` - Current reservation status
    /// * `to` - Desired new status
    ///
    /// # Valid Transitions
    /// - Pending → Pending, Confirmed, Cancelled
    /// - Confirmed, Cancelled → (terminal, no transitions, not even to themselves)
    pub fn is_valid_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
        match (from, to) {
            (ReservationStatus::Pending, _) => true,

            // Terminal, repeats included
            (ReservationStatus::Confirmed, _) => false,
            (ReservationStatus::Cancelled, _) => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<ReservationStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!(
                "Invalid status transition from {} to {}",
                from, to
            ))
        }
    }
}
