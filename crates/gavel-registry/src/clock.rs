//! Auction clock — owns the global lifecycle status.
//!
//! Only the admin can arm the window. Re-arming an active window is
//! allowed and simply moves both bounds.

use chrono::{DateTime, TimeDelta, Utc};
use gavel_types::{Address, AuctionError, AuctionStatus, Result, constants};

use crate::access::AccessGate;

/// Global auction window plus the duration ceiling it is armed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionClock {
    status: AuctionStatus,
    max_duration_minutes: u64,
}

impl AuctionClock {
    /// An inactive clock with the given duration ceiling.
    #[must_use]
    pub fn new(max_duration_minutes: u64) -> Self {
        Self {
            status: AuctionStatus::inactive(),
            max_duration_minutes,
        }
    }

    /// Arm (or re-arm) the window: `[now, now + duration_minutes)`.
    ///
    /// # Errors
    /// - `NotAdmin` if `caller` is not the admin
    /// - `InvalidDuration` unless `0 < duration_minutes <= max`
    pub fn start(
        &mut self,
        gate: &AccessGate,
        caller: Address,
        duration_minutes: u64,
        now: DateTime<Utc>,
    ) -> Result<AuctionStatus> {
        gate.require_admin(caller)?;

        let invalid = AuctionError::InvalidDuration {
            minutes: duration_minutes,
            max: self.max_duration_minutes,
        };
        if duration_minutes == 0 || duration_minutes > self.max_duration_minutes {
            return Err(invalid);
        }
        let minutes = i64::try_from(duration_minutes).map_err(|_| invalid.clone())?;
        let end = now
            .checked_add_signed(TimeDelta::try_minutes(minutes).ok_or(invalid.clone())?)
            .ok_or(invalid)?;

        if self.status.is_active {
            tracing::warn!(
                previous_end = ?self.status.end_time,
                new_end = %end,
                "auction window re-armed while active"
            );
        }

        self.status = AuctionStatus {
            is_active: true,
            start_time: Some(now),
            end_time: Some(end),
        };
        Ok(self.status)
    }

    #[must_use]
    pub fn status(&self) -> AuctionStatus {
        self.status
    }

    #[must_use]
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.status.is_past_deadline(now)
    }

    #[must_use]
    pub fn is_bidding_open(&self, now: DateTime<Utc>) -> bool {
        self.status.is_bidding_open(now)
    }
}

impl Default for AuctionClock {
    fn default() -> Self {
        Self::new(constants::MAX_DURATION_MINUTES)
    }
}
