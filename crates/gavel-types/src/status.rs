//! Global auction lifecycle status.
//!
//! ```text
//!   INACTIVE ──start──▶ ACTIVE (now < end) ──time──▶ PAST DEADLINE
//!                          ▲        │
//!                          └─start──┘   (re-arms the window)
//! ```
//!
//! Nothing flips `is_active` back to false: ending settles items one at a
//! time and leaves the global flag alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single, global auction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuctionStatus {
    pub is_active: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl AuctionStatus {
    /// The status every house starts with.
    #[must_use]
    pub fn inactive() -> Self {
        Self::default()
    }

    /// `now >= end_time`. Never true before the first start.
    #[must_use]
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.end_time.is_some_and(|end| now >= end)
    }

    /// Bids are accepted only while active and before the deadline.
    #[must_use]
    pub fn is_bidding_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_time.is_some_and(|end| now < end)
    }
}

/// Point-in-time view returned by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub is_active: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub current_time: DateTime<Utc>,
}

impl StatusView {
    #[must_use]
    pub fn at(status: AuctionStatus, current_time: DateTime<Utc>) -> Self {
        Self {
            is_active: status.is_active,
            start_time: status.start_time,
            end_time: status.end_time,
            current_time,
        }
    }

    /// Time left in the window, zero once past the deadline.
    #[must_use]
    pub fn remaining(&self) -> chrono::TimeDelta {
        self.end_time
            .map_or(chrono::TimeDelta::zero(), |end| {
                (end - self.current_time).max(chrono::TimeDelta::zero())
            })
    }
}
