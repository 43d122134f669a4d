//! Notifications emitted for external observers.
//!
//! Events are produced only by committed calls. A call that fails, or
//! whose outward transfer is refused, emits nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, ItemId};

/// Something observable happened in the auction house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuctionEvent {
    /// A listing was accepted and its fee forwarded to the admin.
    ItemSubmitted { item_id: ItemId },
    /// The admin vetted a listing; it can now receive bids.
    ItemVerified { item_id: ItemId },
    /// A bid became the highest on its item.
    NewHighestBid {
        item_id: ItemId,
        bidder: Address,
        amount: Decimal,
    },
    /// An item was settled. `winner` is `None` and `amount` zero if unsold.
    AuctionEnded {
        item_id: ItemId,
        winner: Option<Address>,
        amount: Decimal,
    },
    /// The global window was (re-)armed.
    AuctionStarted {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    /// A pull-payment balance was paid out.
    Withdrawn { account: Address, amount: Decimal },
    /// The admin drained the entire held balance.
    EmergencyWithdrawal { amount: Decimal },
}

impl AuctionEvent {
    /// The item this event concerns, if any.
    #[must_use]
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::ItemSubmitted { item_id }
            | Self::ItemVerified { item_id }
            | Self::NewHighestBid { item_id, .. }
            | Self::AuctionEnded { item_id, .. } => Some(*item_id),
            Self::AuctionStarted { .. } | Self::Withdrawn { .. } | Self::EmergencyWithdrawal { .. } => {
                None
            }
        }
    }
}

impl std::fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemSubmitted { .. } => write!(f, "ITEM_SUBMITTED"),
            Self::ItemVerified { .. } => write!(f, "ITEM_VERIFIED"),
            Self::NewHighestBid { .. } => write!(f, "NEW_HIGHEST_BID"),
            Self::AuctionEnded { .. } => write!(f, "AUCTION_ENDED"),
            Self::AuctionStarted { .. } => write!(f, "AUCTION_STARTED"),
            Self::Withdrawn { .. } => write!(f, "WITHDRAWN"),
            Self::EmergencyWithdrawal { .. } => write!(f, "EMERGENCY_WITHDRAWAL"),
        }
    }
}

/// A journaled event with its position in the total order of commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based, gap-free sequence number.
    pub sequence: u64,
    /// Clock reading of the committing call.
    pub at: DateTime<Utc>,
    pub event: AuctionEvent,
}
