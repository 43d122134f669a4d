//! # Item — one listing in the auction
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌───────────┐  admin verify  ┌──────────┐  bids  ┌──────────┐
//!   │ SUBMITTED ├───────────────▶│ VERIFIED ├───────▶│ BIDDING  │
//!   └───────────┘                └──────────┘        └────┬─────┘
//!                                                         │ admin end
//!                                                         ▼
//!                                                    ┌─────────┐
//!                                                    │ SETTLED │
//!                                                    └─────────┘
//! ```
//!
//! Both flags are **monotonic**: `verified` and `settled` flip false→true
//! once and never go back. Bid state (`highest_bid`, `highest_bidder`,
//! `bid_count`) only ever moves upward.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, ItemId, Result};

/// A listed item and its current bid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Derived, unguessable identifier.
    pub id: ItemId,
    /// The submitter; receives the winning bid on settlement.
    pub owner: Address,
    pub title: String,
    pub description: String,
    /// Minimum first bid.
    pub starting_price: Decimal,
    /// Set once by the administrator; bids require it.
    pub verified: bool,
    /// Current highest bid (zero until the first bid).
    pub highest_bid: Decimal,
    pub highest_bidder: Option<Address>,
    pub bid_count: u64,
    /// Set once by settlement.
    pub settled: bool,
    pub submitted_at: DateTime<Utc>,
}

impl Item {
    /// A freshly submitted, unverified item with no bids.
    #[must_use]
    pub fn new(
        id: ItemId,
        owner: Address,
        title: String,
        description: String,
        starting_price: Decimal,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            starting_price,
            verified: false,
            highest_bid: Decimal::ZERO,
            highest_bidder: None,
            bid_count: 0,
            settled: false,
            submitted_at,
        }
    }

    #[must_use]
    pub fn has_bids(&self) -> bool {
        self.bid_count > 0
    }

    /// Transition to verified.
    ///
    /// # Errors
    /// Returns [`AuctionError::ItemAlreadyVerified`] if already verified.
    pub fn mark_verified(&mut self) -> Result<()> {
        if self.verified {
            return Err(AuctionError::ItemAlreadyVerified(self.id));
        }
        self.verified = true;
        Ok(())
    }

    /// Transition to settled.
    ///
    /// # Errors
    /// Returns [`AuctionError::AlreadySold`] if already settled.
    pub fn mark_settled(&mut self) -> Result<()> {
        if self.settled {
            return Err(AuctionError::AlreadySold(self.id));
        }
        self.settled = true;
        Ok(())
    }

    /// Record a new highest bid, returning the displaced `(bidder, amount)`.
    ///
    /// Acceptance rules live in the bid ledger; this only moves the state.
    pub fn record_bid(&mut self, bidder: Address, amount: Decimal) -> Option<(Address, Decimal)> {
        let displaced = self.highest_bidder.map(|prev| (prev, self.highest_bid));
        self.highest_bid = amount;
        self.highest_bidder = Some(bidder);
        self.bid_count += 1;
        displaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item() -> Item {
        Item::new(
            ItemId::derive(&[b"test"]),
            Address::new(),
            "Test Item".into(),
            "Description".into(),
            Decimal::new(1, 1),
            Utc::now(),
        )
    }

    #[test]
    fn new_item_is_pristine() {
        let item = make_item();
        assert!(!item.verified);
        assert!(!item.settled);
        assert!(!item.has_bids());
        assert_eq!(item.highest_bid, Decimal::ZERO);
        assert_eq!(item.highest_bidder, None);
    }

    #[test]
    fn double_verify_blocked() {
        let mut item = make_item();
        item.mark_verified().unwrap();
        let err = item.mark_verified().unwrap_err();
        assert_eq!(err, AuctionError::ItemAlreadyVerified(item.id));
    }

    #[test]
    fn double_settle_blocked() {
        let mut item = make_item();
        item.mark_settled().unwrap();
        assert_eq!(
            item.mark_settled().unwrap_err(),
            AuctionError::AlreadySold(item.id)
        );
    }

    #[test]
    fn record_bid_returns_displaced_bidder() {
        let mut item = make_item();
        let alice = Address::new();
        let bob = Address::new();

        assert_eq!(item.record_bid(alice, Decimal::new(2, 1)), None);
        let displaced = item.record_bid(bob, Decimal::new(3, 1));
        assert_eq!(displaced, Some((alice, Decimal::new(2, 1))));
        assert_eq!(item.highest_bidder, Some(bob));
        assert_eq!(item.bid_count, 2);
    }
}
