//! Bid ledger — the bid-acceptance rule and displaced-bidder crediting.
//!
//! ## Acceptance
//!
//! ```text
//! minimum = starting_price                    if no bids yet
//!         = highest_bid + min_bid_increment   otherwise
//! ```
//!
//! A bid of exactly `minimum` wins; anything below is rejected outright,
//! so there is never a tie to break. When a bid displaces a previous
//! highest bidder, that bidder's amount moves into [`PendingBalances`]
//! and can only leave through a withdrawal.

use chrono::{DateTime, Utc};
use gavel_registry::{AuctionClock, ItemRegistry};
use gavel_types::{Address, AuctionError, Item, ItemId, Result, constants};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pending::PendingBalances;
use crate::treasury::Treasury;

/// What an accepted bid changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidReceipt {
    pub item_id: ItemId,
    pub bidder: Address,
    pub amount: Decimal,
    /// The bidder pushed into the pull-payment ledger, with their amount.
    pub displaced: Option<(Address, Decimal)>,
    /// Minimum valid bid after this one.
    pub next_minimum: Decimal,
}

/// Shared mutable state a bid touches, borrowed for one call.
pub struct BidContext<'a> {
    pub registry: &'a mut ItemRegistry,
    pub clock: &'a AuctionClock,
    pub pending: &'a mut PendingBalances,
    pub treasury: &'a mut Treasury,
}

/// Bid-acceptance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidLedger {
    min_increment: Decimal,
    enforce_window: bool,
}

impl BidLedger {
    #[must_use]
    pub fn new(min_increment: Decimal, enforce_window: bool) -> Self {
        Self {
            min_increment,
            enforce_window,
        }
    }

    #[must_use]
    pub fn min_increment(&self) -> Decimal {
        self.min_increment
    }

    /// Smallest bid `item` would accept right now.
    ///
    /// # Errors
    /// Returns [`AuctionError::AmountOverflow`] if the highest bid is so
    /// large that no higher bid is representable.
    pub fn minimum_valid_bid(&self, item: &Item) -> Result<Decimal> {
        if item.has_bids() {
            self.step_above(item.highest_bid)
        } else {
            Ok(item.starting_price)
        }
    }

    fn step_above(&self, amount: Decimal) -> Result<Decimal> {
        crate::exact_add(amount, self.min_increment).ok_or_else(|| AuctionError::AmountOverflow {
            reason: format!("no bid above {amount} is representable"),
        })
    }

    /// Place a bid of `amount` on `item_id`. All checks run before any
    /// state moves, so a rejected bid changes nothing.
    ///
    /// # Errors
    /// In check order: `InvalidItem`, `NotVerified`, `SelfBidding`,
    /// `BiddingClosed`, `AlreadySold`, `BidTooLow`, then `AmountOverflow`
    /// if the bid would leave the next minimum, the held balance or the
    /// displaced bidder's balance unrepresentable. A displaced balance
    /// overflow is reported after the treasury has taken the bid; the
    /// house discards the whole call in that case.
    pub fn place_bid(
        &self,
        ctx: BidContext<'_>,
        caller: Address,
        item_id: ItemId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<BidReceipt> {
        let item = ctx.registry.get_mut(item_id)?;

        if !item.verified {
            return Err(AuctionError::NotVerified(item_id));
        }
        if caller == item.owner {
            return Err(AuctionError::SelfBidding);
        }
        if self.enforce_window && !ctx.clock.is_bidding_open(now) {
            return Err(AuctionError::BiddingClosed);
        }
        if item.settled {
            return Err(AuctionError::AlreadySold(item_id));
        }
        let minimum = self.minimum_valid_bid(item)?;
        if amount < minimum || amount <= Decimal::ZERO {
            return Err(AuctionError::BidTooLow {
                minimum,
                offered: amount,
            });
        }
        let next_minimum = self.step_above(amount)?;

        ctx.treasury.receive(amount)?;
        let displaced = item.record_bid(caller, amount);
        if let Some((previous, refund)) = displaced {
            ctx.pending.credit(previous, refund)?;
            tracing::debug!(%item_id, bidder = %previous, %refund, "bidder displaced");
        }

        Ok(BidReceipt {
            item_id,
            bidder: caller,
            amount,
            displaced,
            next_minimum,
        })
    }

    /// Sum of standing highest bids on items not yet settled.
    #[must_use]
    pub fn escrowed(&self, registry: &ItemRegistry) -> Decimal {
        registry
            .iter()
            .filter(|item| !item.settled && item.has_bids())
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.highest_bid))
    }
}

impl Default for BidLedger {
    fn default() -> Self {
        Self::new(constants::MINIMUM_BID_INCREMENT, true)
    }
}
