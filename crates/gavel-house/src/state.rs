//! The committed state of one auction house.
//!
//! `HouseState` is a plain value: the writer mutates its own copy under
//! the house lock, and readers get an immutable `Arc<HouseState>` that
//! is swapped in after every commit.

use gavel_ledger::{BidLedger, PendingBalances, Reconciliation, Treasury};
use gavel_registry::{AccessGate, AuctionClock, ItemRegistry};
use gavel_types::{Address, AuctionConfig, AuctionError, Item, ItemId, Result};
use rust_decimal::Decimal;

/// Every component of the auction, owned together.
#[derive(Debug, Clone)]
pub struct HouseState {
    pub gate: AccessGate,
    pub clock: AuctionClock,
    pub registry: ItemRegistry,
    pub bids: BidLedger,
    pub pending: PendingBalances,
    pub treasury: Treasury,
}

impl HouseState {
    #[must_use]
    pub fn new(admin: Address, config: &AuctionConfig) -> Self {
        Self {
            gate: AccessGate::new(admin),
            clock: AuctionClock::new(config.max_duration_minutes),
            registry: ItemRegistry::new(config.submission_fee),
            bids: BidLedger::new(config.min_bid_increment, config.enforce_bidding_window),
            pending: PendingBalances::new(),
            treasury: Treasury::new(),
        }
    }

    /// Smallest bid `item_id` would accept.
    ///
    /// # Errors
    /// `InvalidItem` if no such item, `AmountOverflow` if no higher bid is
    /// representable.
    pub fn minimum_valid_bid(&self, item_id: &ItemId) -> Result<Decimal> {
        self.item(item_id)
            .and_then(|item| self.bids.minimum_valid_bid(item))
    }

    /// # Errors
    /// `InvalidItem` if no such item.
    pub fn item(&self, item_id: &ItemId) -> Result<&Item> {
        self.registry
            .get(item_id)
            .ok_or_else(|| AuctionError::invalid_item(format!("{item_id} not found")))
    }

    /// Held balance against what it is meant to back.
    #[must_use]
    pub fn reconcile(&self) -> Reconciliation {
        self.treasury
            .reconcile(self.pending.total(), self.bids.escrowed(&self.registry))
    }

    /// Check the treasury against pending balances and standing bids.
    ///
    /// # Errors
    /// `FundsInvariantViolation` if the held balance does not match what
    /// the house owes.
    pub fn verify(&self) -> Result<Reconciliation> {
        self.treasury
            .verify(self.pending.total(), self.bids.escrowed(&self.registry))
    }
}
