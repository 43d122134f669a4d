//! Item settlement.
//!
//! Settlement closes one item after the global deadline:
//! 1. Admin check
//! 2. Item lookup
//! 3. Deadline check (`TooEarlyToEnd` before it)
//! 4. Idempotency check (`AlreadySold` on a second call)
//! 5. If sold, debit the winning bid from the treasury for the owner
//! 6. Mark the item settled, whether or not it sold

use chrono::{DateTime, Utc};
use gavel_ledger::Treasury;
use gavel_registry::{AccessGate, AuctionClock, ItemRegistry};
use gavel_types::{Address, AuctionError, ItemId, Payout, PayoutReason, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of closing one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub item_id: ItemId,
    pub owner: Address,
    /// `None` if the item received no bids.
    pub winner: Option<Address>,
    /// Winning bid paid to the owner, zero if unsold.
    pub amount: Decimal,
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    #[must_use]
    pub fn is_sold(&self) -> bool {
        self.winner.is_some()
    }
}

/// Shared state settlement touches, borrowed for one call.
pub struct SettlementContext<'a> {
    pub gate: &'a AccessGate,
    pub clock: &'a AuctionClock,
    pub registry: &'a mut ItemRegistry,
    pub treasury: &'a mut Treasury,
}

/// Admin-triggered close of single items.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Settle `item_id`. Returns the receipt and, if the item sold, the
    /// already-debited payout to its owner.
    ///
    /// # Errors
    /// In check order: `NotAdmin`, `InvalidItem`, `TooEarlyToEnd`,
    /// `AlreadySold`; `FundsInvariantViolation` if the treasury can no
    /// longer cover the winning bid.
    pub fn end(
        &self,
        ctx: SettlementContext<'_>,
        caller: Address,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<(SettlementReceipt, Option<Payout>)> {
        ctx.gate.require_admin(caller)?;
        let item = ctx.registry.get_mut(item_id)?;
        if !ctx.clock.is_past_deadline(now) {
            return Err(AuctionError::TooEarlyToEnd);
        }
        if item.settled {
            return Err(AuctionError::AlreadySold(item_id));
        }

        let payout = if item.has_bids() {
            Some(ctx.treasury.disburse(
                item.owner,
                item.highest_bid,
                PayoutReason::SaleProceeds,
            )?)
        } else {
            None
        };
        item.mark_settled()?;
        tracing::info!(
            %item_id,
            owner = %item.owner,
            sold = payout.is_some(),
            amount = %item.highest_bid,
            "item settled"
        );

        let receipt = SettlementReceipt {
            item_id,
            owner: item.owner,
            winner: item.highest_bidder,
            amount: payout.map_or(Decimal::ZERO, |p| p.amount),
            settled_at: now,
        };
        Ok((receipt, payout))
    }
}
