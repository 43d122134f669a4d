//! Treasury — the value the house holds, with a conservation check.
//!
//! Mathematical invariants enforced after every committed call:
//! ```text
//! held == Σ(received) - Σ(paid out)
//! held == Σ(pending balances) + Σ(standing bids)    until an emergency sweep
//! held <= Σ(pending balances) + Σ(standing bids)    after one
//! ```
//!
//! The second line is checked against the pending ledger and the item
//! registry, which the treasury does not own.
//!
//! Value enters only through submission fees and bids and leaves only
//! through [`Treasury::disburse`], which debits before it hands back the
//! [`Payout`] to execute.

use std::collections::HashMap;

use gavel_types::{Address, AuctionError, Payout, PayoutReason, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Held balance plus lifetime inflow/outflow totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Treasury {
    held: Decimal,
    received: Decimal,
    paid_out: Decimal,
    paid_by_reason: HashMap<PayoutReason, Decimal>,
}

impl Treasury {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take in value through one of the two entry points.
    ///
    /// # Errors
    /// Returns [`AuctionError::AmountOverflow`] if the held balance or the
    /// lifetime total would leave the decimal range; nothing changes then.
    pub fn receive(&mut self, amount: Decimal) -> Result<()> {
        match (
            crate::exact_add(self.held, amount),
            crate::exact_add(self.received, amount),
        ) {
            (Some(held), Some(received)) => {
                self.held = held;
                self.received = received;
                Ok(())
            }
            _ => Err(AuctionError::AmountOverflow {
                reason: format!("receiving {amount} on top of held {}", self.held),
            }),
        }
    }

    /// Debit `amount` and return the payout that moves it out.
    ///
    /// # Errors
    /// Returns [`AuctionError::FundsInvariantViolation`] if the house does
    /// not hold `amount`.
    pub fn disburse(&mut self, to: Address, amount: Decimal, reason: PayoutReason) -> Result<Payout> {
        if amount > self.held {
            return Err(AuctionError::FundsInvariantViolation {
                reason: format!("{reason} of {amount} exceeds held balance {}", self.held),
            });
        }
        self.held -= amount;
        self.paid_out += amount;
        *self.paid_by_reason.entry(reason).or_insert(Decimal::ZERO) += amount;
        Ok(Payout::new(to, amount, reason))
    }

    #[must_use]
    pub fn held(&self) -> Decimal {
        self.held
    }

    #[must_use]
    pub fn total_received(&self) -> Decimal {
        self.received
    }

    #[must_use]
    pub fn total_paid_out(&self) -> Decimal {
        self.paid_out
    }

    /// Lifetime outflow for one payout reason.
    #[must_use]
    pub fn paid_for(&self, reason: PayoutReason) -> Decimal {
        self.paid_by_reason
            .get(&reason)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Expected held balance: received - paid out.
    #[must_use]
    pub fn expected_held(&self) -> Decimal {
        self.received - self.paid_out
    }

    /// Verify the held balance against the lifetime totals and against
    /// every outstanding claim, returning the backing report.
    ///
    /// Held value never exceeds claims. It falls short of them only once
    /// an emergency sweep has moved value out from under the claims.
    ///
    /// # Errors
    /// Returns [`AuctionError::FundsInvariantViolation`] naming the broken
    /// relation.
    pub fn verify(&self, owed_pending: Decimal, escrowed_bids: Decimal) -> Result<Reconciliation> {
        let expected = self.expected_held();
        if self.held != expected || self.held < Decimal::ZERO {
            return Err(AuctionError::FundsInvariantViolation {
                reason: format!(
                    "held {} != expected {expected} (received={}, paid_out={})",
                    self.held, self.received, self.paid_out
                ),
            });
        }

        let report = self.reconcile(owed_pending, escrowed_bids);
        if !report.surplus.is_zero() {
            return Err(AuctionError::FundsInvariantViolation {
                reason: format!("held {} exceeds claims by {}", self.held, report.surplus),
            });
        }
        if !report.shortfall.is_zero() && self.paid_for(PayoutReason::EmergencySweep).is_zero() {
            return Err(AuctionError::FundsInvariantViolation {
                reason: format!(
                    "claims exceed held {} by {} without an emergency sweep",
                    self.held, report.shortfall
                ),
            });
        }
        Ok(report)
    }

    /// Compare held value against what the house still owes.
    ///
    /// `owed_pending` is the pull-payment total; `escrowed_bids` the sum of
    /// standing highest bids on unsettled items.
    #[must_use]
    pub fn reconcile(&self, owed_pending: Decimal, escrowed_bids: Decimal) -> Reconciliation {
        let owed = owed_pending.saturating_add(escrowed_bids);
        Reconciliation {
            held: self.held,
            owed_pending,
            escrowed_bids,
            shortfall: owed.saturating_sub(self.held).max(Decimal::ZERO),
            surplus: self.held.saturating_sub(owed).max(Decimal::ZERO),
        }
    }
}

/// Backing report: does the held balance cover every outstanding claim?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub held: Decimal,
    pub owed_pending: Decimal,
    pub escrowed_bids: Decimal,
    /// Claims not backed by held value (non-zero only after an emergency drain).
    pub shortfall: Decimal,
    /// Held value no claim refers to.
    pub surplus: Decimal,
}

impl Reconciliation {
    #[must_use]
    pub fn is_fully_backed(&self) -> bool {
        self.shortfall.is_zero()
    }
}
