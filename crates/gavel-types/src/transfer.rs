//! The external funds-transfer facility.
//!
//! The auction never pushes value anywhere except through a [`Payout`].
//! A `Payout` is only ever produced by an engine *after* it has debited
//! its own ledger entry and the treasury, so the debit-then-transfer
//! ordering holds by construction.

use std::collections::HashMap;
use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, Result};

/// Why value is leaving the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoutReason {
    /// Submission fee forwarded to the administrator.
    SubmissionFee,
    /// Winning bid paid to the item owner.
    SaleProceeds,
    /// Pull-payment balance released to a displaced bidder.
    Withdrawal,
    /// Whole held balance swept to the administrator.
    EmergencySweep,
}

impl std::fmt::Display for PayoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmissionFee => write!(f, "SUBMISSION_FEE"),
            Self::SaleProceeds => write!(f, "SALE_PROCEEDS"),
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::EmergencySweep => write!(f, "EMERGENCY_SWEEP"),
        }
    }
}

/// An outward transfer the house has already accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: Decimal,
    pub reason: PayoutReason,
}

impl Payout {
    #[must_use]
    pub fn new(to: Address, amount: Decimal, reason: PayoutReason) -> Self {
        Self { to, amount, reason }
    }
}

/// Moves value out of the house to a payee.
///
/// Implementations must either move exactly `payout.amount` or fail;
/// a failure rolls back the whole calling operation.
pub trait FundsTransfer: Send + Sync {
    fn transfer(&self, payout: &Payout) -> Result<()>;
}

/// In-memory transfer facility: records what every payee received.
#[derive(Debug, Default)]
pub struct TransferBook {
    received: Mutex<HashMap<Address, Decimal>>,
    history: Mutex<Vec<Payout>>,
}

impl TransferBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total value ever paid to `who`.
    #[must_use]
    pub fn received(&self, who: Address) -> Decimal {
        self.received
            .lock()
            .map(|r| r.get(&who).copied().unwrap_or(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }

    /// Total value paid out to anyone.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.received
            .lock()
            .map(|r| r.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Every payout in the order it was made.
    #[must_use]
    pub fn history(&self) -> Vec<Payout> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl FundsTransfer for TransferBook {
    fn transfer(&self, payout: &Payout) -> Result<()> {
        if payout.amount.is_sign_negative() {
            return Err(AuctionError::TransferFailed {
                reason: format!("negative amount {}", payout.amount),
            });
        }
        let mut received = self
            .received
            .lock()
            .map_err(|_| AuctionError::Internal("transfer book poisoned".into()))?;
        let mut history = self
            .history
            .lock()
            .map_err(|_| AuctionError::Internal("transfer book poisoned".into()))?;
        *received.entry(payout.to).or_insert(Decimal::ZERO) += payout.amount;
        history.push(*payout);
        tracing::debug!(to = %payout.to, amount = %payout.amount, reason = %payout.reason, "transfer recorded");
        Ok(())
    }
}

/// Transfer facility that refuses payouts to selected payees.
/// **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct FaultyTransfers {
    inner: TransferBook,
    refuse: Mutex<std::collections::HashSet<Address>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FaultyTransfers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future payout to `who` fail.
    pub fn refuse(&self, who: Address) {
        if let Ok(mut set) = self.refuse.lock() {
            set.insert(who);
        }
    }

    /// Let payouts to `who` succeed again.
    pub fn accept(&self, who: Address) {
        if let Ok(mut set) = self.refuse.lock() {
            set.remove(&who);
        }
    }

    #[must_use]
    pub fn book(&self) -> &TransferBook {
        &self.inner
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl FundsTransfer for FaultyTransfers {
    fn transfer(&self, payout: &Payout) -> Result<()> {
        let refused = self
            .refuse
            .lock()
            .map(|set| set.contains(&payout.to))
            .unwrap_or(true);
        if refused {
            return Err(AuctionError::TransferFailed {
                reason: format!("payee {} refused {}", payout.to, payout.amount),
            });
        }
        self.inner.transfer(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_accumulates_per_payee() {
        let book = TransferBook::new();
        let alice = Address::new();
        book.transfer(&Payout::new(alice, Decimal::new(2, 1), PayoutReason::Withdrawal))
            .unwrap();
        book.transfer(&Payout::new(alice, Decimal::new(1, 1), PayoutReason::SaleProceeds))
            .unwrap();
        assert_eq!(book.received(alice), Decimal::new(3, 1));
        assert_eq!(book.total_paid(), Decimal::new(3, 1));
        assert_eq!(book.history().len(), 2);
    }

    #[test]
    fn book_rejects_negative_amounts() {
        let book = TransferBook::new();
        let err = book
            .transfer(&Payout::new(Address::new(), Decimal::NEGATIVE_ONE, PayoutReason::Withdrawal))
            .unwrap_err();
        assert!(matches!(err, AuctionError::TransferFailed { .. }));
        assert_eq!(book.total_paid(), Decimal::ZERO);
    }

    #[test]
    fn faulty_transfers_refuse_selected_payee() {
        let faulty = FaultyTransfers::new();
        let bob = Address::new();
        faulty.refuse(bob);
        let payout = Payout::new(bob, Decimal::ONE, PayoutReason::Withdrawal);
        assert!(faulty.transfer(&payout).is_err());
        assert_eq!(faulty.book().received(bob), Decimal::ZERO);

        faulty.accept(bob);
        faulty.transfer(&payout).unwrap();
        assert_eq!(faulty.book().received(bob), Decimal::ONE);
    }

    #[test]
    fn payout_reason_display() {
        assert_eq!(PayoutReason::SaleProceeds.to_string(), "SALE_PROCEEDS");
        assert_eq!(PayoutReason::EmergencySweep.to_string(), "EMERGENCY_SWEEP");
    }
}
