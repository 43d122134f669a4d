//! Pull-payment withdrawal.
//!
//! The caller's ledger entry is zeroed and the treasury debited before the
//! [`Payout`] exists at all; the facade only ever transfers a payout it got
//! back from here. A second withdrawal of the same balance therefore finds
//! nothing and fails with `NoFundsToWithdraw`.

use gavel_ledger::{PendingBalances, Treasury};
use gavel_types::{Address, AuctionError, Payout, PayoutReason, Result};

/// Releases accumulated pull-payment balances.
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawalEngine;

impl WithdrawalEngine {
    /// Zero `caller`'s balance, debit the treasury, and return the payout.
    ///
    /// Either both ledgers move or neither does.
    ///
    /// # Errors
    /// - `NoFundsToWithdraw` if nothing is owed to `caller`
    /// - `FundsInvariantViolation` if the held balance no longer backs the
    ///   claim (only possible after an emergency drain)
    pub fn withdraw(
        &self,
        pending: &mut PendingBalances,
        treasury: &mut Treasury,
        caller: Address,
    ) -> Result<Payout> {
        let owed = pending.balance(caller);
        if owed.is_zero() {
            return Err(AuctionError::NoFundsToWithdraw);
        }
        if owed > treasury.held() {
            return Err(AuctionError::FundsInvariantViolation {
                reason: format!(
                    "claim of {owed} by {caller} exceeds held balance {}",
                    treasury.held()
                ),
            });
        }

        let amount = pending.take(caller)?;
        treasury.disburse(caller, amount, PayoutReason::Withdrawal)
    }
}
