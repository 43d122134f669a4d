//! Emergency recovery: admin sweep of the whole held balance.
//!
//! **Destructive.** The sweep ignores per-item and per-bidder accounting:
//! pending withdrawals and standing bids keep their ledger entries but
//! lose the value backing them. Use `reconcile` afterwards to see the
//! shortfall.

use gavel_ledger::Treasury;
use gavel_registry::AccessGate;
use gavel_types::{Address, AuctionError, Payout, PayoutReason, Result};

/// Last-resort drain to the administrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmergencyRecovery;

impl EmergencyRecovery {
    /// Debit everything the house holds and return the payout to the admin.
    ///
    /// # Errors
    /// - `NotAdmin` if `caller` is not the admin
    /// - `NoFundsToWithdraw` if nothing is held
    pub fn drain(&self, gate: &AccessGate, treasury: &mut Treasury, caller: Address) -> Result<Payout> {
        gate.require_admin(caller)?;
        let held = treasury.held();
        if held.is_zero() {
            return Err(AuctionError::NoFundsToWithdraw);
        }
        tracing::warn!(
            admin = %gate.admin(),
            %held,
            "emergency drain: pending balances and standing bids are no longer backed"
        );
        treasury.disburse(gate.admin(), held, PayoutReason::EmergencySweep)
    }
}
