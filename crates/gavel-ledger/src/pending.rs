//! Pull-payment ledger.
//!
//! Tracks what the house owes each displaced bidder. Entries only grow
//! through [`PendingBalances::credit`] and only shrink, all at once, through
//! [`PendingBalances::take`].

use std::collections::HashMap;

use gavel_types::{Address, AuctionError, Result};
use rust_decimal::Decimal;

/// Amount owed per address, shared by the bid ledger (writer) and the
/// withdrawal engine (reader / clearer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBalances {
    owed: HashMap<Address, Decimal>,
}

impl PendingBalances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to what `who` is owed. Balances accumulate across items.
    ///
    /// # Errors
    /// Returns [`AuctionError::AmountOverflow`] if the balance would leave
    /// the decimal range; the entry is left as it was.
    pub fn credit(&mut self, who: Address, amount: Decimal) -> Result<()> {
        let current = self.balance(who);
        let next = crate::exact_add(current, amount).ok_or_else(|| AuctionError::AmountOverflow {
            reason: format!("crediting {amount} to {who} on top of {current}"),
        })?;
        self.owed.insert(who, next);
        Ok(())
    }

    /// What `who` is currently owed (zero if nothing).
    #[must_use]
    pub fn balance(&self, who: Address) -> Decimal {
        self.owed.get(&who).copied().unwrap_or(Decimal::ZERO)
    }

    /// Zero `who`'s entry and return the amount it held.
    ///
    /// # Errors
    /// Returns [`AuctionError::NoFundsToWithdraw`] if nothing is owed.
    pub fn take(&mut self, who: Address) -> Result<Decimal> {
        match self.owed.remove(&who) {
            Some(amount) if amount > Decimal::ZERO => Ok(amount),
            _ => Err(AuctionError::NoFundsToWithdraw),
        }
    }

    /// Sum of every outstanding entry, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.owed
            .values()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    }

    /// Number of addresses with a non-zero balance.
    #[must_use]
    pub fn accounts(&self) -> usize {
        self.owed.values().filter(|v| **v > Decimal::ZERO).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_address_owes_nothing() {
        let pending = PendingBalances::new();
        assert_eq!(pending.balance(Address::new()), Decimal::ZERO);
        assert_eq!(pending.total(), Decimal::ZERO);
    }

    #[test]
    fn credits_accumulate() {
        let mut pending = PendingBalances::new();
        let alice = Address::new();
        pending.credit(alice, Decimal::new(2, 1)).unwrap();
        pending.credit(alice, Decimal::new(22, 2)).unwrap();
        assert_eq!(pending.balance(alice), Decimal::new(42, 2));
        assert_eq!(pending.accounts(), 1);
    }

    #[test]
    fn take_zeroes_entry() {
        let mut pending = PendingBalances::new();
        let alice = Address::new();
        pending.credit(alice, Decimal::new(2, 1)).unwrap();
        assert_eq!(pending.take(alice).unwrap(), Decimal::new(2, 1));
        assert_eq!(pending.balance(alice), Decimal::ZERO);
        assert_eq!(pending.take(alice).unwrap_err(), AuctionError::NoFundsToWithdraw);
    }

    #[test]
    fn total_sums_all_accounts() {
        let mut pending = PendingBalances::new();
        pending.credit(Address::new(), Decimal::new(2, 1)).unwrap();
        pending.credit(Address::new(), Decimal::new(3, 1)).unwrap();
        assert_eq!(pending.total(), Decimal::new(5, 1));
        assert_eq!(pending.accounts(), 2);
    }

    #[test]
    fn overflowing_credit_is_refused() {
        let mut pending = PendingBalances::new();
        let alice = Address::new();
        pending.credit(alice, Decimal::MAX).unwrap();
        let err = pending.credit(alice, Decimal::ONE).unwrap_err();
        assert!(matches!(err, AuctionError::AmountOverflow { .. }));
        assert_eq!(pending.balance(alice), Decimal::MAX);

        pending.credit(Address::new(), Decimal::MAX).unwrap();
        assert_eq!(pending.total(), Decimal::MAX);
    }
}
