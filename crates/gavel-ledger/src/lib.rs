//! # gavel-ledger
//!
//! **Funds plane**: bid acceptance, the pull-payment ledger, and the
//! treasury that must always reconcile with inflows and outflows.
//!
//! ## Components
//!
//! 1. **BidLedger**: minimum-valid-bid rule and displaced-bidder crediting
//! 2. **PendingBalances**: what the house owes each displaced bidder
//! 3. **Treasury**: held balance, lifetime totals, conservation check
//!
//! ## Bid Flow
//!
//! ```text
//! bid → ItemRegistry (exists, verified, not own) → AuctionClock (window open)
//!     → minimum check → Treasury.receive() → PendingBalances.credit(displaced)
//! ```

pub mod bids;
pub mod pending;
pub mod treasury;

pub use bids::{BidContext, BidLedger, BidReceipt};
pub use pending::PendingBalances;
pub use treasury::{Reconciliation, Treasury};

use rust_decimal::Decimal;

/// `a + b`, or `None` if the sum leaves the range or loses precision.
/// Near the top of the range `checked_add` rounds instead of failing.
pub(crate) fn exact_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).filter(|sum| sum.checked_sub(a) == Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_add_refuses_rounded_sums() {
        assert_eq!(exact_add(Decimal::ONE, Decimal::new(5, 3)), Some(Decimal::new(1005, 3)));
        assert_eq!(exact_add(Decimal::MAX, Decimal::ONE), None);
        assert_eq!(exact_add(Decimal::MAX, Decimal::new(1, 2)), None);
        assert_eq!(exact_add(Decimal::MAX - Decimal::ONE, Decimal::new(5, 3)), None);
        assert_eq!(exact_add(Decimal::MAX - Decimal::ONE, Decimal::ONE), Some(Decimal::MAX));
    }
}
