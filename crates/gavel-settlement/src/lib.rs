//! # gavel-settlement
//!
//! **Finality plane**: everything that moves value out of the house.
//!
//! ## Architecture
//!
//! Each engine debits its own ledger entry and the treasury first, then
//! hands back a [`Payout`](gavel_types::Payout) for the facade to execute:
//! 1. **WithdrawalEngine**: releases a displaced bidder's pull-payment balance
//! 2. **SettlementEngine**: closes one item, paying its owner the winning bid
//! 3. **EmergencyRecovery**: sweeps the entire held balance to the admin
//!
//! No engine here ever calls the transfer facility itself.

pub mod emergency;
pub mod settle;
pub mod withdrawal;

pub use emergency::EmergencyRecovery;
pub use settle::{SettlementContext, SettlementEngine, SettlementReceipt};
pub use withdrawal::WithdrawalEngine;
