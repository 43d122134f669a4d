//! # gavel-house
//!
//! Facade over the whole **Gavel** auction: one [`AuctionHouse`] owns the
//! admission plane (`gavel-registry`), the bid and balance ledgers
//! (`gavel-ledger`) and the finality plane (`gavel-settlement`) as a single
//! [`HouseState`].
//!
//! - Mutations serialize on one lock and commit atomically, including
//!   their outward transfer.
//! - Queries read an immutable snapshot published after every commit.
//! - Committed events are journaled, up to a configured retention, and
//!   broadcast over `tokio::sync::broadcast`.
//!
//! ```text
//!  submit ─▶ verify ─▶ start ─▶ bid ... bid ─▶ (deadline) ─▶ end ─▶ withdraw
//! ```

mod guard;
pub mod house;
pub mod state;

pub use house::AuctionHouse;
pub use state::HouseState;
