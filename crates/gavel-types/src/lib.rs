//! # gavel-types
//!
//! Shared types, errors, and configuration for the **Gavel** escrow auction.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`ItemId`]
//! - **Item model**: [`Item`]
//! - **Lifecycle model**: [`AuctionStatus`], [`StatusView`]
//! - **Notifications**: [`AuctionEvent`], [`EventRecord`]
//! - **Time**: [`Clock`], [`SystemClock`], [`ManualClock`]
//! - **Funds transfer**: [`FundsTransfer`], [`Payout`], [`TransferBook`]
//! - **Configuration**: [`AuctionConfig`]
//! - **Errors**: [`AuctionError`] with `AUC_ERR_` prefix codes
//! - **Constants**: fee, bid increment, duration ceiling

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod item;
pub mod status;
pub mod transfer;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use item::*;
pub use status::*;
pub use transfer::*;

// Constants are accessed via `gavel_types::constants::FOO`
// (not re-exported to avoid name collisions).
