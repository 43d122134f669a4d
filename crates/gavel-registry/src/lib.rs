//! # gavel-registry
//!
//! **Admission plane**: who may act, when the auction is open, and which
//! items exist.
//!
//! ## Components
//!
//! 1. **AccessGate**: the single administrator identity and `require_admin`
//! 2. **AuctionClock**: the global auction window (inactive / active / past deadline)
//! 3. **ItemRegistry**: listing submission, admin verification, lookups
//! 4. **ItemIdSource**: pluggable id generation (hashed for tests, randomized for production)
//!
//! ## Submission Flow
//!
//! ```text
//! caller → ItemRegistry.submit() → ItemIdSource.next_id() → Item (unverified)
//! admin  → ItemRegistry.verify() → Item (verified, open to bids)
//! ```

pub mod access;
pub mod clock;
pub mod id_source;
pub mod registry;

pub use access::AccessGate;
pub use clock::AuctionClock;
pub use id_source::{HashedIdSource, ItemIdSource, RandomIdSource, Submission};
pub use registry::ItemRegistry;
