//! Item identifier generation.
//!
//! Ids are digests over the submission plus a per-source counter, so no
//! two submissions through the same source share a preimage. The
//! randomized source also mixes in fresh entropy, so an id cannot be
//! predicted from the submission content alone.

use chrono::{DateTime, Utc};
use gavel_types::{Address, ItemId};
use rust_decimal::Decimal;

/// The submission content an id is derived from.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub owner: Address,
    pub title: &'a str,
    pub description: &'a str,
    pub starting_price: Decimal,
    pub submitted_at: DateTime<Utc>,
}

impl Submission<'_> {
    fn digest(&self, counter: u64, salt: &[u8]) -> ItemId {
        let price = self.starting_price.serialize();
        let millis = self.submitted_at.timestamp_millis().to_le_bytes();
        ItemId::derive(&[
            self.owner.as_bytes(),
            self.title.as_bytes(),
            self.description.as_bytes(),
            &price,
            &millis,
            &counter.to_le_bytes(),
            salt,
        ])
    }
}

/// Produces item identifiers. Swappable between test and production modes.
pub trait ItemIdSource: Send {
    fn next_id(&mut self, submission: &Submission<'_>) -> ItemId;
}

/// Deterministic source: same submissions in the same order yield the same ids.
#[derive(Debug, Clone, Default)]
pub struct HashedIdSource {
    counter: u64,
    seed: [u8; 32],
}

impl HashedIdSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A deterministic source namespaced by `seed`.
    #[must_use]
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self { counter: 0, seed }
    }
}

impl ItemIdSource for HashedIdSource {
    fn next_id(&mut self, submission: &Submission<'_>) -> ItemId {
        let id = submission.digest(self.counter, &self.seed);
        self.counter += 1;
        id
    }
}

/// Production source: every id carries 32 bytes of fresh randomness.
#[derive(Debug, Clone, Default)]
pub struct RandomIdSource {
    counter: u64,
}

impl RandomIdSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemIdSource for RandomIdSource {
    fn next_id(&mut self, submission: &Submission<'_>) -> ItemId {
        let salt: [u8; 32] = rand::random();
        let id = submission.digest(self.counter, &salt);
        self.counter += 1;
        id
    }
}
