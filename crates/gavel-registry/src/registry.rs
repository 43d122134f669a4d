//! Item registry — create, vet and look up listings.
//!
//! The registry owns every [`Item`]. Ids are kept in submission order for
//! the listing API; lookups go through a hash map.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gavel_types::{Address, AuctionError, Item, ItemId, Result, constants};
use rust_decimal::Decimal;

use crate::access::AccessGate;
use crate::id_source::{ItemIdSource, Submission};

/// All listed items, keyed by id.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: HashMap<ItemId, Item>,
    /// Ids in submission order.
    order: Vec<ItemId>,
    /// Exact fee every submission must carry.
    submission_fee: Decimal,
}

impl ItemRegistry {
    #[must_use]
    pub fn new(submission_fee: Decimal) -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
            submission_fee,
        }
    }

    #[must_use]
    pub fn submission_fee(&self) -> Decimal {
        self.submission_fee
    }

    /// Validate and list a new item owned by `caller`.
    ///
    /// The fee itself is accounted for by the caller of this method; the
    /// registry only checks that it is exactly the fixed fee.
    ///
    /// # Errors
    /// - `InvalidItem` if title or description is blank, or the starting price is negative
    /// - `InsufficientFee` if `fee_paid` is not exactly the submission fee
    /// - `DuplicateItem` if the id source produced an id already listed
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        ids: &mut dyn ItemIdSource,
        caller: Address,
        title: &str,
        description: &str,
        starting_price: Decimal,
        fee_paid: Decimal,
        now: DateTime<Utc>,
    ) -> Result<ItemId> {
        if title.trim().is_empty() {
            return Err(AuctionError::invalid_item("title must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(AuctionError::invalid_item("description must not be empty"));
        }
        if starting_price < Decimal::ZERO {
            return Err(AuctionError::invalid_item(format!(
                "starting price must be non-negative, got {starting_price}"
            )));
        }
        if fee_paid != self.submission_fee {
            return Err(AuctionError::InsufficientFee {
                required: self.submission_fee,
                paid: fee_paid,
            });
        }

        let id = ids.next_id(&Submission {
            owner: caller,
            title,
            description,
            starting_price,
            submitted_at: now,
        });
        if self.items.contains_key(&id) {
            return Err(AuctionError::DuplicateItem(id));
        }

        let item = Item::new(
            id,
            caller,
            title.to_string(),
            description.to_string(),
            starting_price,
            now,
        );
        self.items.insert(id, item);
        self.order.push(id);
        Ok(id)
    }

    /// Admin vetting. One-way: there is no un-verify.
    ///
    /// # Errors
    /// - `NotAdmin` if `caller` is not the admin
    /// - `InvalidItem` if no such item
    /// - `ItemAlreadyVerified` on a second call
    pub fn verify(&mut self, gate: &AccessGate, caller: Address, item_id: ItemId) -> Result<()> {
        gate.require_admin(caller)?;
        self.get_mut(item_id)?.mark_verified()
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.get(item_id)
    }

    /// Mutable lookup for the bid ledger and settlement engine.
    ///
    /// # Errors
    /// Returns `InvalidItem` if no such item.
    pub fn get_mut(&mut self, item_id: ItemId) -> Result<&mut Item> {
        self.items
            .get_mut(&item_id)
            .ok_or_else(|| AuctionError::invalid_item(format!("{item_id} not found")))
    }

    /// Every id, in submission order.
    #[must_use]
    pub fn list_ids(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    /// Items in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new(constants::SUBMISSION_FEE)
    }
}
