//! Shared harness for the house integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::TimeDelta;
use gavel_house::AuctionHouse;
use gavel_registry::HashedIdSource;
use gavel_types::{Address, AuctionConfig, FundsTransfer, ItemId, ManualClock, constants};
use rust_decimal::Decimal;

pub fn dec(n: i64, scale: u32) -> Decimal {
    Decimal::new(n, scale)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A house on a manual clock with deterministic item ids.
pub struct Harness {
    pub house: Arc<AuctionHouse>,
    pub admin: Address,
    pub seller: Address,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(transfers: Arc<dyn FundsTransfer>) -> Self {
        Self::with_config(transfers, AuctionConfig::default())
    }

    pub fn with_config(transfers: Arc<dyn FundsTransfer>, config: AuctionConfig) -> Self {
        init_tracing();
        let admin = Address::new();
        let clock = Arc::new(ManualClock::default());
        let house = AuctionHouse::new(admin, config, transfers)
            .unwrap()
            .with_clock(clock.clone())
            .with_id_source(Box::new(HashedIdSource::with_seed([7; 32])));
        Self {
            house: Arc::new(house),
            admin,
            seller: Address::new(),
            clock,
        }
    }

    /// Submit and verify a listing owned by `self.seller`.
    pub fn list(&self, title: &str, starting_price: Decimal) -> ItemId {
        let id = self
            .house
            .submit_item(
                self.seller,
                title,
                "Listed by the test harness",
                starting_price,
                constants::SUBMISSION_FEE,
            )
            .unwrap();
        self.house.verify_item(self.admin, id).unwrap();
        id
    }

    pub fn start(&self, minutes: u64) {
        self.house.start_auction(self.admin, minutes).unwrap();
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(TimeDelta::minutes(minutes));
    }
}
