//! # AuctionHouse: the single serialization point
//!
//! ## Commit protocol
//!
//! ```text
//!   caller ──▶ reentrancy check ──▶ lock writer ──▶ copy state (rollback)
//!                                                        │
//!              ┌─────────────────────────────────────────┘
//!              ▼
//!        run operation ──▶ state.verify() ──▶ transfer payout (≤ 1)
//!              │ Err              │ Err               │ Err
//!              ▼                ▼                   ▼
//!           restore          restore             restore ──▶ TransferFailed
//!              │
//!              ▼ Ok
//!        publish snapshot + journal ──▶ broadcast
//! ```
//!
//! Operations debit their own ledger entry and the treasury before the
//! payout is handed back, so the transfer always happens against state
//! that already reflects it. Nothing is journaled or broadcast until the
//! transfer has gone through.
//!
//! A panic inside an operation or a transfer poisons the writer lock. The
//! next caller takes the lock back and resets the writer to the last
//! published state, so an uncommitted half-step is never built upon.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use gavel_ledger::{BidContext, BidReceipt, Reconciliation};
use gavel_registry::{ItemIdSource, RandomIdSource};
use gavel_settlement::{
    EmergencyRecovery, SettlementContext, SettlementEngine, SettlementReceipt, WithdrawalEngine,
};
use gavel_types::{
    Address, AuctionConfig, AuctionError, AuctionEvent, AuctionStatus, Clock, EventRecord,
    FundsTransfer, Item, ItemId, Payout, PayoutReason, Result, StatusView, SystemClock, constants,
};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::guard::{self, TransferGuard};
use crate::state::HouseState;

/// What a successful operation wants committed.
struct Effects<T> {
    value: T,
    payout: Option<Payout>,
    events: Vec<AuctionEvent>,
}

impl<T> Effects<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            payout: None,
            events: Vec::new(),
        }
    }

    fn pay(mut self, payout: Option<Payout>) -> Self {
        self.payout = payout;
        self
    }

    fn emit(mut self, event: AuctionEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// State only the writer touches.
struct Writer {
    state: HouseState,
    ids: Box<dyn ItemIdSource>,
    next_sequence: u64,
}

/// What readers see: the last committed state and the journal up to it.
struct Published {
    state: Arc<HouseState>,
    journal: VecDeque<EventRecord>,
}

/// Escrow auction house with a single administrator.
///
/// Mutating operations serialize on one lock; queries read the last
/// committed snapshot and never wait on a writer.
pub struct AuctionHouse {
    writer: Mutex<Writer>,
    published: RwLock<Published>,
    journal_retention: usize,
    clock: Arc<dyn Clock>,
    transfers: Arc<dyn FundsTransfer>,
    events: broadcast::Sender<EventRecord>,
}

impl AuctionHouse {
    /// Build a house administered by `admin`, paying out through `transfers`.
    ///
    /// Uses the wall clock and randomized item ids; see [`Self::with_clock`]
    /// and [`Self::with_id_source`] to replace them.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(
        admin: Address,
        config: AuctionConfig,
        transfers: Arc<dyn FundsTransfer>,
    ) -> Result<Self> {
        config.validate()?;
        let state = HouseState::new(admin, &config);
        let (events, _) = broadcast::channel(config.event_channel_capacity);

        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            %admin,
            fee = %config.submission_fee,
            increment = %config.min_bid_increment,
            max_minutes = config.max_duration_minutes,
            "auction house opened"
        );

        Ok(Self {
            published: RwLock::new(Published {
                state: Arc::new(state.clone()),
                journal: VecDeque::new(),
            }),
            writer: Mutex::new(Writer {
                state,
                ids: Box::new(RandomIdSource::new()),
                next_sequence: 0,
            }),
            journal_retention: config.journal_retention,
            clock: Arc::new(SystemClock),
            transfers,
            events,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_id_source(mut self, ids: Box<dyn ItemIdSource>) -> Self {
        self.writer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .ids = ids;
        self
    }

    /// Receive every event committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// List an item. `fee_paid` must equal the submission fee exactly and
    /// is forwarded to the admin in the same call.
    pub fn submit_item(
        &self,
        caller: Address,
        title: &str,
        description: &str,
        starting_price: Decimal,
        fee_paid: Decimal,
    ) -> Result<ItemId> {
        self.transact("submit_item", |w, now| {
            let item_id = w.state.registry.submit(
                w.ids.as_mut(),
                caller,
                title,
                description,
                starting_price,
                fee_paid,
                now,
            )?;

            w.state.treasury.receive(fee_paid)?;
            let payout = if fee_paid.is_zero() {
                None
            } else {
                let admin = w.state.gate.admin();
                Some(
                    w.state
                        .treasury
                        .disburse(admin, fee_paid, PayoutReason::SubmissionFee)?,
                )
            };

            Ok(Effects::new(item_id)
                .pay(payout)
                .emit(AuctionEvent::ItemSubmitted { item_id }))
        })
    }

    pub fn verify_item(&self, caller: Address, item_id: ItemId) -> Result<()> {
        self.transact("verify_item", |w, _| {
            w.state.registry.verify(&w.state.gate, caller, item_id)?;
            Ok(Effects::new(()).emit(AuctionEvent::ItemVerified { item_id }))
        })
    }

    /// Arm the global window for `duration_minutes` from now. Calling it
    /// again while active re-arms from the current time.
    pub fn start_auction(&self, caller: Address, duration_minutes: u64) -> Result<AuctionStatus> {
        self.transact("start_auction", |w, now| {
            let status = w
                .state
                .clock
                .start(&w.state.gate, caller, duration_minutes, now)?;
            let event = AuctionEvent::AuctionStarted {
                start_time: status.start_time.unwrap_or(now),
                end_time: status.end_time.unwrap_or(now),
            };
            Ok(Effects::new(status).emit(event))
        })
    }

    /// Bid `amount` on `item_id`. A displaced bidder's amount becomes
    /// withdrawable through [`Self::withdraw`].
    pub fn place_bid(&self, caller: Address, item_id: ItemId, amount: Decimal) -> Result<BidReceipt> {
        self.transact("place_bid", |w, now| {
            let state = &mut w.state;
            let receipt = state.bids.place_bid(
                BidContext {
                    registry: &mut state.registry,
                    clock: &state.clock,
                    pending: &mut state.pending,
                    treasury: &mut state.treasury,
                },
                caller,
                item_id,
                amount,
                now,
            )?;
            let event = AuctionEvent::NewHighestBid {
                item_id,
                bidder: caller,
                amount,
            };
            Ok(Effects::new(receipt).emit(event))
        })
    }

    /// Pay out everything owed to `caller`. Returns the amount sent.
    pub fn withdraw(&self, caller: Address) -> Result<Decimal> {
        self.transact("withdraw", |w, _| {
            let payout =
                WithdrawalEngine.withdraw(&mut w.state.pending, &mut w.state.treasury, caller)?;
            let event = AuctionEvent::Withdrawn {
                account: caller,
                amount: payout.amount,
            };
            Ok(Effects::new(payout.amount).pay(Some(payout)).emit(event))
        })
    }

    /// Settle one item after the deadline, paying its owner if it sold.
    pub fn end_auction(&self, caller: Address, item_id: ItemId) -> Result<SettlementReceipt> {
        self.transact("end_auction", |w, now| {
            let state = &mut w.state;
            let (receipt, payout) = SettlementEngine.end(
                SettlementContext {
                    gate: &state.gate,
                    clock: &state.clock,
                    registry: &mut state.registry,
                    treasury: &mut state.treasury,
                },
                caller,
                item_id,
                now,
            )?;
            let event = AuctionEvent::AuctionEnded {
                item_id,
                winner: receipt.winner,
                amount: receipt.amount,
            };
            Ok(Effects::new(receipt).pay(payout).emit(event))
        })
    }

    /// Sweep the whole held balance to the admin. Leaves pending balances
    /// and standing bids unbacked; see [`Self::reconcile`].
    pub fn emergency_withdraw(&self, caller: Address) -> Result<Decimal> {
        self.transact("emergency_withdraw", |w, _| {
            let payout = EmergencyRecovery.drain(&w.state.gate, &mut w.state.treasury, caller)?;
            let event = AuctionEvent::EmergencyWithdrawal {
                amount: payout.amount,
            };
            Ok(Effects::new(payout.amount).pay(Some(payout)).emit(event))
        })
    }

    /// Value sent to the house outside `submit_item` and `place_bid` is
    /// refused.
    #[allow(clippy::unused_self)]
    pub fn receive_direct(&self, sender: Address, amount: Decimal) -> Result<()> {
        tracing::debug!(%sender, %amount, "direct deposit refused");
        Err(AuctionError::DirectDepositRejected)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The last committed state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<HouseState> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner).state)
    }

    #[must_use]
    pub fn admin(&self) -> Address {
        self.snapshot().gate.admin()
    }

    #[must_use]
    pub fn auction_status(&self) -> StatusView {
        StatusView::at(self.snapshot().clock.status(), self.clock.now())
    }

    #[must_use]
    pub fn bidder_balance(&self, who: Address) -> Decimal {
        self.snapshot().pending.balance(who)
    }

    /// Item ids in submission order.
    #[must_use]
    pub fn all_item_ids(&self) -> Vec<ItemId> {
        self.snapshot().registry.list_ids()
    }

    pub fn minimum_valid_bid(&self, item_id: ItemId) -> Result<Decimal> {
        self.snapshot().minimum_valid_bid(&item_id)
    }

    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<Item> {
        self.snapshot().registry.get(&item_id).cloned()
    }

    #[must_use]
    pub fn held_balance(&self) -> Decimal {
        self.snapshot().treasury.held()
    }

    /// The retained event journal, in commit order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.events_since(0)
    }

    /// Retained events with a sequence of at least `sequence`.
    #[must_use]
    pub fn events_since(&self, sequence: u64) -> Vec<EventRecord> {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        let start = published
            .journal
            .partition_point(|record| record.sequence < sequence);
        published.journal.range(start..).cloned().collect()
    }

    #[must_use]
    pub fn reconcile(&self) -> Reconciliation {
        self.snapshot().reconcile()
    }

    // ------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------

    fn transact<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Writer, DateTime<Utc>) -> Result<Effects<T>>,
    ) -> Result<T> {
        if guard::in_transfer() {
            tracing::warn!(op, "mutating call from inside a transfer rejected");
            return Err(AuctionError::ReentrantCall);
        }

        let mut writer = self.lock_writer(op);
        let now = self.clock.now();
        let rollback = writer.state.clone();

        let outcome = f(&mut *writer, now).and_then(|effects| {
            writer.state.verify()?;
            Ok(effects)
        });
        let effects = match outcome {
            Ok(effects) => effects,
            Err(err) => {
                writer.state = rollback;
                tracing::debug!(op, error = %err, "call rejected");
                return Err(err);
            }
        };

        if let Some(payout) = effects.payout {
            let sent = {
                let _guard = TransferGuard::enter();
                self.transfers.transfer(&payout)
            };
            if let Err(err) = sent {
                writer.state = rollback;
                tracing::warn!(
                    op,
                    to = %payout.to,
                    amount = %payout.amount,
                    reason = %payout.reason,
                    error = %err,
                    "transfer refused, call rolled back"
                );
                return Err(match err {
                    e @ AuctionError::TransferFailed { .. } => e,
                    other => AuctionError::TransferFailed {
                        reason: other.to_string(),
                    },
                });
            }
        }

        let mut records = Vec::with_capacity(effects.events.len());
        for event in effects.events {
            records.push(EventRecord {
                sequence: writer.next_sequence,
                at: now,
                event,
            });
            writer.next_sequence += 1;
        }

        {
            let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
            published.state = Arc::new(writer.state.clone());
            published.journal.extend(records.iter().cloned());
            let excess = published.journal.len().saturating_sub(self.journal_retention);
            published.journal.drain(..excess);
        }

        for record in records {
            tracing::info!(op, sequence = record.sequence, event = %record.event, "committed");
            // No subscribers is not an error.
            let _ = self.events.send(record);
        }
        Ok(effects.value)
    }

    fn lock_writer(&self, op: &'static str) -> MutexGuard<'_, Writer> {
        self.writer.lock().unwrap_or_else(|poisoned| {
            let mut writer = poisoned.into_inner();
            writer.state = HouseState::clone(&self.snapshot());
            self.writer.clear_poison();
            tracing::error!(op, "writer recovered after a panic, state reset to last commit");
            writer
        })
    }
}
