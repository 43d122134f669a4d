//! Broadcast notifications.

mod common;

use std::sync::Arc;

use common::{Harness, dec};
use gavel_types::{Address, AuctionEvent, TransferBook};
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn subscriber_receives_commits_in_order() {
    let h = Harness::new(Arc::new(TransferBook::new()));
    let mut rx = h.house.subscribe();

    let item = h.list("Lamp", dec(1, 1));
    h.start(60);
    let alice = Address::new();
    h.house.place_bid(alice, item, dec(2, 1)).unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(rx.recv().await.unwrap());
    }
    assert_eq!(seen[0].event, AuctionEvent::ItemSubmitted { item_id: item });
    assert_eq!(seen[1].event, AuctionEvent::ItemVerified { item_id: item });
    assert!(matches!(seen[2].event, AuctionEvent::AuctionStarted { .. }));
    assert_eq!(
        seen[3].event,
        AuctionEvent::NewHighestBid {
            item_id: item,
            bidder: alice,
            amount: dec(2, 1)
        }
    );
    assert_eq!(seen, h.house.events());
}

#[tokio::test]
async fn failed_calls_broadcast_nothing() {
    let h = Harness::new(Arc::new(TransferBook::new()));
    let mut rx = h.house.subscribe();

    let _ = h.house.withdraw(Address::new());
    let _ = h.house.start_auction(Address::new(), 60);
    let _ = h.house.receive_direct(Address::new(), dec(1, 0));

    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn late_subscriber_only_sees_new_events() {
    let h = Harness::new(Arc::new(TransferBook::new()));
    h.list("Lamp", dec(1, 1));

    let mut rx = h.house.subscribe();
    let house = Arc::clone(&h.house);
    let admin = h.admin;
    tokio::task::spawn_blocking(move || house.start_auction(admin, 30))
        .await
        .unwrap()
        .unwrap();

    let record = rx.recv().await.unwrap();
    assert_eq!(record.sequence, 2);
    assert!(matches!(record.event, AuctionEvent::AuctionStarted { .. }));
    assert_eq!(record.event.item_id(), None);
    assert_eq!(h.house.events().len(), 3);
}
