//! Reentrancy guard for outward transfers.
//!
//! The house issues transfers while it still holds its writer lock. A
//! transfer facility that calls back into a mutating operation on the
//! same thread would deadlock on that lock; instead the flag below makes
//! the nested call fail fast with `ReentrantCall`.

use std::cell::Cell;

thread_local! {
    static IN_TRANSFER: Cell<bool> = const { Cell::new(false) };
}

/// True while the current thread is inside [`FundsTransfer::transfer`].
///
/// [`FundsTransfer::transfer`]: gavel_types::FundsTransfer::transfer
pub(crate) fn in_transfer() -> bool {
    IN_TRANSFER.with(Cell::get)
}

/// Marks the current thread as inside a transfer until dropped.
pub(crate) struct TransferGuard {
    previous: bool,
}

impl TransferGuard {
    pub(crate) fn enter() -> Self {
        let previous = IN_TRANSFER.with(|flag| flag.replace(true));
        Self { previous }
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        IN_TRANSFER.with(|flag| flag.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_follows_guard_scope() {
        assert!(!in_transfer());
        {
            let _guard = TransferGuard::enter();
            assert!(in_transfer());
        }
        assert!(!in_transfer());
    }

    #[test]
    fn nested_guards_restore_outer_state() {
        let outer = TransferGuard::enter();
        {
            let _inner = TransferGuard::enter();
            assert!(in_transfer());
        }
        assert!(in_transfer());
        drop(outer);
        assert!(!in_transfer());
    }

    #[test]
    fn flag_is_per_thread() {
        let _guard = TransferGuard::enter();
        let other = std::thread::spawn(in_transfer).join().unwrap();
        assert!(!other);
    }

    #[test]
    fn flag_cleared_on_unwind() {
        let result = std::panic::catch_unwind(|| {
            let _guard = TransferGuard::enter();
            panic!("transfer blew up");
        });
        assert!(result.is_err());
        assert!(!in_transfer());
    }
}
