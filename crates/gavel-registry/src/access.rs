//! Access gate — the single administrator identity.

use gavel_types::{Address, AuctionError, Result};

/// Holds the administrator fixed at house creation. There is no rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGate {
    admin: Address,
}

impl AccessGate {
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, caller: Address) -> bool {
        caller == self.admin
    }

    /// Guard for every privileged operation.
    ///
    /// # Errors
    /// Returns [`AuctionError::NotAdmin`] unless `caller` is the admin.
    pub fn require_admin(&self, caller: Address) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(AuctionError::NotAdmin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes() {
        let admin = Address::new();
        let gate = AccessGate::new(admin);
        assert!(gate.require_admin(admin).is_ok());
        assert_eq!(gate.admin(), admin);
    }

    #[test]
    fn stranger_is_rejected() {
        let gate = AccessGate::new(Address::new());
        let err = gate.require_admin(Address::new()).unwrap_err();
        assert_eq!(err, AuctionError::NotAdmin);
    }
}
