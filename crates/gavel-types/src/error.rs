//! Error types for the Gavel auction.
//!
//! All errors use the `AUC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access / lifecycle errors
//! - 2xx: Item registry errors
//! - 3xx: Bidding errors
//! - 4xx: Funds errors
//! - 5xx: Settlement errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ItemId;

/// Central error enum for every Gavel operation.
///
/// The set is closed: callers branch on the variant, never on the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    // =================================================================
    // Access / Lifecycle Errors (1xx)
    // =================================================================
    /// A privileged operation was called by someone other than the admin.
    #[error("AUC_ERR_100: Caller is not the administrator")]
    NotAdmin,

    /// The requested auction duration is zero or above the ceiling.
    #[error("AUC_ERR_101: Invalid auction duration: {minutes} minutes (allowed 1..={max})")]
    InvalidDuration { minutes: u64, max: u64 },

    /// A bid arrived while the global auction window was not open.
    #[error("AUC_ERR_102: Bidding is closed")]
    BiddingClosed,

    // =================================================================
    // Item Registry Errors (2xx)
    // =================================================================
    /// The item does not exist, or its submission data is malformed.
    #[error("AUC_ERR_200: Invalid item: {reason}")]
    InvalidItem { reason: String },

    /// The submission fee was not exactly the fixed fee.
    #[error("AUC_ERR_201: Insufficient fee: required exactly {required}, paid {paid}")]
    InsufficientFee { required: Decimal, paid: Decimal },

    /// The item was already verified by the administrator.
    #[error("AUC_ERR_202: Item already verified: {0}")]
    ItemAlreadyVerified(ItemId),

    /// The id source produced an identifier that is already registered.
    #[error("AUC_ERR_203: Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    // =================================================================
    // Bidding Errors (3xx)
    // =================================================================
    /// Bids are only accepted on verified items.
    #[error("AUC_ERR_300: Item not verified: {0}")]
    NotVerified(ItemId),

    /// The item owner tried to bid on their own listing.
    #[error("AUC_ERR_301: Owner cannot bid on own item")]
    SelfBidding,

    /// The bid is below the current minimum valid bid.
    #[error("AUC_ERR_302: Bid too low: minimum {minimum}, offered {offered}")]
    BidTooLow { minimum: Decimal, offered: Decimal },

    // =================================================================
    // Funds Errors (4xx)
    // =================================================================
    /// Nothing is owed to the caller (or nothing is held, for emergency drains).
    #[error("AUC_ERR_400: No funds to withdraw")]
    NoFundsToWithdraw,

    /// Value was sent outside the submission and bidding entry points.
    #[error("AUC_ERR_401: Direct deposits not accepted")]
    DirectDepositRejected,

    /// The external funds-transfer facility refused a payout.
    #[error("AUC_ERR_402: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Held balance no longer backs what the house owes. Critical.
    #[error("AUC_ERR_403: Funds invariant violation: {reason}")]
    FundsInvariantViolation { reason: String },

    /// An amount would leave the representable decimal range.
    #[error("AUC_ERR_404: Amount overflow: {reason}")]
    AmountOverflow { reason: String },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// The auction window has not passed yet (or was never started).
    #[error("AUC_ERR_500: Too early to end: auction deadline not reached")]
    TooEarlyToEnd,

    /// The item has already been settled.
    #[error("AUC_ERR_501: Item already sold: {0}")]
    AlreadySold(ItemId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A mutating call was issued from inside an outward transfer.
    #[error("AUC_ERR_900: Reentrant call rejected")]
    ReentrantCall,

    /// Configuration error (invalid values, unparsable document).
    #[error("AUC_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Unrecoverable internal error.
    #[error("AUC_ERR_902: Internal error: {0}")]
    Internal(String),
}

impl AuctionError {
    /// Shorthand for [`AuctionError::InvalidItem`].
    pub fn invalid_item(reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
