//! System-wide constants for the Gavel auction.

use rust_decimal::Decimal;

/// Fixed listing fee, exact-match (0.005 value-units).
pub const SUBMISSION_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Fixed step every bid after the first must clear (0.01 value-units).
pub const MINIMUM_BID_INCREMENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Longest auction window accepted by `start`: 30 days, in minutes.
pub const MAX_DURATION_MINUTES: u64 = 30 * 24 * 60;

/// Default capacity of the notification broadcast channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Default number of committed events kept queryable by the house.
pub const DEFAULT_JOURNAL_RETENTION: usize = 10_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Gavel";
