//! Configuration for an auction house.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result, constants};

/// Tunables for one auction house. Every field has a production default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Exact listing fee a submission must carry.
    pub submission_fee: Decimal,
    /// Step each bid after the first must clear.
    pub min_bid_increment: Decimal,
    /// Ceiling for `start_auction`, in minutes.
    pub max_duration_minutes: u64,
    /// Reject bids outside the global auction window.
    pub enforce_bidding_window: bool,
    /// Buffer size of the notification broadcast channel.
    pub event_channel_capacity: usize,
    /// Most recent events kept in the queryable journal; older ones are
    /// dropped from the front.
    pub journal_retention: usize,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            submission_fee: constants::SUBMISSION_FEE,
            min_bid_increment: constants::MINIMUM_BID_INCREMENT,
            max_duration_minutes: constants::MAX_DURATION_MINUTES,
            enforce_bidding_window: true,
            event_channel_capacity: constants::DEFAULT_EVENT_CHANNEL_CAPACITY,
            journal_retention: constants::DEFAULT_JOURNAL_RETENTION,
        }
    }
}

impl AuctionConfig {
    /// Parse a JSON document; missing fields fall back to defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the state machine cannot run with.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.submission_fee < Decimal::ZERO {
            return Err(AuctionError::Configuration(format!(
                "submission_fee must be non-negative, got {}",
                self.submission_fee
            )));
        }
        if self.min_bid_increment <= Decimal::ZERO {
            return Err(AuctionError::Configuration(format!(
                "min_bid_increment must be positive, got {}",
                self.min_bid_increment
            )));
        }
        if self.max_duration_minutes == 0 {
            return Err(AuctionError::Configuration(
                "max_duration_minutes must be positive".into(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(AuctionError::Configuration(
                "event_channel_capacity must be positive".into(),
            ));
        }
        if self.journal_retention == 0 {
            return Err(AuctionError::Configuration(
                "journal_retention must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = AuctionConfig::default();
        assert_eq!(cfg.submission_fee, Decimal::new(5, 3));
        assert_eq!(cfg.min_bid_increment, Decimal::new(1, 2));
        assert_eq!(cfg.max_duration_minutes, 43_200);
        assert!(cfg.enforce_bidding_window);
        assert_eq!(cfg.journal_retention, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let cfg = AuctionConfig::from_json(r#"{ "max_duration_minutes": 120 }"#).unwrap();
        assert_eq!(cfg.max_duration_minutes, 120);
        assert_eq!(cfg.submission_fee, constants::SUBMISSION_FEE);
    }

    #[test]
    fn from_json_rejects_zero_increment() {
        let err = AuctionConfig::from_json(r#"{ "min_bid_increment": "0" }"#).unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }

    #[test]
    fn from_json_rejects_zero_retention() {
        let err = AuctionConfig::from_json(r#"{ "journal_retention": 0 }"#).unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = AuctionConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = AuctionConfig {
            enforce_bidding_window: false,
            ..AuctionConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AuctionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
