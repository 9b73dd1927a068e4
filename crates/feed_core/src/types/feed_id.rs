//! Feed identity.
//!
//! # Examples
//!
//! ```
//! use feed_core::types::FeedId;
//!
//! let gold: FeedId = "gold".parse().unwrap();
//! assert_eq!(gold, FeedId::Gold);
//! assert_eq!(FeedId::SummaryStats.code(), "summary-stats");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FeedError;

/// One independently scheduled dashboard feed.
///
/// The set is closed: every feed has a built-in generator and declared
/// dataset bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedId {
    /// Gold spot price series (XAU/USD)
    Gold,
    /// Bitcoin / Ethereum / Solana trend series
    Crypto,
    /// Major currency pair rate table
    Forex,
    /// Fraud event scatter set
    Fraud,
    /// Four headline stat cards
    SummaryStats,
}

impl FeedId {
    /// Every feed, in dashboard order.
    pub const ALL: [FeedId; 5] = [
        FeedId::Gold,
        FeedId::Crypto,
        FeedId::Forex,
        FeedId::Fraud,
        FeedId::SummaryStats,
    ];

    /// Stable lowercase identifier used in config files and logs.
    pub fn code(&self) -> &'static str {
        match self {
            FeedId::Gold => "gold",
            FeedId::Crypto => "crypto",
            FeedId::Forex => "forex",
            FeedId::Fraud => "fraud",
            FeedId::SummaryStats => "summary-stats",
        }
    }

    /// Human-readable widget title.
    pub fn title(&self) -> &'static str {
        match self {
            FeedId::Gold => "Gold Price",
            FeedId::Crypto => "Cryptocurrency Trends",
            FeedId::Forex => "Forex Exchange Rates",
            FeedId::Fraud => "Fraud Activity Heatmap",
            FeedId::SummaryStats => "Summary Statistics",
        }
    }

    /// Upper-case key used for environment variable overrides
    /// (e.g. `DASHBOARD_GOLD_CADENCE_MS`).
    pub fn env_key(&self) -> &'static str {
        match self {
            FeedId::Gold => "GOLD",
            FeedId::Crypto => "CRYPTO",
            FeedId::Forex => "FOREX",
            FeedId::Fraud => "FRAUD",
            FeedId::SummaryStats => "SUMMARY_STATS",
        }
    }
}

impl FromStr for FeedId {
    type Err = FeedError;

    /// Parses a feed code (case-insensitive, `_` accepted for `-`).
    fn from_str(s: &str) -> Result<Self, FeedError> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "gold" => Ok(FeedId::Gold),
            "crypto" => Ok(FeedId::Crypto),
            "forex" => Ok(FeedId::Forex),
            "fraud" => Ok(FeedId::Fraud),
            "summary-stats" => Ok(FeedId::SummaryStats),
            _ => Err(FeedError::UnknownFeed(s.to_string())),
        }
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
