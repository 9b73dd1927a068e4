//! Error types for structured error handling.
//!
//! This module provides:
//! - `FeedError`: Errors from feed identification and construction
//! - `InvariantViolation`: A generated dataset outside its declared bounds

use thiserror::Error;

use super::feed_id::FeedId;

/// Feed construction and identification errors.
///
/// All variants are configuration-time failures. None of them can arise
/// once a feed is running.
///
/// # Examples
/// ```
/// use feed_core::types::{FeedError, FeedId};
///
/// let err = FeedError::ZeroCadence(FeedId::Gold);
/// assert_eq!(format!("{}", err), "Invalid cadence for feed gold: must be greater than zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Cadence of zero would spin the timer
    #[error("Invalid cadence for feed {0}: must be greater than zero")]
    ZeroCadence(FeedId),

    /// The same feed was registered twice
    #[error("Duplicate feed: {0}")]
    DuplicateFeed(FeedId),

    /// Feed code did not match any known feed
    #[error("Unknown feed: {0}")]
    UnknownFeed(String),

    /// The very first generation failed its bounds, so there is nothing
    /// valid to show
    #[error("Initial dataset rejected: {0}")]
    InitialDataset(InvariantViolation),

    /// Any other configuration problem
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FeedError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// A generated dataset that falls outside its feed's declared bounds.
///
/// Never propagated as an error from the refresh path: the runtime keeps the
/// previous dataset and records this as a diagnostic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{feed} dataset violates {field}: {detail}")]
pub struct InvariantViolation {
    /// Feed whose dataset was rejected
    pub feed: FeedId,
    /// Offending field, e.g. `points[3].price`
    pub field: String,
    /// What was wrong with it
    pub detail: String,
}

impl InvariantViolation {
    /// Create a new violation
    pub fn new(feed: FeedId, field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            feed,
            field: field.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedError::configuration("bad seed");
        assert!(err.to_string().contains("bad seed"));

        let err = FeedError::DuplicateFeed(FeedId::Forex);
        assert_eq!(err.to_string(), "Duplicate feed: forex");
    }

    #[test]
    fn test_invariant_violation_display() {
        let v = InvariantViolation::new(FeedId::Gold, "points[0].price", "NaN outside [1950, 2115]");
        assert_eq!(
            v.to_string(),
            "gold dataset violates points[0].price: NaN outside [1950, 2115]"
        );
    }
}
