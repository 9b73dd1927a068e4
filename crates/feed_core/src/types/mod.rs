//! Core feed and dataset types.
//!
//! This module provides:
//! - `feed_id`: The closed set of dashboard feeds
//! - `dataset`: Dataset payloads per feed kind and their record types
//! - `timestamp`: Millisecond timestamps stamped on completed refreshes
//! - `error`: Structured error types for feed construction and dataset checks

pub mod dataset;
pub mod error;
pub mod feed_id;
pub mod timestamp;

// Re-export commonly used types at module level
pub use dataset::{
    Dataset, DatasetKind, ForexRate, FraudCategory, FraudEvent, Region, SeriesPoint, StatCard,
};
pub use error::{FeedError, InvariantViolation};
pub use feed_id::FeedId;
pub use timestamp::Timestamp;
