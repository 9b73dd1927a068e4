//! # feed_core: Domain Foundation for the Monitoring Dashboard
//!
//! ## Layer 1 (Domain) Role
//!
//! feed_core is the bottom layer of the workspace and has no async code:
//! - Feed identity and dataset types (`types`)
//! - Synthetic data generation per feed (`generator`)
//! - Declared dataset bounds and invariant checks (`bounds`)
//! - Pure presentation filters (`filter`)
//!
//! Scheduling, timers and subscriptions live in `feed_runtime`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use feed_core::generator::generate;
//! use feed_core::bounds::DatasetBounds;
//! use feed_core::types::FeedId;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let dataset = generate(FeedId::Gold, &mut rng);
//! assert_eq!(dataset.len(), 24);
//! assert!(DatasetBounds::for_feed(FeedId::Gold).validate(&dataset).is_ok());
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bounds;
pub mod filter;
pub mod generator;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounds::DatasetBounds;
    pub use crate::filter::{
        filter_events, filter_series, BaseCurrency, FilterSelection, ForexView, FraudSelector,
        SeriesSelection, SeverityBand,
    };
    pub use crate::generator::{generate, RandomSeriesGenerator, SeriesGenerator};
    pub use crate::types::{
        Dataset, DatasetKind, FeedError, FeedId, ForexRate, FraudCategory, FraudEvent,
        InvariantViolation, Region, SeriesPoint, StatCard, Timestamp,
    };
}
