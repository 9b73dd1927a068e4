//! Per-feed construction parameters.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use feed_core::bounds::DatasetBounds;
use feed_core::generator::{RandomSeriesGenerator, SeriesGenerator};
use feed_core::types::{FeedError, FeedId};

/// Everything fixed at construction for one feed.
///
/// Only the feed's state changes after this is handed to a controller.
#[derive(Clone)]
pub struct FeedSpec {
    /// Feed identity
    pub id: FeedId,
    /// Interval between automatic refreshes
    pub cadence: Duration,
    /// Delay between a refresh starting and its dataset being installed
    pub latency: Duration,
    /// Dataset source
    pub generator: Arc<dyn SeriesGenerator>,
    /// Envelope every generated dataset must fit
    pub bounds: DatasetBounds,
    /// Seed for the feed's random source; entropy when `None`
    pub seed: Option<u64>,
}

impl FeedSpec {
    /// Feed with the built-in generator and bounds.
    pub fn new(id: FeedId, cadence: Duration, latency: Duration) -> Self {
        Self {
            id,
            cadence,
            latency,
            generator: Arc::new(RandomSeriesGenerator::new(id)),
            bounds: DatasetBounds::for_feed(id),
            seed: None,
        }
    }

    /// Feed with the dashboard's stock cadence and latency.
    pub fn default_for(id: FeedId) -> Self {
        Self::new(
            id,
            Duration::from_millis(default_cadence_ms(id)),
            Duration::from_millis(default_latency_ms(id)),
        )
    }

    /// Replace the generator.
    pub fn with_generator(mut self, generator: impl SeriesGenerator + 'static) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Replace the bounds.
    pub fn with_bounds(mut self, bounds: DatasetBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameters a feed cannot run with.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.cadence.is_zero() {
            return Err(FeedError::ZeroCadence(self.id));
        }
        if self.bounds.feed() != self.id {
            return Err(FeedError::configuration(format!(
                "feed {} configured with bounds for {}",
                self.id,
                self.bounds.feed()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for FeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSpec")
            .field("id", &self.id)
            .field("cadence", &self.cadence)
            .field("latency", &self.latency)
            .field("generator", &self.generator.name())
            .field("seed", &self.seed)
            .finish()
    }
}

/// Stock refresh interval.
pub fn default_cadence_ms(id: FeedId) -> u64 {
    match id {
        FeedId::Gold => 30_000,
        FeedId::Crypto => 35_000,
        FeedId::Forex => 25_000,
        FeedId::Fraud => 40_000,
        FeedId::SummaryStats => 5_000,
    }
}

/// Stock simulated latency. Stat cards update without a delay.
pub fn default_latency_ms(id: FeedId) -> u64 {
    match id {
        FeedId::SummaryStats => 0,
        _ => 800,
    }
}
