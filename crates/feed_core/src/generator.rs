//! Synthetic dataset generation.
//!
//! Generates bounded, visually plausible noise for every feed. This is not a
//! price model: each generation draws a fresh base level and scatters points
//! around it.
//!
//! ## Bounding rules
//!
//! - **Gold**: base in `[2000, 2100)`, 24 hourly points at `base + [-15, 15)`
//!   floored at `base - 50`
//! - **Crypto**: independent bitcoin / ethereum bases with asset-specific
//!   noise and floors; solana around a fixed centre of 100, floored at 80
//! - **Forex**: six pairs, each in its own band, change in `[-1, 1]`
//! - **Fraud**: 50 integral scatter points with uniform region and category
//! - **Summary**: four stat cards, two-decimal values
//!
//! All functions are deterministic given the random source.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::types::{
    Dataset, FeedId, ForexRate, FraudCategory, FraudEvent, Region, SeriesPoint, StatCard,
};

/// Points per time series (one per hour).
pub const SERIES_POINTS: usize = 24;
/// Points per fraud scatter set.
pub const FRAUD_EVENTS: usize = 50;

/// Gold series name for the price line.
pub const GOLD_PRICE: &str = "price";
/// Gold series name for the volatility overlay.
pub const GOLD_VOLATILITY: &str = "volatility";
/// Crypto series names, in legend order.
pub const CRYPTO_ASSETS: [&str; 3] = ["bitcoin", "ethereum", "solana"];

/// Gold base price range.
pub const GOLD_BASE: Range<f64> = 2000.0..2100.0;
/// Half-width of gold per-point noise.
pub const GOLD_NOISE: f64 = 15.0;
/// Largest drop below base a gold point may show.
pub const GOLD_FLOOR_DROP: f64 = 50.0;
/// Exclusive upper bound on gold volatility.
pub const GOLD_VOLATILITY_MAX: f64 = 5.0;

/// Bitcoin base price range.
pub const BITCOIN_BASE: Range<f64> = 50_000.0..60_000.0;
/// Half-width of bitcoin per-point noise.
pub const BITCOIN_NOISE: f64 = 500.0;
/// Largest drop below base a bitcoin point may show.
pub const BITCOIN_FLOOR_DROP: f64 = 2_000.0;
/// Ethereum base price range.
pub const ETHEREUM_BASE: Range<f64> = 3_000.0..3_500.0;
/// Half-width of ethereum per-point noise.
pub const ETHEREUM_NOISE: f64 = 100.0;
/// Largest drop below base an ethereum point may show.
pub const ETHEREUM_FLOOR_DROP: f64 = 300.0;
/// Solana centre price.
pub const SOLANA_CENTRE: f64 = 100.0;
/// Half-width of solana per-point noise.
pub const SOLANA_NOISE: f64 = 5.0;
/// Solana hard floor.
pub const SOLANA_FLOOR: f64 = 80.0;

/// Forex pairs as `(symbol, band floor, band width)`.
pub const FOREX_PAIRS: [(&str, f64, f64); 6] = [
    ("EUR/USD", 1.05, 0.1),
    ("USD/JPY", 150.0, 5.0),
    ("GBP/USD", 1.25, 0.1),
    ("USD/CAD", 1.35, 0.1),
    ("AUD/USD", 0.65, 0.05),
    ("NZD/USD", 0.59, 0.05),
];
/// Absolute bound on forex change percentage.
pub const FOREX_CHANGE_MAX: f64 = 1.0;

/// Fraud scatter coordinate range (integral).
pub const FRAUD_COORDINATE: Range<u32> = 0..100;
/// Fraud severity range (integral).
pub const FRAUD_SEVERITY: Range<u32> = 50..150;

/// Stat cards as `(label, value range, absolute change bound)`.
pub const SUMMARY_CARDS: [(&str, Range<f64>, f64); 4] = [
    ("Gold Price (XAU/USD)", 1_900.0..2_100.0, 2.5),
    ("Bitcoin Price (BTC/USD)", 50_000.0..55_000.0, 5.0),
    ("Fraud Detections (24h)", 1_500.0..2_000.0, 4.0),
    ("Risk Index", 0.0..100.0, 3.0),
];

/// Index of the fraud-detections card, whose value is a whole count.
const FRAUD_DETECTIONS_CARD: usize = 2;

/// A source of datasets for one feed.
///
/// The built-in implementation is [`RandomSeriesGenerator`]; a real network
/// fetch or a test fixture can be swapped in without touching scheduling.
pub trait SeriesGenerator: Send + Sync {
    /// Produce one complete dataset.
    fn generate(&self, rng: &mut StdRng) -> Dataset;

    /// Generator name for logs.
    fn name(&self) -> &'static str;
}

/// Built-in synthetic generator for one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSeriesGenerator {
    feed: FeedId,
}

impl RandomSeriesGenerator {
    /// Create the generator for a feed.
    pub fn new(feed: FeedId) -> Self {
        Self { feed }
    }

    /// Feed this generator serves.
    pub fn feed(&self) -> FeedId {
        self.feed
    }
}

impl SeriesGenerator for RandomSeriesGenerator {
    fn generate(&self, rng: &mut StdRng) -> Dataset {
        generate(self.feed, rng)
    }

    fn name(&self) -> &'static str {
        "RandomSeries"
    }
}

/// Generate one dataset for a feed.
pub fn generate<R: Rng + ?Sized>(feed: FeedId, rng: &mut R) -> Dataset {
    match feed {
        FeedId::Gold => Dataset::Series(generate_gold(rng)),
        FeedId::Crypto => Dataset::Series(generate_crypto(rng)),
        FeedId::Forex => Dataset::Rates(generate_forex(rng)),
        FeedId::Fraud => Dataset::Events(generate_fraud(rng)),
        FeedId::SummaryStats => Dataset::Summary(generate_summary(rng)),
    }
}

/// 24 hourly gold points around a fresh base.
pub fn generate_gold<R: Rng + ?Sized>(rng: &mut R) -> Vec<SeriesPoint> {
    let base = rng.gen_range(GOLD_BASE);
    let noise = Uniform::new(-GOLD_NOISE, GOLD_NOISE);

    (0..SERIES_POINTS)
        .map(|hour| {
            let price = (base + noise.sample(rng)).max(base - GOLD_FLOOR_DROP);
            let volatility = rng.gen_range(0.0..GOLD_VOLATILITY_MAX);
            SeriesPoint::new(hour_label(hour))
                .with_value(GOLD_PRICE, price)
                .with_value(GOLD_VOLATILITY, volatility)
        })
        .collect()
}

/// 24 hourly points for bitcoin, ethereum and solana.
pub fn generate_crypto<R: Rng + ?Sized>(rng: &mut R) -> Vec<SeriesPoint> {
    let bitcoin_base = rng.gen_range(BITCOIN_BASE);
    let ethereum_base = rng.gen_range(ETHEREUM_BASE);
    let bitcoin_noise = Uniform::new(-BITCOIN_NOISE, BITCOIN_NOISE);
    let ethereum_noise = Uniform::new(-ETHEREUM_NOISE, ETHEREUM_NOISE);
    let solana_noise = Uniform::new(-SOLANA_NOISE, SOLANA_NOISE);

    (0..SERIES_POINTS)
        .map(|hour| {
            let bitcoin =
                (bitcoin_base + bitcoin_noise.sample(rng)).max(bitcoin_base - BITCOIN_FLOOR_DROP);
            let ethereum = (ethereum_base + ethereum_noise.sample(rng))
                .max(ethereum_base - ETHEREUM_FLOOR_DROP);
            let solana = (SOLANA_CENTRE + solana_noise.sample(rng)).max(SOLANA_FLOOR);

            SeriesPoint::new(hour_label(hour))
                .with_value(CRYPTO_ASSETS[0], bitcoin)
                .with_value(CRYPTO_ASSETS[1], ethereum)
                .with_value(CRYPTO_ASSETS[2], solana)
        })
        .collect()
}

/// The six-pair rate table.
pub fn generate_forex<R: Rng + ?Sized>(rng: &mut R) -> Vec<ForexRate> {
    FOREX_PAIRS
        .iter()
        .map(|(symbol, floor, width)| ForexRate {
            symbol: (*symbol).to_string(),
            rate: floor + rng.gen_range(0.0..*width),
            change_pct: round2(rng.gen_range(-FOREX_CHANGE_MAX..FOREX_CHANGE_MAX)),
        })
        .collect()
}

/// 50 independent fraud scatter points.
pub fn generate_fraud<R: Rng + ?Sized>(rng: &mut R) -> Vec<FraudEvent> {
    (0..FRAUD_EVENTS)
        .map(|_| FraudEvent {
            x: f64::from(rng.gen_range(FRAUD_COORDINATE)),
            y: f64::from(rng.gen_range(FRAUD_COORDINATE)),
            severity: f64::from(rng.gen_range(FRAUD_SEVERITY)),
            region: Region::ALL[rng.gen_range(0..Region::ALL.len())],
            category: FraudCategory::ALL[rng.gen_range(0..FraudCategory::ALL.len())],
        })
        .collect()
}

/// The four headline stat cards.
pub fn generate_summary<R: Rng + ?Sized>(rng: &mut R) -> Vec<StatCard> {
    SUMMARY_CARDS
        .iter()
        .enumerate()
        .map(|(idx, (label, range, change))| {
            let raw = rng.gen_range(range.clone());
            let value = if idx == FRAUD_DETECTIONS_CARD {
                raw.floor()
            } else {
                round2(raw)
            };
            StatCard {
                label: (*label).to_string(),
                value,
                change_pct: round2(rng.gen_range(-*change..*change)),
            }
        })
        .collect()
}

/// `"{hour}:00"` axis label.
pub fn hour_label(hour: usize) -> String {
    format!("{}:00", hour)
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_gold_shape_and_labels() {
        let points = generate_gold(&mut rng());
        assert_eq!(points.len(), SERIES_POINTS);
        assert_eq!(points[0].time, "0:00");
        assert_eq!(points[23].time, "23:00");
        for p in &points {
            assert!(p.value(GOLD_PRICE).is_some());
            assert!(p.value(GOLD_VOLATILITY).is_some());
        }
    }

    #[test]
    fn test_gold_points_share_one_base() {
        let points = generate_gold(&mut rng());
        let prices: Vec<f64> = points.iter().filter_map(|p| p.value(GOLD_PRICE)).collect();
        let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        // All points come from base + [-15, 15)
        assert!(max - min < 2.0 * GOLD_NOISE);
    }

    #[test]
    fn test_crypto_assets_present_and_floored() {
        let points = generate_crypto(&mut rng());
        assert_eq!(points.len(), SERIES_POINTS);
        for p in &points {
            for asset in CRYPTO_ASSETS {
                assert!(p.value(asset).is_some(), "missing {}", asset);
            }
            assert!(p.value("solana").unwrap() >= SOLANA_FLOOR);
            assert!(p.value("bitcoin").unwrap() >= BITCOIN_BASE.start - BITCOIN_FLOOR_DROP);
        }
    }

    #[test]
    fn test_forex_fixed_pair_order() {
        let rates = generate_forex(&mut rng());
        let symbols: Vec<&str> = rates.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            ["EUR/USD", "USD/JPY", "GBP/USD", "USD/CAD", "AUD/USD", "NZD/USD"]
        );
        for r in &rates {
            assert_relative_eq!(r.change_pct, round2(r.change_pct));
        }
    }

    #[test]
    fn test_fraud_points_are_integral() {
        let events = generate_fraud(&mut rng());
        assert_eq!(events.len(), FRAUD_EVENTS);
        for e in &events {
            assert_eq!(e.x.fract(), 0.0);
            assert_eq!(e.y.fract(), 0.0);
            assert_eq!(e.severity.fract(), 0.0);
        }
    }

    #[test]
    fn test_summary_cards() {
        let cards = generate_summary(&mut rng());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].label, "Gold Price (XAU/USD)");
        assert_eq!(cards[FRAUD_DETECTIONS_CARD].value.fract(), 0.0);
    }

    #[test]
    fn test_generation_is_deterministic_for_a_seed() {
        for feed in FeedId::ALL {
            let a = generate(feed, &mut StdRng::seed_from_u64(9));
            let b = generate(feed, &mut StdRng::seed_from_u64(9));
            assert_eq!(a, b, "{} not deterministic", feed);
        }
    }

    #[test]
    fn test_random_series_generator_matches_free_function() {
        let gen = RandomSeriesGenerator::new(FeedId::Forex);
        assert_eq!(gen.feed(), FeedId::Forex);
        assert_eq!(
            gen.generate(&mut StdRng::seed_from_u64(1)),
            generate(FeedId::Forex, &mut StdRng::seed_from_u64(1))
        );
    }

    #[test]
    fn test_round2() {
        assert_relative_eq!(round2(1.234_9), 1.23);
        assert_relative_eq!(round2(-0.005_1), -0.01);
    }
}
