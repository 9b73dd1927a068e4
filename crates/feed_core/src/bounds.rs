//! Declared dataset bounds and invariant checks.
//!
//! Every feed declares the shape and numeric envelope its datasets must fit.
//! The runtime validates each generation against these bounds before
//! installing it; a dataset that fails is never exposed to readers.
//!
//! Envelopes are derived from the generator constants.

use std::ops::RangeInclusive;

use crate::generator::{
    BITCOIN_BASE, BITCOIN_FLOOR_DROP, BITCOIN_NOISE, CRYPTO_ASSETS, ETHEREUM_BASE,
    ETHEREUM_FLOOR_DROP, ETHEREUM_NOISE, FOREX_CHANGE_MAX, FOREX_PAIRS, FRAUD_COORDINATE,
    FRAUD_EVENTS, FRAUD_SEVERITY, GOLD_BASE, GOLD_FLOOR_DROP, GOLD_NOISE, GOLD_PRICE,
    GOLD_VOLATILITY, GOLD_VOLATILITY_MAX, SERIES_POINTS, SOLANA_CENTRE, SOLANA_FLOOR,
    SOLANA_NOISE, SUMMARY_CARDS,
};
use crate::types::{Dataset, DatasetKind, FeedId, InvariantViolation};

/// Envelope for one named value (series, pair or card).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBound {
    /// Series name, pair symbol or card label
    pub name: String,
    /// Closed range every value must fall in
    pub range: RangeInclusive<f64>,
}

impl NamedBound {
    fn new(name: impl Into<String>, range: RangeInclusive<f64>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// Expected shape of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Fixed-length series where every point carries every named series
    Series {
        /// Required point count
        points: usize,
        /// Per-series envelopes
        series: Vec<NamedBound>,
    },
    /// Fixed table of pairs, in order
    Rates {
        /// Per-pair rate envelopes
        pairs: Vec<NamedBound>,
        /// Change percentage envelope shared by all pairs
        change: RangeInclusive<f64>,
    },
    /// Fixed-size scatter set
    Events {
        /// Required event count
        count: usize,
        /// Envelope for both axes
        coordinate: RangeInclusive<f64>,
        /// Severity envelope
        severity: RangeInclusive<f64>,
    },
    /// Fixed list of cards, in order
    Summary {
        /// Per-card value envelopes
        values: Vec<NamedBound>,
        /// Per-card change envelopes, aligned with `values`
        changes: Vec<RangeInclusive<f64>>,
    },
}

impl Shape {
    fn kind(&self) -> DatasetKind {
        match self {
            Shape::Series { .. } => DatasetKind::Series,
            Shape::Rates { .. } => DatasetKind::Rates,
            Shape::Events { .. } => DatasetKind::Events,
            Shape::Summary { .. } => DatasetKind::Summary,
        }
    }
}

/// Bounds a feed's datasets must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBounds {
    feed: FeedId,
    shape: Shape,
}

impl DatasetBounds {
    /// Custom bounds for a feed.
    pub fn new(feed: FeedId, shape: Shape) -> Self {
        Self { feed, shape }
    }

    /// Built-in bounds matching the synthetic generator for a feed.
    pub fn for_feed(feed: FeedId) -> Self {
        let shape = match feed {
            FeedId::Gold => Shape::Series {
                points: SERIES_POINTS,
                series: vec![
                    NamedBound::new(
                        GOLD_PRICE,
                        (GOLD_BASE.start - GOLD_FLOOR_DROP)..=(GOLD_BASE.end + GOLD_NOISE),
                    ),
                    NamedBound::new(GOLD_VOLATILITY, 0.0..=GOLD_VOLATILITY_MAX),
                ],
            },
            FeedId::Crypto => Shape::Series {
                points: SERIES_POINTS,
                series: vec![
                    NamedBound::new(
                        CRYPTO_ASSETS[0],
                        (BITCOIN_BASE.start - BITCOIN_FLOOR_DROP)
                            ..=(BITCOIN_BASE.end + BITCOIN_NOISE),
                    ),
                    NamedBound::new(
                        CRYPTO_ASSETS[1],
                        (ETHEREUM_BASE.start - ETHEREUM_FLOOR_DROP)
                            ..=(ETHEREUM_BASE.end + ETHEREUM_NOISE),
                    ),
                    NamedBound::new(
                        CRYPTO_ASSETS[2],
                        SOLANA_FLOOR..=(SOLANA_CENTRE + SOLANA_NOISE),
                    ),
                ],
            },
            FeedId::Forex => Shape::Rates {
                pairs: FOREX_PAIRS
                    .iter()
                    .map(|(symbol, floor, width)| NamedBound::new(*symbol, *floor..=floor + width))
                    .collect(),
                change: -FOREX_CHANGE_MAX..=FOREX_CHANGE_MAX,
            },
            FeedId::Fraud => Shape::Events {
                count: FRAUD_EVENTS,
                coordinate: f64::from(FRAUD_COORDINATE.start)..=f64::from(FRAUD_COORDINATE.end),
                severity: f64::from(FRAUD_SEVERITY.start)..=f64::from(FRAUD_SEVERITY.end),
            },
            FeedId::SummaryStats => Shape::Summary {
                values: SUMMARY_CARDS
                    .iter()
                    .map(|(label, range, _)| NamedBound::new(*label, range.start..=range.end))
                    .collect(),
                changes: SUMMARY_CARDS
                    .iter()
                    .map(|(_, _, change)| -change..=*change)
                    .collect(),
            },
        };
        Self::new(feed, shape)
    }

    /// Feed these bounds belong to.
    pub fn feed(&self) -> FeedId {
        self.feed
    }

    /// Declared shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Check a dataset, reporting the first offending field.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), InvariantViolation> {
        match (&self.shape, dataset) {
            (Shape::Series { points, series }, Dataset::Series(data)) => {
                self.check_len("points", *points, data.len())?;
                for (idx, point) in data.iter().enumerate() {
                    for bound in series {
                        let field = format!("points[{}].{}", idx, bound.name);
                        match point.value(&bound.name) {
                            Some(value) => self.check_range(&field, value, &bound.range)?,
                            None => return Err(self.violation(field, "missing series value")),
                        }
                    }
                }
                Ok(())
            }
            (Shape::Rates { pairs, change }, Dataset::Rates(data)) => {
                self.check_len("rates", pairs.len(), data.len())?;
                for (idx, (bound, row)) in pairs.iter().zip(data).enumerate() {
                    if row.symbol != bound.name {
                        return Err(self.violation(
                            format!("rates[{}].symbol", idx),
                            format!("expected {}, got {}", bound.name, row.symbol),
                        ));
                    }
                    self.check_range(&format!("rates[{}].rate", idx), row.rate, &bound.range)?;
                    self.check_range(&format!("rates[{}].change_pct", idx), row.change_pct, change)?;
                }
                Ok(())
            }
            (
                Shape::Events {
                    count,
                    coordinate,
                    severity,
                },
                Dataset::Events(data),
            ) => {
                self.check_len("events", *count, data.len())?;
                for (idx, event) in data.iter().enumerate() {
                    self.check_range(&format!("events[{}].x", idx), event.x, coordinate)?;
                    self.check_range(&format!("events[{}].y", idx), event.y, coordinate)?;
                    self.check_range(&format!("events[{}].severity", idx), event.severity, severity)?;
                }
                Ok(())
            }
            (Shape::Summary { values, changes }, Dataset::Summary(data)) => {
                self.check_len("cards", values.len(), data.len())?;
                for (idx, ((bound, change), card)) in
                    values.iter().zip(changes).zip(data).enumerate()
                {
                    if card.label != bound.name {
                        return Err(self.violation(
                            format!("cards[{}].label", idx),
                            format!("expected {}, got {}", bound.name, card.label),
                        ));
                    }
                    self.check_range(&format!("cards[{}].value", idx), card.value, &bound.range)?;
                    self.check_range(&format!("cards[{}].change_pct", idx), card.change_pct, change)?;
                }
                Ok(())
            }
            (shape, other) => Err(self.violation(
                "kind",
                format!(
                    "expected {} dataset, got {}",
                    shape.kind().name(),
                    other.kind().name()
                ),
            )),
        }
    }

    fn check_len(&self, field: &str, expected: usize, actual: usize) -> Result<(), InvariantViolation> {
        if expected == actual {
            Ok(())
        } else {
            Err(self.violation(field, format!("expected {} entries, got {}", expected, actual)))
        }
    }

    // NaN fails `contains`, which also covers the finiteness requirement.
    fn check_range(
        &self,
        field: &str,
        value: f64,
        range: &RangeInclusive<f64>,
    ) -> Result<(), InvariantViolation> {
        if range.contains(&value) {
            Ok(())
        } else {
            Err(self.violation(
                field,
                format!("{} outside [{}, {}]", value, range.start(), range.end()),
            ))
        }
    }

    fn violation(&self, field: impl Into<String>, detail: impl Into<String>) -> InvariantViolation {
        InvariantViolation::new(self.feed, field, detail)
    }
}
