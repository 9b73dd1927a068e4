//! Dataset payloads.
//!
//! A [`Dataset`] is the complete, immutable result of one generation. Feeds
//! replace their dataset wholesale; nothing here is ever patched in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One timestamped point of a multi-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Axis label, e.g. `"13:00"`
    pub time: String,
    /// Series name to value
    pub values: BTreeMap<String, f64>,
}

impl SeriesPoint {
    /// Create an empty point at the given label.
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a series value.
    pub fn with_value(mut self, series: impl Into<String>, value: f64) -> Self {
        self.values.insert(series.into(), value);
        self
    }

    /// Look up a series value.
    pub fn value(&self, series: &str) -> Option<f64> {
        self.values.get(series).copied()
    }
}

/// One row of the forex rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexRate {
    /// Pair symbol, e.g. `"EUR/USD"`
    pub symbol: String,
    /// Quoted rate
    pub rate: f64,
    /// Signed percentage change, two decimals
    pub change_pct: f64,
}

/// Geographic region of a fraud event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// North America
    #[serde(rename = "North America")]
    NorthAmerica,
    /// Europe
    Europe,
    /// Asia
    Asia,
    /// South America
    #[serde(rename = "South America")]
    SouthAmerica,
    /// Africa
    Africa,
}

impl Region {
    /// Every region, in filter-bar order.
    pub const ALL: [Region; 5] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Asia,
        Region::SouthAmerica,
        Region::Africa,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::SouthAmerica => "South America",
            Region::Africa => "Africa",
        }
    }

    /// Exact-label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of fraud.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudCategory {
    /// Card-not-present or skimming
    #[serde(rename = "Credit Card")]
    CreditCard,
    /// Identity theft
    #[serde(rename = "Identity Theft")]
    IdentityTheft,
    /// Phishing
    Phishing,
    /// Fraudulent wire transfer
    #[serde(rename = "Wire Transfer")]
    WireTransfer,
    /// Account takeover
    #[serde(rename = "Account Takeover")]
    AccountTakeover,
}

impl FraudCategory {
    /// Every category.
    pub const ALL: [FraudCategory; 5] = [
        FraudCategory::CreditCard,
        FraudCategory::IdentityTheft,
        FraudCategory::Phishing,
        FraudCategory::WireTransfer,
        FraudCategory::AccountTakeover,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            FraudCategory::CreditCard => "Credit Card",
            FraudCategory::IdentityTheft => "Identity Theft",
            FraudCategory::Phishing => "Phishing",
            FraudCategory::WireTransfer => "Wire Transfer",
            FraudCategory::AccountTakeover => "Account Takeover",
        }
    }

    /// Exact-label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for FraudCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One point on the fraud scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudEvent {
    /// Risk factor axis
    pub x: f64,
    /// Detection index axis
    pub y: f64,
    /// Bubble size
    pub severity: f64,
    /// Where it happened
    pub region: Region,
    /// What kind of fraud
    pub category: FraudCategory,
}

/// One headline stat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    /// Card title
    pub label: String,
    /// Headline value
    pub value: f64,
    /// Signed change versus previous period, in percent
    pub change_pct: f64,
}

/// Discriminant of [`Dataset`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Time series
    Series,
    /// Rate table
    Rates,
    /// Scatter events
    Events,
    /// Stat cards
    Summary,
}

impl DatasetKind {
    /// Lowercase name for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Series => "series",
            DatasetKind::Rates => "rates",
            DatasetKind::Events => "events",
            DatasetKind::Summary => "summary",
        }
    }
}

/// The full payload of one feed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Dataset {
    /// Ordered time series (gold, crypto)
    Series(Vec<SeriesPoint>),
    /// Ordered rate table (forex)
    Rates(Vec<ForexRate>),
    /// Unordered scatter set (fraud)
    Events(Vec<FraudEvent>),
    /// Stat cards (summary-stats)
    Summary(Vec<StatCard>),
}

impl Dataset {
    /// Which variant this is.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Series(_) => DatasetKind::Series,
            Dataset::Rates(_) => DatasetKind::Rates,
            Dataset::Events(_) => DatasetKind::Events,
            Dataset::Summary(_) => DatasetKind::Summary,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Dataset::Series(points) => points.len(),
            Dataset::Rates(rates) => rates.len(),
            Dataset::Events(events) => events.len(),
            Dataset::Summary(cards) => cards.len(),
        }
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Series points, if this is a series dataset.
    pub fn as_series(&self) -> Option<&[SeriesPoint]> {
        match self {
            Dataset::Series(points) => Some(points),
            _ => None,
        }
    }

    /// Forex rows, if this is a rate dataset.
    pub fn as_rates(&self) -> Option<&[ForexRate]> {
        match self {
            Dataset::Rates(rates) => Some(rates),
            _ => None,
        }
    }

    /// Fraud events, if this is an event dataset.
    pub fn as_events(&self) -> Option<&[FraudEvent]> {
        match self {
            Dataset::Events(events) => Some(events),
            _ => None,
        }
    }
}
