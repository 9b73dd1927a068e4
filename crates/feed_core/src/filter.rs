//! Presentation filters.
//!
//! Pure transforms applied downstream of a feed's current dataset. Nothing
//! here mutates its input, and no filter can fail: a selector that matches
//! nothing known falls back to showing everything.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generator::CRYPTO_ASSETS;
use crate::types::{Dataset, ForexRate, FraudCategory, FraudEvent, Region, SeriesPoint};

/// Label meaning "no fraud filter".
pub const ALL_LABEL: &str = "All";

/// Active series of a multi-series chart.
///
/// Order follows toggle history: re-enabling a series appends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSelection {
    active: Vec<String>,
}

impl SeriesSelection {
    /// Select exactly these series.
    pub fn new<I, S>(series: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self { active: Vec::new() };
        for name in series {
            let name = name.into();
            if !selection.is_active(&name) {
                selection.active.push(name);
            }
        }
        selection
    }

    /// All three crypto assets, the chart's initial state.
    pub fn all_crypto() -> Self {
        Self::new(CRYPTO_ASSETS)
    }

    /// Flip one series on or off.
    pub fn toggle(&mut self, series: &str) {
        if let Some(pos) = self.active.iter().position(|s| s == series) {
            self.active.remove(pos);
        } else {
            self.active.push(series.to_string());
        }
    }

    /// Whether a series is shown.
    pub fn is_active(&self, series: &str) -> bool {
        self.active.iter().any(|s| s == series)
    }

    /// Active series in toggle order.
    pub fn active(&self) -> &[String] {
        &self.active
    }

    fn as_set(&self) -> BTreeSet<&str> {
        self.active.iter().map(String::as_str).collect()
    }
}

impl Default for SeriesSelection {
    fn default() -> Self {
        Self::all_crypto()
    }
}

/// Keep only the selected series' values on every point.
///
/// Points are kept even when no series remains, so the time axis is stable.
pub fn filter_series(points: &[SeriesPoint], active: &BTreeSet<&str>) -> Vec<SeriesPoint> {
    points
        .iter()
        .map(|point| SeriesPoint {
            time: point.time.clone(),
            values: point
                .values
                .iter()
                .filter(|(name, _)| active.contains(name.as_str()))
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
        })
        .collect()
}

/// Fraud filter-bar selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FraudSelector {
    /// No filtering
    #[default]
    All,
    /// Events in this region
    Region(Region),
    /// Events of this category
    Category(FraudCategory),
}

impl FraudSelector {
    /// Resolve a filter-bar label. Unknown labels mean [`FraudSelector::All`].
    pub fn parse(label: &str) -> Self {
        if let Some(region) = Region::from_label(label) {
            Self::Region(region)
        } else if let Some(category) = FraudCategory::from_label(label) {
            Self::Category(category)
        } else {
            Self::All
        }
    }

    /// The label this selector was parsed from.
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => ALL_LABEL,
            Self::Region(region) => region.label(),
            Self::Category(category) => category.label(),
        }
    }

    /// Whether an event passes. Matches region OR category by label, so a
    /// selector never excludes an event that carries its label anywhere.
    pub fn matches(&self, event: &FraudEvent) -> bool {
        match self {
            Self::All => true,
            _ => {
                let label = self.label();
                event.region.label() == label || event.category.label() == label
            }
        }
    }
}

impl FromStr for FraudSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FraudSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events whose region or category label equals `selector`; `"All"` and
/// unknown labels return every event.
pub fn filter_events(events: &[FraudEvent], selector: &str) -> Vec<FraudEvent> {
    let selector = FraudSelector::parse(selector);
    events
        .iter()
        .filter(|event| selector.matches(event))
        .cloned()
        .collect()
}

/// Risk colour band of a fraud event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityBand {
    /// Severity up to 80
    Low,
    /// Severity above 80, up to 120
    Medium,
    /// Severity above 120
    High,
}

impl SeverityBand {
    /// Band for a severity value.
    pub fn classify(severity: f64) -> Self {
        if severity > 120.0 {
            Self::High
        } else if severity > 80.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Forex table quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BaseCurrency {
    /// US dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// Pound sterling
    GBP,
}

impl BaseCurrency {
    /// Dropdown options.
    pub const ALL: [BaseCurrency; 3] = [BaseCurrency::USD, BaseCurrency::EUR, BaseCurrency::GBP];

    /// ISO code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Case-insensitive lookup; unknown codes fall back to USD.
    pub fn parse(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .unwrap_or_default()
    }
}

impl fmt::Display for BaseCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Forex rates as presented under a base-currency label.
///
/// The base currency only changes the label. Rates are passed through as
/// generated; no conversion is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexView {
    /// Selected base label
    pub base: BaseCurrency,
    /// Rates, unchanged
    pub rates: Vec<ForexRate>,
}

impl ForexView {
    /// Build the view.
    pub fn new(rates: &[ForexRate], base: BaseCurrency) -> Self {
        Self {
            base,
            rates: rates.to_vec(),
        }
    }
}

/// Per-feed presentation selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterSelection {
    /// Show the dataset as-is
    #[default]
    None,
    /// Active series (crypto)
    Series(SeriesSelection),
    /// Region-or-category selector (fraud)
    Fraud(FraudSelector),
    /// Base currency label (forex); never changes data
    Forex(BaseCurrency),
}

impl FilterSelection {
    /// Apply to a dataset, returning a new dataset.
    ///
    /// A selection that does not fit the dataset kind is ignored.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        match (self, dataset) {
            (Self::Series(selection), Dataset::Series(points)) => {
                Dataset::Series(filter_series(points, &selection.as_set()))
            }
            (Self::Fraud(selector), Dataset::Events(events)) => Dataset::Events(
                events
                    .iter()
                    .filter(|event| selector.matches(event))
                    .cloned()
                    .collect(),
            ),
            _ => dataset.clone(),
        }
    }
}
