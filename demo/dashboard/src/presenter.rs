//! Rendering of feed snapshots for the terminal.
//!
//! A [`Presenter`] holds the user's filter choices and turns a [`FeedState`]
//! into one line of output per completed refresh. Filtering never touches the
//! feed's own dataset; every render works on a filtered copy.

use chrono::SecondsFormat;
use clap::ValueEnum;
use feed_core::filter::{
    BaseCurrency, FilterSelection, ForexView, FraudSelector, SeriesSelection, SeverityBand,
};
use feed_core::types::{Dataset, FeedId, ForexRate, FraudEvent, SeriesPoint, StatCard};
use feed_runtime::state::FeedState;
use serde_json::json;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per update
    #[default]
    Text,
    /// One JSON object per update
    Json,
}

/// Filter choices and output format for the whole dashboard.
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    format: OutputFormat,
    crypto: SeriesSelection,
    fraud: FraudSelector,
    base: BaseCurrency,
}

impl Presenter {
    /// Presenter with every series shown, all fraud events and a USD label
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set the active crypto series
    pub fn with_crypto(mut self, selection: SeriesSelection) -> Self {
        self.crypto = selection;
        self
    }

    /// Set the fraud region/category selector
    pub fn with_fraud(mut self, selector: FraudSelector) -> Self {
        self.fraud = selector;
        self
    }

    /// Set the forex base label
    pub fn with_base(mut self, base: BaseCurrency) -> Self {
        self.base = base;
        self
    }

    /// Selection applied to a feed's dataset before rendering
    pub fn selection(&self, id: FeedId) -> FilterSelection {
        match id {
            FeedId::Crypto => FilterSelection::Series(self.crypto.clone()),
            FeedId::Fraud => FilterSelection::Fraud(self.fraud),
            FeedId::Forex => FilterSelection::Forex(self.base),
            FeedId::Gold | FeedId::SummaryStats => FilterSelection::None,
        }
    }

    /// Render one snapshot
    pub fn render(&self, id: FeedId, state: &FeedState) -> Result<String, serde_json::Error> {
        let view = self.selection(id).apply(state.data());
        match self.format {
            OutputFormat::Text => Ok(self.render_text(id, state, &view)),
            OutputFormat::Json => self.render_json(id, state, &view),
        }
    }

    fn render_text(&self, id: FeedId, state: &FeedState, view: &Dataset) -> String {
        let body = match view {
            Dataset::Series(points) => series_line(points),
            Dataset::Rates(rates) => self.rates_line(rates),
            Dataset::Events(events) => self.events_line(events),
            Dataset::Summary(cards) => cards_line(cards),
        };

        let mut line = format!(
            "[{:<13}] #{:<4} {} | {}",
            id.title(),
            state.revision(),
            stamp(state),
            body
        );
        if let Some(diagnostic) = state.diagnostic() {
            line.push_str(&format!(" | last cycle rejected: {}", diagnostic.violation));
        }
        line
    }

    fn render_json(
        &self,
        id: FeedId,
        state: &FeedState,
        view: &Dataset,
    ) -> Result<String, serde_json::Error> {
        let mut value = json!({
            "feed": id,
            "revision": state.revision(),
            "last_updated": state.last_updated().as_millis(),
            "data": view,
            "diagnostic": state.diagnostic().map(|d| d.violation.to_string()),
        });
        if id == FeedId::Forex {
            value["base"] = json!(self.base);
        }
        serde_json::to_string(&value)
    }

    fn rates_line(&self, rates: &[ForexRate]) -> String {
        let view = ForexView::new(rates, self.base);
        let quotes: Vec<String> = view
            .rates
            .iter()
            .map(|r| format!("{} {:.4} ({:+.2}%)", r.symbol, r.rate, r.change_pct))
            .collect();
        format!("base {} | {}", view.base, quotes.join(", "))
    }

    fn events_line(&self, events: &[FraudEvent]) -> String {
        let (mut high, mut medium, mut low) = (0, 0, 0);
        for event in events {
            match SeverityBand::classify(event.severity) {
                SeverityBand::High => high += 1,
                SeverityBand::Medium => medium += 1,
                SeverityBand::Low => low += 1,
            }
        }
        format!(
            "{}: {} events (high {}, medium {}, low {})",
            self.fraud,
            events.len(),
            high,
            medium,
            low
        )
    }
}

fn stamp(state: &FeedState) -> String {
    match state.last_updated().to_datetime() {
        Some(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => state.last_updated().to_string(),
    }
}

fn series_line(points: &[SeriesPoint]) -> String {
    let Some(latest) = points.last() else {
        return "no data".to_string();
    };
    if latest.values.is_empty() {
        return format!("{} points, no active series", points.len());
    }
    let values: Vec<String> = latest
        .values
        .iter()
        .map(|(name, value)| format!("{}={:.2}", name, value))
        .collect();
    format!("{} points, {} {}", points.len(), latest.time, values.join(" "))
}

fn cards_line(cards: &[StatCard]) -> String {
    cards
        .iter()
        .map(|c| format!("{} {} ({:+.2}%)", c.label, c.value, c.change_pct))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_core::types::Region;
    use feed_runtime::prelude::*;
    use std::sync::Arc;

    fn state(id: FeedId) -> FeedState {
        let spec = FeedSpec::default_for(id).with_seed(5);
        FeedController::new(spec, Arc::new(SystemClock)).unwrap().state()
    }

    #[tokio::test]
    async fn test_crypto_text_shows_active_series_only() {
        let presenter =
            Presenter::new(OutputFormat::Text).with_crypto(SeriesSelection::new(["solana"]));
        let line = presenter.render(FeedId::Crypto, &state(FeedId::Crypto)).unwrap();

        assert!(line.contains("Crypto"));
        assert!(line.contains("24 points, 23:00 solana="));
        assert!(!line.contains("bitcoin"));
    }

    #[tokio::test]
    async fn test_empty_selection() {
        let mut selection = SeriesSelection::new(["bitcoin"]);
        selection.toggle("bitcoin");
        let presenter = Presenter::new(OutputFormat::Text).with_crypto(selection);
        let line = presenter.render(FeedId::Crypto, &state(FeedId::Crypto)).unwrap();
        assert!(line.contains("no active series"));
    }

    #[tokio::test]
    async fn test_fraud_counts_add_up() {
        let presenter = Presenter::new(OutputFormat::Text)
            .with_fraud(FraudSelector::Region(Region::Europe));
        let snapshot = state(FeedId::Fraud);
        let expected = snapshot
            .data()
            .as_events()
            .unwrap()
            .iter()
            .filter(|e| e.region == Region::Europe)
            .count();

        let line = presenter.render(FeedId::Fraud, &snapshot).unwrap();
        assert!(line.contains(&format!("Europe: {} events", expected)));
    }

    #[tokio::test]
    async fn test_forex_json_carries_base_label() {
        let presenter = Presenter::new(OutputFormat::Json).with_base(BaseCurrency::GBP);
        let snapshot = state(FeedId::Forex);
        let line = presenter.render(FeedId::Forex, &snapshot).unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["feed"], "forex");
        assert_eq!(value["base"], "GBP");
        assert_eq!(value["data"]["kind"], "rates");
        assert_eq!(value["data"]["data"][0]["symbol"], "EUR/USD");
        assert_eq!(value["revision"], 0);
        assert!(value["diagnostic"].is_null());
        assert!(value.get("refreshing").is_none());
    }

    #[tokio::test]
    async fn test_summary_text() {
        let presenter = Presenter::new(OutputFormat::Text);
        let line = presenter
            .render(FeedId::SummaryStats, &state(FeedId::SummaryStats))
            .unwrap();
        assert!(line.contains("Gold Price (XAU/USD)"));
        assert!(line.contains("Risk Index"));
    }
}
