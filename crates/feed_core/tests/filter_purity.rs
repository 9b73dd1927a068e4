//! Integration tests for presentation filters.
//!
//! Filters must be idempotent and must leave the source dataset untouched.

use std::collections::BTreeSet;

use feed_core::filter::{filter_events, filter_series, FilterSelection, FraudSelector, SeriesSelection};
use feed_core::generator::generate;
use feed_core::types::{Dataset, FeedId, Region};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const LABELS: [&str; 9] = [
    "All",
    "North America",
    "Europe",
    "Asia",
    "South America",
    "Africa",
    "Phishing",
    "Wire Transfer",
    "unknown",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property test: filtering twice equals filtering once, source unchanged.
    #[test]
    fn prop_fraud_filter_idempotent(seed in any::<u64>(), idx in 0..LABELS.len()) {
        let dataset = generate(FeedId::Fraud, &mut StdRng::seed_from_u64(seed));
        let snapshot = dataset.clone();
        let events = dataset.as_events().unwrap();

        let once = filter_events(events, LABELS[idx]);
        let again = filter_events(events, LABELS[idx]);
        prop_assert_eq!(&once, &again);
        prop_assert_eq!(filter_events(&once, LABELS[idx]), once.clone());
        prop_assert_eq!(&dataset, &snapshot);
    }

    /// Property test: series projection keeps exactly the chosen series.
    #[test]
    fn prop_series_filter_projection(seed in any::<u64>(), mask in 0u8..8) {
        let dataset = generate(FeedId::Crypto, &mut StdRng::seed_from_u64(seed));
        let snapshot = dataset.clone();
        let names = ["bitcoin", "ethereum", "solana"];
        let active: BTreeSet<&str> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u8 << *i) != 0)
            .map(|(_, n)| *n)
            .collect();

        let filtered = filter_series(dataset.as_series().unwrap(), &active);
        for point in &filtered {
            let keys: BTreeSet<&str> = point.values.keys().map(String::as_str).collect();
            prop_assert_eq!(&keys, &active);
        }
        prop_assert_eq!(&dataset, &snapshot);
    }
}

#[test]
fn test_europe_selector_is_region_only() {
    let dataset = generate(FeedId::Fraud, &mut StdRng::seed_from_u64(2024));
    let events = dataset.as_events().unwrap();
    assert_eq!(events.len(), 50);

    let europe = filter_events(events, "Europe");
    assert!(europe.iter().all(|e| e.region == Region::Europe));
    assert_eq!(
        europe.len(),
        events.iter().filter(|e| e.region == Region::Europe).count()
    );

    let all = filter_events(events, "All");
    assert_eq!(all.as_slice(), events);
}

#[test]
fn test_filter_selection_on_live_shaped_data() {
    let crypto = generate(FeedId::Crypto, &mut StdRng::seed_from_u64(1));
    let mut selection = SeriesSelection::all_crypto();
    selection.toggle("solana");

    let view = FilterSelection::Series(selection).apply(&crypto);
    match view {
        Dataset::Series(points) => {
            assert!(points.iter().all(|p| p.value("solana").is_none()));
            assert!(points.iter().all(|p| p.value("bitcoin").is_some()));
        }
        other => panic!("expected series, got {:?}", other.kind()),
    }

    let fraud = generate(FeedId::Fraud, &mut StdRng::seed_from_u64(1));
    let asia = FilterSelection::Fraud(FraudSelector::parse("Asia")).apply(&fraud);
    assert!(asia
        .as_events()
        .unwrap()
        .iter()
        .all(|e| e.region == Region::Asia));
}
