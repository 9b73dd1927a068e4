//! Mount and unmount of the full dashboard.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use feed_core::types::{DatasetKind, FeedError, FeedId};
use feed_runtime::prelude::*;

async fn advance(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn fast_config() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.seed = Some(11);
    for (idx, id) in FeedId::ALL.into_iter().enumerate() {
        let settings = config.feeds.settings_mut(id);
        settings.cadence_ms = Some(100 * (idx as u64 + 1));
        settings.latency_ms = Some(10);
    }
    config
}

#[tokio::test(start_paused = true)]
async fn test_five_feeds_refresh_independently() {
    let registry = FeedRegistry::from_config(&fast_config(), Arc::new(RuntimeClock::new())).unwrap();
    assert_eq!(registry.len(), 5);

    let counts = Arc::new(Mutex::new(BTreeMap::<FeedId, usize>::new()));
    let _subs: Vec<Subscription> = registry
        .iter()
        .map(|feed| {
            let id = feed.id();
            let counts = Arc::clone(&counts);
            feed.subscribe(move |_: &FeedState| {
                *counts.lock().unwrap().entry(id).or_default() += 1;
            })
        })
        .collect();

    registry.mount_all();
    assert!(registry.iter().all(|feed| feed.is_running()));

    // Ticks at multiples of each cadence, each cycle completing 10ms later
    for _ in 0..60 {
        advance(10).await;
    }

    let counts = counts.lock().unwrap().clone();
    assert_eq!(counts.get(&FeedId::Gold), Some(&5));
    assert_eq!(counts.get(&FeedId::Crypto), Some(&2));
    assert_eq!(counts.get(&FeedId::Forex), Some(&1));
    assert_eq!(counts.get(&FeedId::Fraud), Some(&1));
    assert_eq!(counts.get(&FeedId::SummaryStats), Some(&1));

    registry.unmount_all();
}

#[tokio::test(start_paused = true)]
async fn test_no_notifications_after_unmount() {
    let registry = FeedRegistry::from_config(&fast_config(), Arc::new(RuntimeClock::new())).unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let _subs: Vec<Subscription> = registry
        .iter()
        .map(|feed| {
            let hits = Arc::clone(&hits);
            feed.subscribe(move |_: &FeedState| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    registry.mount_all();
    advance(100).await;
    for feed in &registry {
        feed.refresh();
    }

    registry.unmount_all();
    let frozen = registry.snapshot();
    let before = hits.load(Ordering::SeqCst);

    advance(10_000).await;
    assert_eq!(hits.load(Ordering::SeqCst), before);
    assert_eq!(registry.snapshot(), frozen);
    assert!(frozen.values().all(|state| !state.is_refreshing()));
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_kinds() {
    let registry =
        FeedRegistry::from_config(&DashboardConfig::default(), Arc::new(RuntimeClock::new()))
            .unwrap();
    let snapshot = registry.snapshot();

    let kind = |id: FeedId| snapshot[&id].data().kind();
    assert_eq!(kind(FeedId::Gold), DatasetKind::Series);
    assert_eq!(kind(FeedId::Crypto), DatasetKind::Series);
    assert_eq!(kind(FeedId::Forex), DatasetKind::Rates);
    assert_eq!(kind(FeedId::Fraud), DatasetKind::Events);
    assert_eq!(kind(FeedId::SummaryStats), DatasetKind::Summary);
    assert!(snapshot.values().all(|state| !state.data().is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_feeds_are_skipped() {
    let mut config = DashboardConfig::default();
    config.feeds.fraud.enabled = Some(false);
    let registry = FeedRegistry::from_config(&config, Arc::new(RuntimeClock::new())).unwrap();
    assert_eq!(registry.len(), 4);
    assert!(registry.get(FeedId::Fraud).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_and_invalid_specs() {
    let clock: Arc<dyn Clock> = Arc::new(RuntimeClock::new());

    let duplicate = FeedRegistry::new(
        vec![
            FeedSpec::default_for(FeedId::Crypto),
            FeedSpec::default_for(FeedId::Crypto),
        ],
        Arc::clone(&clock),
    );
    assert_eq!(duplicate.unwrap_err(), FeedError::DuplicateFeed(FeedId::Crypto));

    let zero = FeedRegistry::new(
        vec![FeedSpec::new(FeedId::Forex, Duration::ZERO, Duration::ZERO)],
        clock,
    );
    assert_eq!(zero.unwrap_err(), FeedError::ZeroCadence(FeedId::Forex));
}
