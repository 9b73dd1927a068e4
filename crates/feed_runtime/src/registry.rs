//! Feed registry.
//!
//! Holds one controller per feed and mounts or unmounts them together. Feeds
//! share nothing; the registry only fans lifecycle calls out.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use feed_core::types::{FeedError, FeedId};
use tracing::info;

use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::controller::FeedController;
use crate::spec::FeedSpec;
use crate::state::FeedState;

/// The dashboard's set of feeds.
#[derive(Debug)]
pub struct FeedRegistry {
    feeds: Vec<FeedController>,
}

impl FeedRegistry {
    /// Build one controller per spec, in the given order.
    ///
    /// # Errors
    ///
    /// [`FeedError::DuplicateFeed`] if two specs share an id, or any error
    /// from [`FeedController::new`].
    pub fn new(specs: Vec<FeedSpec>, clock: Arc<dyn Clock>) -> Result<Self, FeedError> {
        let mut seen = BTreeSet::new();
        for spec in &specs {
            if !seen.insert(spec.id) {
                return Err(FeedError::DuplicateFeed(spec.id));
            }
        }

        let feeds = specs
            .into_iter()
            .map(|spec| FeedController::new(spec, Arc::clone(&clock)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { feeds })
    }

    /// Build every enabled feed from `config`.
    pub fn from_config(config: &DashboardConfig, clock: Arc<dyn Clock>) -> Result<Self, FeedError> {
        Self::new(config.feed_specs(), clock)
    }

    /// Start every feed.
    pub fn mount_all(&self) {
        for feed in &self.feeds {
            feed.start();
        }
        info!(feeds = self.feeds.len(), "Feeds mounted");
    }

    /// Stop every feed. Feeds that were never started are left as they are.
    pub fn unmount_all(&self) {
        for feed in &self.feeds {
            feed.stop();
        }
        info!(feeds = self.feeds.len(), "Feeds unmounted");
    }

    /// Controller for `id`, if registered.
    pub fn get(&self, id: FeedId) -> Option<&FeedController> {
        self.feeds.iter().find(|feed| feed.id() == id)
    }

    /// Controllers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FeedController> {
        self.feeds.iter()
    }

    /// Number of feeds.
    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    /// Whether no feeds are registered.
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    /// Current state of every feed.
    pub fn snapshot(&self) -> BTreeMap<FeedId, FeedState> {
        self.feeds.iter().map(|feed| (feed.id(), feed.state())).collect()
    }
}

impl<'a> IntoIterator for &'a FeedRegistry {
    type Item = &'a FeedController;
    type IntoIter = std::slice::Iter<'a, FeedController>;

    fn into_iter(self) -> Self::IntoIter {
        self.feeds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RuntimeClock;

    #[tokio::test]
    async fn test_registry_from_default_config() {
        let registry =
            FeedRegistry::from_config(&DashboardConfig::default(), Arc::new(RuntimeClock::new()))
                .unwrap();
        assert_eq!(registry.len(), 5);
        assert!(!registry.is_empty());

        let ids: Vec<FeedId> = registry.iter().map(|f| f.id()).collect();
        assert_eq!(ids, FeedId::ALL.to_vec());
        assert_eq!(registry.snapshot().len(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_feed_rejected() {
        let specs = vec![
            FeedSpec::default_for(FeedId::Gold),
            FeedSpec::default_for(FeedId::Forex),
            FeedSpec::default_for(FeedId::Gold),
        ];
        let err = FeedRegistry::new(specs, Arc::new(RuntimeClock::new())).unwrap_err();
        assert_eq!(err, FeedError::DuplicateFeed(FeedId::Gold));
    }

    #[tokio::test]
    async fn test_unmount_without_mount() {
        let registry = FeedRegistry::new(
            vec![FeedSpec::default_for(FeedId::Fraud)],
            Arc::new(RuntimeClock::new()),
        )
        .unwrap();
        registry.unmount_all();
        assert!(registry.get(FeedId::Fraud).is_some());
        assert!(registry.get(FeedId::Gold).is_none());
    }
}
