//! Feed state snapshots.

use std::sync::Arc;

use feed_core::types::{Dataset, InvariantViolation, Timestamp};

/// Which half of the refresh cycle a feed is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedStateKind {
    /// Showing its latest dataset, nothing in flight
    Idle,
    /// A refresh is in flight; the previous dataset is still shown
    Refreshing,
}

impl FeedStateKind {
    /// Lowercase name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            FeedStateKind::Idle => "idle",
            FeedStateKind::Refreshing => "refreshing",
        }
    }
}

/// Why the latest cycle did not install its dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDiagnostic {
    /// What the rejected dataset got wrong
    pub violation: InvariantViolation,
    /// When the cycle completed
    pub at: Timestamp,
}

/// Immutable snapshot of one feed.
///
/// `data` is always the most recent *completed* generation. It is shared, so
/// cloning a snapshot never copies the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub(crate) kind: FeedStateKind,
    pub(crate) data: Arc<Dataset>,
    pub(crate) last_updated: Timestamp,
    pub(crate) revision: u64,
    pub(crate) diagnostic: Option<FeedDiagnostic>,
}

impl FeedState {
    pub(crate) fn initial(data: Dataset, now: Timestamp) -> Self {
        Self {
            kind: FeedStateKind::Idle,
            data: Arc::new(data),
            last_updated: now,
            revision: 0,
            diagnostic: None,
        }
    }

    /// Idle or refreshing.
    pub fn kind(&self) -> FeedStateKind {
        self.kind
    }

    /// Whether a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.kind == FeedStateKind::Refreshing
    }

    /// Latest installed dataset.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// When `data` was installed.
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Completed refresh cycles since construction, including rejected ones.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set when the latest cycle's dataset was rejected; cleared by the next
    /// successful cycle.
    pub fn diagnostic(&self) -> Option<&FeedDiagnostic> {
        self.diagnostic.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_core::types::{FeedId, Timestamp};

    #[test]
    fn test_initial_state_is_idle() {
        let state = FeedState::initial(Dataset::Series(Vec::new()), Timestamp::from_millis(5));
        assert_eq!(state.kind(), FeedStateKind::Idle);
        assert!(!state.is_refreshing());
        assert_eq!(state.revision(), 0);
        assert_eq!(state.last_updated().as_millis(), 5);
        assert!(state.diagnostic().is_none());
    }

    #[test]
    fn test_snapshot_clone_shares_data() {
        let state = FeedState::initial(Dataset::Summary(Vec::new()), Timestamp::default());
        let copy = state.clone();
        assert!(Arc::ptr_eq(&state.data, &copy.data));
    }

    #[test]
    fn test_diagnostic_accessor() {
        let mut state = FeedState::initial(Dataset::Events(Vec::new()), Timestamp::default());
        state.diagnostic = Some(FeedDiagnostic {
            violation: InvariantViolation::new(FeedId::Fraud, "events", "empty"),
            at: Timestamp::from_millis(9),
        });
        assert_eq!(state.diagnostic().unwrap().violation.field, "events");
        assert_eq!(FeedStateKind::Refreshing.name(), "refreshing");
    }
}
