//! Change listeners.
//!
//! Listeners are plain callbacks invoked once per completed refresh cycle,
//! after the feed's lock has been released. A [`Subscription`] removes its
//! listener when dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::state::FeedState;

/// Callback type for feed state changes
pub type Listener = Arc<dyn Fn(&FeedState) + Send + Sync>;

/// Registered listeners of one feed.
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerSet {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries().push((id, listener));
        Subscription {
            id,
            set: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        self.entries().retain(|(entry_id, _)| *entry_id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    /// Call every listener with `state`.
    ///
    /// Works on a snapshot, so listeners may subscribe or unsubscribe from
    /// inside the callback.
    pub(crate) fn notify(&self, state: &FeedState) {
        let snapshot: Vec<Listener> = self
            .entries()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(state);
        }
    }
}

/// Handle returned by `FeedController::subscribe`.
///
/// Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    set: Weak<ListenerSet>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.set.strong_count() > 0))
            .finish()
    }
}
