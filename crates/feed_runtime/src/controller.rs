//! Per-feed refresh controller.
//!
//! One [`FeedController`] owns one feed's state, random source, timer and
//! in-flight refresh. The refresh cycle is an explicit two-state machine:
//!
//! - `Idle` → `Refreshing` on a timer tick or [`FeedController::refresh`];
//!   the generator runs immediately and the previous dataset stays visible
//! - `Refreshing` → `Idle` once the simulated latency has elapsed; the new
//!   dataset is validated, installed and listeners are notified once
//!
//! A trigger while `Refreshing` is ignored.
//!
//! ## Cancellation
//!
//! Every spawned task (the cadence timer and each latency delay) holds a child
//! of the controller's lifecycle token and the epoch it was spawned in.
//! [`FeedController::stop`] cancels the token, aborts the tasks and bumps the
//! epoch under the state lock, so a callback that already woke up still finds
//! a stale epoch and does nothing. Tasks hold only a weak reference to the
//! controller and exit when it is gone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use feed_core::bounds::DatasetBounds;
use feed_core::generator::SeriesGenerator;
use feed_core::types::{Dataset, FeedError, FeedId, InvariantViolation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::spec::FeedSpec;
use crate::state::{FeedDiagnostic, FeedState, FeedStateKind};
use crate::subscription::{ListenerSet, Subscription};

/// Result of asking for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new cycle began
    Started,
    /// A cycle was already in flight; nothing changed
    AlreadyInFlight,
}

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    Manual,
}

impl Trigger {
    fn name(&self) -> &'static str {
        match self {
            Trigger::Timer => "timer",
            Trigger::Manual => "manual",
        }
    }
}

/// Owner of one feed's state and refresh schedule.
///
/// Must be created inside a Tokio runtime; all timers run on that runtime.
/// Dropping the controller stops it.
pub struct FeedController {
    shared: Arc<Shared>,
}

struct Shared {
    id: FeedId,
    cadence: Duration,
    latency: Duration,
    generator: Arc<dyn SeriesGenerator>,
    bounds: DatasetBounds,
    clock: Arc<dyn Clock>,
    runtime: Handle,
    listeners: Arc<ListenerSet>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: FeedState,
    rng: StdRng,
    /// Bumped by every `stop()`; callbacks from older epochs are ignored
    epoch: u64,
    lifecycle: CancellationToken,
    timer: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
}

impl FeedController {
    /// Build a controller and generate its initial dataset.
    ///
    /// # Errors
    ///
    /// - [`FeedError::ZeroCadence`] or [`FeedError::Configuration`] for a bad spec
    /// - [`FeedError::Configuration`] when called outside a Tokio runtime
    /// - [`FeedError::InitialDataset`] when the first generation is out of bounds
    pub fn new(spec: FeedSpec, clock: Arc<dyn Clock>) -> Result<Self, FeedError> {
        spec.validate()?;
        let runtime = Handle::try_current().map_err(|e| {
            FeedError::configuration(format!("feed {} needs a Tokio runtime: {}", spec.id, e))
        })?;

        let mut rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let initial = spec.generator.generate(&mut rng);
        spec.bounds
            .validate(&initial)
            .map_err(FeedError::InitialDataset)?;

        if spec.latency >= spec.cadence {
            warn!(
                feed = %spec.id,
                cadence_ms = spec.cadence.as_millis() as u64,
                latency_ms = spec.latency.as_millis() as u64,
                "Latency is not shorter than cadence; some timer ticks will be skipped"
            );
        }

        let state = FeedState::initial(initial, clock.now());
        debug!(feed = %spec.id, generator = spec.generator.name(), "Feed constructed");

        Ok(Self {
            shared: Arc::new(Shared {
                id: spec.id,
                cadence: spec.cadence,
                latency: spec.latency,
                generator: spec.generator,
                bounds: spec.bounds,
                clock,
                runtime,
                listeners: Arc::new(ListenerSet::default()),
                inner: Mutex::new(Inner {
                    state,
                    rng,
                    epoch: 0,
                    lifecycle: CancellationToken::new(),
                    timer: None,
                    in_flight: None,
                }),
            }),
        })
    }

    /// Feed identity.
    pub fn id(&self) -> FeedId {
        self.shared.id
    }

    /// Interval between automatic refreshes.
    pub fn cadence(&self) -> Duration {
        self.shared.cadence
    }

    /// Simulated latency of each refresh.
    pub fn latency(&self) -> Duration {
        self.shared.latency
    }

    /// Begin automatic refreshes every `cadence`. Calling it again while
    /// running does nothing; a timer that died (generator panic) is replaced.
    pub fn start(&self) {
        let mut inner = self.shared.lock();
        if inner.timer_alive() {
            return;
        }

        let token = inner.lifecycle.child_token();
        let weak = Arc::downgrade(&self.shared);
        let cadence = self.shared.cadence;
        let first_tick = Instant::now() + cadence;
        inner.timer = Some(
            self.shared
                .runtime
                .spawn(run_timer(weak, first_tick, cadence, token)),
        );

        info!(
            feed = %self.shared.id,
            cadence_ms = cadence.as_millis() as u64,
            latency_ms = self.shared.latency.as_millis() as u64,
            "Feed started"
        );
    }

    /// Cancel the timer and any in-flight refresh. Safe to call at any time,
    /// any number of times.
    ///
    /// An abandoned refresh leaves the previous dataset in place and the feed
    /// back in `Idle`; no listener is notified for it.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        inner.lifecycle.cancel();
        inner.lifecycle = CancellationToken::new();
        inner.epoch += 1;

        let had_timer = inner.timer.is_some();
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        if let Some(task) = inner.in_flight.take() {
            task.abort();
        }
        if inner.state.is_refreshing() {
            inner.state.kind = FeedStateKind::Idle;
            debug!(feed = %self.shared.id, "In-flight refresh abandoned");
        }
        drop(inner);

        if had_timer {
            info!(feed = %self.shared.id, "Feed stopped");
        }
    }

    /// Whether the cadence timer is active.
    pub fn is_running(&self) -> bool {
        self.shared.lock().timer_alive()
    }

    /// Start one refresh cycle now, unless one is already in flight.
    pub fn refresh(&self) -> RefreshOutcome {
        Shared::begin_refresh(&self.shared, Trigger::Manual)
    }

    /// Current snapshot.
    pub fn state(&self) -> FeedState {
        self.shared.lock().state.clone()
    }

    /// Call `listener` after every completed cycle until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FeedState) + Send + Sync + 'static,
    {
        self.shared.listeners.add(Arc::new(listener))
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("FeedController")
            .field("id", &self.shared.id)
            .field("cadence", &self.shared.cadence)
            .field("latency", &self.shared.latency)
            .field("state", &inner.state.kind())
            .field("revision", &inner.state.revision())
            .field("running", &inner.timer_alive())
            .finish()
    }
}

impl Inner {
    fn timer_alive(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_refresh(shared: &Arc<Shared>, trigger: Trigger) -> RefreshOutcome {
        let mut inner = shared.lock();
        if inner.state.is_refreshing() {
            debug!(feed = %shared.id, trigger = trigger.name(), "Refresh already in flight");
            return RefreshOutcome::AlreadyInFlight;
        }

        // State stays Idle until the generator has returned
        let dataset = shared.generator.generate(&mut inner.rng);
        let candidate = shared.bounds.validate(&dataset).map(|()| dataset);
        inner.state.kind = FeedStateKind::Refreshing;

        let epoch = inner.epoch;
        let token = inner.lifecycle.child_token();
        let weak = Arc::downgrade(shared);
        let deadline = Instant::now() + shared.latency;
        inner.in_flight = Some(shared.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(shared) = weak.upgrade() {
                        shared.complete(epoch, candidate);
                    }
                }
            }
        }));

        debug!(feed = %shared.id, trigger = trigger.name(), "Refresh started");
        RefreshOutcome::Started
    }

    fn complete(&self, epoch: u64, candidate: Result<Dataset, InvariantViolation>) {
        let mut inner = self.lock();
        if inner.epoch != epoch || !inner.state.is_refreshing() {
            return;
        }
        inner.in_flight = None;

        let now = self.clock.now();
        match candidate {
            Ok(dataset) => {
                inner.state.data = Arc::new(dataset);
                inner.state.last_updated = now;
                inner.state.diagnostic = None;
            }
            Err(violation) => {
                warn!(
                    feed = %self.id,
                    error = %violation,
                    "Generated dataset rejected; keeping previous data"
                );
                inner.state.diagnostic = Some(FeedDiagnostic { violation, at: now });
            }
        }
        inner.state.kind = FeedStateKind::Idle;
        inner.state.revision += 1;
        let snapshot = inner.state.clone();
        drop(inner);

        debug!(
            feed = %self.id,
            revision = snapshot.revision(),
            last_updated = snapshot.last_updated().as_millis(),
            "Refresh completed"
        );
        self.listeners.notify(&snapshot);
    }
}

async fn run_timer(
    shared: Weak<Shared>,
    first_tick: Instant,
    cadence: Duration,
    token: CancellationToken,
) {
    let mut ticks = interval_at(first_tick, cadence);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticks.tick() => {
                let Some(shared) = shared.upgrade() else { break };
                Shared::begin_refresh(&shared, Trigger::Timer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RuntimeClock;

    fn controller(id: FeedId, cadence_ms: u64, latency_ms: u64) -> FeedController {
        let spec = FeedSpec::new(
            id,
            Duration::from_millis(cadence_ms),
            Duration::from_millis(latency_ms),
        )
        .with_seed(17);
        FeedController::new(spec, Arc::new(RuntimeClock::new())).unwrap()
    }

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let spec = FeedSpec::default_for(FeedId::Gold);
        let err = FeedController::new(spec, Arc::new(crate::clock::SystemClock)).unwrap_err();
        assert!(matches!(err, FeedError::Configuration(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_is_single_in_flight() {
        let feed = controller(FeedId::Forex, 1_000, 100);
        assert_eq!(feed.refresh(), RefreshOutcome::Started);
        assert_eq!(feed.refresh(), RefreshOutcome::AlreadyInFlight);
        advance(100).await;
        assert_eq!(feed.state().revision(), 1);
        assert_eq!(feed.refresh(), RefreshOutcome::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let feed = controller(FeedId::Fraud, 1_000, 10);
        feed.start();
        feed.start();
        assert!(feed.is_running());

        advance(1_000).await;
        advance(10).await;
        // One timer means one cycle per cadence
        assert_eq!(feed.state().revision(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_mid_refresh_returns_to_idle() {
        let feed = controller(FeedId::Gold, 1_000, 100);
        let before = feed.state();
        feed.refresh();
        advance(50).await;
        feed.stop();

        let after = feed.state();
        assert_eq!(after.kind(), FeedStateKind::Idle);
        assert_eq!(after.data(), before.data());
        advance(500).await;
        assert_eq!(feed.state().revision(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let feed = controller(FeedId::Crypto, 200, 20);
        feed.start();
        feed.stop();
        assert!(!feed.is_running());
        feed.start();
        advance(200).await;
        advance(20).await;
        assert_eq!(feed.state().revision(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_output() {
        let feed = controller(FeedId::SummaryStats, 5_000, 0);
        let text = format!("{:?}", feed);
        assert!(text.contains("SummaryStats"));
        assert!(text.contains("Idle"));
    }
}
