//! # feed_runtime: Refresh Coordination for Dashboard Feeds
//!
//! ## Layer 2 (Runtime) Role
//!
//! feed_runtime turns the pure generators of `feed_core` into live feeds:
//! - Per-feed state machine with single-in-flight refresh (`controller`)
//! - Independent timers for every feed, mounted and torn down together
//!   (`registry`)
//! - Read-only state snapshots and change listeners (`state`, `subscription`)
//! - Injectable time source (`clock`)
//! - TOML configuration with environment overrides (`config`)
//!
//! ## Lifecycle
//!
//! ```text
//!   timer tick / refresh()
//!          │
//!   Idle ──┴──▶ Refreshing ──(simulated latency)──▶ Idle + new data
//!                    │                                  │
//!                 stop() ──▶ Idle, previous data        └──▶ listeners
//! ```
//!
//! All scheduled work runs as tasks on the ambient Tokio runtime and carries a
//! cancellation token; `stop()` and `Drop` cancel every one of them.

pub mod clock;
pub mod config;
pub mod controller;
pub mod registry;
pub mod spec;
pub mod state;
pub mod subscription;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, RuntimeClock, SystemClock};
    pub use crate::config::{ConfigError, DashboardConfig, FeedSettings, FeedsConfig};
    pub use crate::controller::{FeedController, RefreshOutcome};
    pub use crate::registry::FeedRegistry;
    pub use crate::spec::FeedSpec;
    pub use crate::state::{FeedDiagnostic, FeedState, FeedStateKind};
    pub use crate::subscription::Subscription;
}
