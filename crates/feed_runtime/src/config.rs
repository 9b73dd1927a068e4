//! Dashboard configuration management.
//!
//! Loads feed timing from a TOML file, applies environment variable overrides
//! and validates the result before any feed is built.
//!
//! ```toml
//! log_level = "debug"
//! seed = 42
//!
//! [feeds.gold]
//! cadence_ms = 10000
//! latency_ms = 250
//!
//! [feeds.summary_stats]
//! enabled = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use feed_core::types::FeedId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::{default_cadence_ms, default_latency_ms, FeedSpec};

/// Path tried by [`DashboardConfig::load_or_default`] when none is given
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Per-feed overrides. Unset fields fall back to the stock values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedSettings {
    /// Refresh interval in milliseconds
    pub cadence_ms: Option<u64>,
    /// Simulated latency in milliseconds
    pub latency_ms: Option<u64>,
    /// Whether the feed is built at all (default `true`)
    pub enabled: Option<bool>,
}

impl FeedSettings {
    /// Whether the feed should be built
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Settings for every feed, keyed by feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedsConfig {
    /// Gold price chart
    pub gold: FeedSettings,
    /// Crypto price chart
    pub crypto: FeedSettings,
    /// Forex rate table
    pub forex: FeedSettings,
    /// Fraud heatmap
    pub fraud: FeedSettings,
    /// Summary stat cards
    pub summary_stats: FeedSettings,
}

impl FeedsConfig {
    /// Settings of one feed
    pub fn settings(&self, id: FeedId) -> &FeedSettings {
        match id {
            FeedId::Gold => &self.gold,
            FeedId::Crypto => &self.crypto,
            FeedId::Forex => &self.forex,
            FeedId::Fraud => &self.fraud,
            FeedId::SummaryStats => &self.summary_stats,
        }
    }

    /// Mutable settings of one feed
    pub fn settings_mut(&mut self, id: FeedId) -> &mut FeedSettings {
        match id {
            FeedId::Gold => &mut self.gold,
            FeedId::Crypto => &mut self.crypto,
            FeedId::Forex => &mut self.forex,
            FeedId::Fraud => &mut self.fraud,
            FeedId::SummaryStats => &mut self.summary_stats,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Log level
    pub log_level: String,

    /// Base seed; every feed derives its own from it. Entropy when unset.
    pub seed: Option<u64>,

    /// Per-feed settings
    pub feeds: FeedsConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            seed: None,
            feeds: FeedsConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else
    /// the defaults.
    ///
    /// An explicitly given path that cannot be read is an error; a missing
    /// default file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    ///
    /// Keys are `DASHBOARD_LOG_LEVEL`, `DASHBOARD_SEED` and, per feed,
    /// `DASHBOARD_<FEED>_CADENCE_MS` / `DASHBOARD_<FEED>_LATENCY_MS`.
    /// Unparseable numbers are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log_level) = lookup("DASHBOARD_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(seed) = lookup("DASHBOARD_SEED").and_then(|v| v.parse().ok()) {
            self.seed = Some(seed);
        }

        for id in FeedId::ALL {
            let prefix = format!("DASHBOARD_{}", id.env_key());
            let settings = self.feeds.settings_mut(id);
            if let Some(ms) = lookup(&format!("{}_CADENCE_MS", prefix)).and_then(|v| v.parse().ok()) {
                settings.cadence_ms = Some(ms);
            }
            if let Some(ms) = lookup(&format!("{}_LATENCY_MS", prefix)).and_then(|v| v.parse().ok()) {
                settings.latency_ms = Some(ms);
            }
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        for id in FeedId::ALL {
            if self.feeds.settings(id).cadence_ms == Some(0) {
                errors.push(format!("feeds.{}.cadence_ms must be greater than 0", config_key(id)));
            }
        }

        if !FeedId::ALL.iter().any(|id| self.feeds.settings(*id).is_enabled()) {
            errors.push("At least one feed must be enabled".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file with environment overrides and validate
    pub fn load_with_env_and_validate(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Cadence of a feed after overrides
    pub fn cadence(&self, id: FeedId) -> Duration {
        let ms = self
            .feeds
            .settings(id)
            .cadence_ms
            .unwrap_or_else(|| default_cadence_ms(id));
        Duration::from_millis(ms)
    }

    /// Latency of a feed after overrides
    pub fn latency(&self, id: FeedId) -> Duration {
        let ms = self
            .feeds
            .settings(id)
            .latency_ms
            .unwrap_or_else(|| default_latency_ms(id));
        Duration::from_millis(ms)
    }

    /// Specs for every enabled feed, in [`FeedId::ALL`] order.
    ///
    /// With a base seed, feed `i` is seeded with `seed + i` so feeds do not
    /// share a random stream.
    pub fn feed_specs(&self) -> Vec<FeedSpec> {
        FeedId::ALL
            .iter()
            .enumerate()
            .filter(|(_, id)| self.feeds.settings(**id).is_enabled())
            .map(|(idx, id)| {
                let spec = FeedSpec::new(*id, self.cadence(*id), self.latency(*id));
                match self.seed {
                    Some(seed) => spec.with_seed(seed.wrapping_add(idx as u64)),
                    None => spec,
                }
            })
            .collect()
    }
}

fn config_key(id: FeedId) -> String {
    id.code().replace('-', "_")
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error reading {}: {message}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        message: String,
    },
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
