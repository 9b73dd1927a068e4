//! Monitoring dashboard demo
//!
//! Wires the five simulated feeds to a terminal presenter:
//!
//! - **Gold** hourly price and volatility
//! - **Crypto** bitcoin, ethereum and solana, filterable by series
//! - **Forex** six-pair rate table under a base-currency label
//! - **Fraud** scatter events, filterable by region or category
//! - **Summary** headline stat cards
//!
//! Each feed refreshes on its own cadence; every completed refresh prints one
//! line (or one JSON object) through [`presenter::Presenter`].

pub mod presenter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::presenter::{OutputFormat, Presenter};
}
