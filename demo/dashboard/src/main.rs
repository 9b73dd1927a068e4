//! Dashboard CLI
//!
//! Mounts every configured feed and prints each completed refresh until the
//! run time elapses or Ctrl-C is pressed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dashboard::prelude::*;
use feed_core::filter::{BaseCurrency, FraudSelector, SeriesSelection};
use feed_core::types::FeedId;
use feed_runtime::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Simulated live-feed monitoring dashboard
#[derive(Parser)]
#[command(name = "dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./dashboard.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds to run before unmounting; 0 runs until Ctrl-C
    #[arg(long, default_value_t = 0)]
    run_for: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Crypto series to show, comma separated
    #[arg(long, value_delimiter = ',', default_value = "bitcoin,ethereum,solana")]
    crypto: Vec<String>,

    /// Fraud region or category to show ("All" for everything)
    #[arg(long, default_value = "All")]
    fraud: String,

    /// Forex base currency label (USD, EUR, GBP)
    #[arg(long, default_value = "USD")]
    base: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())?.with_env_override();
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
    config.validate()?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let level: LevelFilter = config.log_level.to_lowercase().parse()?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: DashboardConfig) -> Result<()> {
    let presenter = Arc::new(
        Presenter::new(cli.format)
            .with_crypto(SeriesSelection::new(cli.crypto))
            .with_fraud(FraudSelector::parse(&cli.fraud))
            .with_base(BaseCurrency::parse(&cli.base)),
    );

    let registry = FeedRegistry::from_config(&config, Arc::new(SystemClock))?;
    info!(feeds = registry.len(), seed = ?config.seed, "Dashboard starting");

    let mut subscriptions = Vec::with_capacity(registry.len());
    for feed in &registry {
        let id = feed.id();
        print_state(&presenter, id, &feed.state());

        let presenter = Arc::clone(&presenter);
        subscriptions.push(feed.subscribe(move |state: &FeedState| {
            print_state(&presenter, id, state);
        }));
    }

    registry.mount_all();

    if cli.run_for == 0 {
        tokio::signal::ctrl_c().await?;
    } else {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(cli.run_for)) => {}
            signal = tokio::signal::ctrl_c() => signal?,
        }
    }

    registry.unmount_all();
    drop(subscriptions);
    info!("Dashboard stopped");
    Ok(())
}

fn print_state(presenter: &Presenter, id: FeedId, state: &FeedState) {
    match presenter.render(id, state) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(feed = %id, error = %e, "Failed to render feed"),
    }
}
