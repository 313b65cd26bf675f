//! Farm Admin - dashboard command
//!
//! Reads the whole-store snapshot fetched by the API layer, admits it into a
//! `DomainStore` (so a snapshot that breaks an integrity rule is refused) and
//! prints the dashboard.
//!
//! Usage: `farm-admin [SNAPSHOT_PATH]`

use std::path::PathBuf;

use anyhow::Context;
use shared::{dashboard, DomainStore, Snapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;

pub use config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_admin=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::load()?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.snapshot.path = PathBuf::from(path);
    }

    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Reading snapshot from {}", config.snapshot.path.display());

    let raw = std::fs::read_to_string(&config.snapshot.path)
        .with_context(|| format!("Failed to read {}", config.snapshot.path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw).context("Invalid snapshot JSON")?;
    let store = DomainStore::from_snapshot(snapshot).context("Snapshot rejected")?;

    let data = dashboard(&store);
    println!("{}", report::render(&data, &config.output)?);

    Ok(())
}
