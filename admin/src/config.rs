//! Configuration management for the Farm Admin tool
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides, `FARM__SECTION__KEY`
//!    (e.g. `FARM__OUTPUT__FORMAT=csv`, `FARM__SNAPSHOT__PATH=...`)
//!
//! The environment name itself is read from `FARM_ENVIRONMENT` (single
//! underscore) before the builder runs, to pick the config file.

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Where the whole-store snapshot is read from
    pub snapshot: SnapshotConfig,

    /// How the dashboard is printed
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    /// Path to the snapshot JSON written by the API layer
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM__SECTION__KEY)
            .add_source(environment_overrides())
            .build()?;

        config.try_deserialize()
    }
}

/// Keys look like `FARM__OUTPUT__PRETTY`
fn environment_overrides() -> Environment {
    Environment::with_prefix("FARM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("environment", environment)?
        .set_default("snapshot.path", "data/snapshot.json")?
        .set_default("output.format", "json")?
        .set_default("output.pretty", true)
}
