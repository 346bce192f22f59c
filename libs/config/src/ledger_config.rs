//! Ledger Configuration Module
//!
//! Loads pool definitions and logging settings from a TOML file with
//! environment variable overrides (`CDEX_` prefix, `__` between sections).

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Basis-point denominator; a fee must stay strictly below it
const MAX_FEE_BPS: u32 = 10_000;

/// Main ledger configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LedgerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pools to create at startup
    #[serde(default = "default_pools")]
    pub pools: Vec<PoolSettings>,
}

/// Tracing subscriber settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// One asset pair pool
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolSettings {
    pub name: String,
    #[serde(default = "default_base_symbol")]
    pub base_symbol: String,
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,
}

fn default_base_symbol() -> String {
    "ETH".to_string()
}

fn default_token_symbol() -> String {
    "CD".to_string()
}

fn default_fee_bps() -> u32 {
    100
}

fn default_pools() -> Vec<PoolSettings> {
    vec![PoolSettings::default()]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            name: "ETH-CD".to_string(),
            base_symbol: default_base_symbol(),
            token_symbol: default_token_symbol(),
            fee_bps: default_fee_bps(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            pools: default_pools(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from an optional TOML file with environment overrides
    ///
    /// Without a file the defaults apply, still subject to `CDEX_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading ledger config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CDEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        let loaded: LedgerConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        loaded.validate()?;

        debug!("Loaded {} pool definitions", loaded.pools.len());
        Ok(loaded)
    }

    /// Reject configurations no ledger could be built from
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pool in &self.pools {
            if pool.name.trim().is_empty() {
                bail!("Pool name must not be empty");
            }
            if !seen.insert(pool.name.as_str()) {
                bail!("Duplicate pool name: {}", pool.name);
            }
            if pool.base_symbol == pool.token_symbol {
                bail!("Pool {} trades {} against itself", pool.name, pool.base_symbol);
            }
            if pool.fee_bps >= MAX_FEE_BPS {
                bail!(
                    "Pool {} fee {} bps must be below {}",
                    pool.name,
                    pool.fee_bps,
                    MAX_FEE_BPS
                );
            }
        }
        Ok(())
    }

    pub fn get_pool(&self, name: &str) -> Option<&PoolSettings> {
        self.pools.iter().find(|p| p.name == name)
    }
}

/// Convenience function to load configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    LedgerConfig::load(path)
}
