//! # cdex Ledger Configuration
//!
//! Configuration loading and logging setup for processes embedding the
//! cdex exchange ledger.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cdex_config::{init_tracing, load_config};
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("config/ledger.toml")))?;
//! init_tracing(&config.logging)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ledger_config;
pub mod logging;

pub use ledger_config::{load_config, LedgerConfig, LoggingConfig, PoolSettings};
pub use logging::init_tracing;
