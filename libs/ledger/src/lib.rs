//! # cdex Ledger - Two-Asset Constant Product Exchange
//!
//! ## Purpose
//!
//! Holds the reserves of ETH/CD style pools, issues LP shares to liquidity
//! providers and executes swaps priced by the pool's own reserves. The
//! arithmetic lives in `cdex-amm`; this crate owns state, serializes access
//! per pool and drives settlement through the [`AssetTransfer`] seam.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Authenticated callers invoking [`Exchange`] operations
//! - **Settlement**: Any [`AssetTransfer`] implementation; [`Wallets`] in memory
//! - **Configuration**: [`PoolRegistry::from_config`] over a `cdex-config` [`LedgerConfig`]
//! - **Observability**: `tracing` events for committed and rejected operations
//!
//! ## Architecture Role
//!
//! ```text
//! Caller → [PoolRegistry] → [Exchange (per-pool lock)] → [cdex-amm plan] → [AssetTransfer] → commit
//!               ↓                    ↓                         ↓                  ↓
//!          name lookup        reserve snapshot          deltas + checks     all-or-nothing batch
//! ```
//!
//! ## Pool Lifecycle
//!
//! A pool is `Empty` until its first deposit sets the price, `Active` while
//! shares are outstanding, and returns to `Empty` only when every share is
//! burned, at which point both reserves are exactly zero.
//!
//! ```rust
//! use cdex_ledger::{Address, Exchange, FeeRate, PoolAssets, Wallets, U256};
//! use std::sync::Arc;
//!
//! let wallets = Arc::new(Wallets::new());
//! let assets = PoolAssets::default();
//! let lp = Address::from_bytes([1u8; 20]);
//! wallets.credit(&lp, &assets.base, U256::from(1000)).unwrap();
//! wallets.credit(&lp, &assets.token, U256::from(500)).unwrap();
//!
//! let pool = Exchange::new("ETH-CD", assets, FeeRate::DEFAULT, wallets.clone());
//! let shares = pool.add_liquidity(U256::from(500), U256::from(1000), &lp).unwrap();
//! assert_eq!(shares, U256::from(1000));
//! assert_eq!(pool.reserves(), (U256::from(1000), U256::from(500)));
//! ```

pub mod address;
pub mod error;
pub mod exchange;
pub mod registry;
pub mod transfer;

pub use address::{Address, AddressError, Asset};
pub use error::{LedgerError, Result};
pub use exchange::{Exchange, LiquidityPosition, PoolAssets, PoolSnapshot};
pub use registry::PoolRegistry;
pub use transfer::{AssetTransfer, Direction, Transfer, TransferError, Wallets};

pub use cdex_amm::{AmmError, FeeRate, PoolPhase, PoolReserves, SwapQuote, U256};
pub use cdex_config::{LedgerConfig, PoolSettings};
