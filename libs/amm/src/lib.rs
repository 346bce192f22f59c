//! # cdex AMM - Integer Constant Product Mathematics
//!
//! ## Purpose
//!
//! Arithmetic core of the cdex exchange ledger: wide-intermediate `mul_div`,
//! fee-inclusive constant product pricing, and deposit / withdrawal / swap
//! planning against a reserve snapshot. Every function is pure; the ledger
//! crate owns state and applies the plans produced here.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `PoolReserves` snapshots taken inside the ledger's critical section
//! - **Output Destinations**: `cdex-ledger` exchange operations, off-ledger quoting
//! - **Precision**: 256-bit reserves, 512-bit intermediates, no floating point
//! - **Validation**: Every failure is an [`AmmError`]; no panics on caller input
//!
//! ## Rounding
//!
//! Payouts are floored so that rounding remainders stay in the pool. The
//! inverse quote [`quote_input`] is ceiled so the trader always sends enough.
//!
//! ```rust
//! use cdex_amm::{quote_output, U256};
//!
//! // (1000, 1000) reserves, 100 in, 1% fee
//! let out = quote_output(U256::from(100), U256::from(1000), U256::from(1000)).unwrap();
//! assert_eq!(out, U256::from(90));
//! ```

pub mod error;
pub mod liquidity;
pub mod math;
pub mod pricing;
pub mod reserves;
pub mod swap;

pub use error::{AmmError, Result};
pub use liquidity::{plan_deposit, plan_withdraw, DepositPlan, WithdrawPlan};
pub use math::{mul_div, mul_div_scaled, mul_div_scaled_up, mul_div_up};
pub use pricing::{quote_input, quote_output, quote_output_with_fee, FeeRate, SwapQuote};
pub use reserves::{PoolPhase, PoolReserves, SwapDirection};
pub use swap::{plan_swap, SwapPlan};

/// Common integer types for reserve arithmetic
pub use primitive_types::{U256, U512};
