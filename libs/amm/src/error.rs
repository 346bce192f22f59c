//! Error taxonomy for pool arithmetic and operation planning

use primitive_types::U256;
use thiserror::Error;

/// Failures of a single pricing, liquidity or swap computation.
///
/// Every variant is synchronous and non-retryable: the caller must re-read
/// reserve state and run the whole operation again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Quoting against a zero input or output reserve
    #[error("Invalid reserves: both reserves must be positive")]
    InvalidReserves,

    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit in 256 bits
    #[error("Overflow: {0}")]
    Overflow(&'static str),

    #[error("Underflow: {0}")]
    Underflow(&'static str),

    /// Deposit under-supplies tokens for the current reserve ratio
    #[error("Insufficient token amount: required {required}, offered {offered}")]
    InsufficientTokenAmount { required: U256, offered: U256 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Slippage protection breached
    #[error("Insufficient output amount: would receive {amount_out}, minimum {min_out}")]
    InsufficientOutputAmount { amount_out: U256, min_out: U256 },

    /// Requested output is not strictly below the output reserve
    #[error("Insufficient liquidity: requested output exceeds reserves")]
    InsufficientLiquidity,

    #[error("Invalid fee: {0} bps (must be below 10000)")]
    InvalidFee(u32),
}

pub type Result<T> = std::result::Result<T, AmmError>;
