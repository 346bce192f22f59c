//! Constant product pricing with the fee applied to the input leg
//!
//! The fee is folded into one integer division instead of being subtracted
//! from the input first:
//!
//! ```text
//! amount_out = floor(amount_in * (10000 - fee_bps) * reserve_out
//!                    / (reserve_in * 10000 + amount_in * (10000 - fee_bps)))
//! ```
//!
//! At the default 100 bps this is exactly `in*99*out / (res_in*100 + in*99)`
//! with numerator and denominator both scaled by 100.

use crate::error::{AmmError, Result};
use crate::math::{mul_div_scaled, mul_div_scaled_up};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Fee denominator in basis points
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Swap fee in basis points, strictly below 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeRate(u32);

impl FeeRate {
    /// Flat 1% fee
    pub const DEFAULT: FeeRate = FeeRate(100);

    pub fn from_bps(bps: u32) -> Result<Self> {
        if bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFee(bps));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// Share of the input that reaches the curve, over [`BPS_DENOMINATOR`]
    fn retained_bps(&self) -> u32 {
        BPS_DENOMINATOR - self.0
    }

    fn retained(&self) -> U256 {
        U256::from(self.retained_bps())
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::from_bps(bps)
    }
}

impl From<FeeRate> for u32 {
    fn from(fee: FeeRate) -> u32 {
        fee.0
    }
}

/// Result of pricing a swap; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_out: U256,
}

/// Output for `amount_in` at the default 1% fee
pub fn quote_output(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
    quote_output_with_fee(amount_in, reserve_in, reserve_out, FeeRate::DEFAULT)
}

/// Output for `amount_in` against `(reserve_in, reserve_out)`, floored
pub fn quote_output_with_fee(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> Result<U256> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InvalidReserves);
    }

    // Denominator in 512 bits: reserve_in * 10000 + amount_in * retained
    let denominator = reserve_in
        .full_mul(U256::from(BPS_DENOMINATOR))
        .checked_add(amount_in.full_mul(fee.retained()))
        .ok_or(AmmError::Overflow("quote denominator"))?;

    mul_div_scaled(amount_in, reserve_out, fee.retained_bps(), denominator)
}

/// Minimum input that yields at least `amount_out`, ceiled
///
/// Inverse of [`quote_output_with_fee`]: feeding the returned input back into
/// the forward quote always produces `>= amount_out`.
pub fn quote_input(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> Result<U256> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InvalidReserves);
    }
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    if amount_out.is_zero() {
        return Ok(U256::zero());
    }

    // amount_in = ceil(reserve_in * amount_out * 10000 / ((reserve_out - amount_out) * retained))
    let remaining = reserve_out - amount_out;
    let denominator = remaining.full_mul(fee.retained());

    mul_div_scaled_up(reserve_in, amount_out, BPS_DENOMINATOR, denominator)
}
