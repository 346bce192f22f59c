//! Swap planning against a reserve snapshot

use crate::error::{AmmError, Result};
use crate::math::{checked_add, checked_sub};
use crate::pricing::{quote_output_with_fee, FeeRate};
use crate::reserves::{PoolReserves, SwapDirection};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Deltas of one swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub amount_out: U256,
}

/// Price `amount_in` against the snapshot and enforce `min_out`
///
/// The input reserve is the one held before this swap's input is credited.
pub fn plan_swap(
    reserves: &PoolReserves,
    direction: SwapDirection,
    amount_in: U256,
    min_out: U256,
    fee: FeeRate,
) -> Result<SwapPlan> {
    if amount_in.is_zero() {
        return Err(AmmError::InvalidAmount("swap input must be positive"));
    }

    let (reserve_in, reserve_out) = reserves.oriented(direction);
    let amount_out = quote_output_with_fee(amount_in, reserve_in, reserve_out, fee)?;
    if amount_out < min_out {
        return Err(AmmError::InsufficientOutputAmount {
            amount_out,
            min_out,
        });
    }

    Ok(SwapPlan {
        direction,
        amount_in,
        amount_out,
    })
}

impl PoolReserves {
    pub fn after_swap(&self, plan: &SwapPlan) -> Result<PoolReserves> {
        let mut next = *self;
        match plan.direction {
            SwapDirection::BaseForToken => {
                next.reserve_base = checked_add(self.reserve_base, plan.amount_in, "base reserve")?;
                next.reserve_token =
                    checked_sub(self.reserve_token, plan.amount_out, "token reserve")?;
            }
            SwapDirection::TokenForBase => {
                next.reserve_token =
                    checked_add(self.reserve_token, plan.amount_in, "token reserve")?;
                next.reserve_base = checked_sub(self.reserve_base, plan.amount_out, "base reserve")?;
            }
        }
        Ok(next)
    }
}
