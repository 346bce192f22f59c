//! Deposit and withdrawal planning
//!
//! A plan is the full set of deltas an operation would apply, computed from a
//! reserve snapshot. Planning never mutates; [`PoolReserves::after_deposit`]
//! and [`PoolReserves::after_withdraw`] derive the successor snapshot with
//! checked arithmetic so the caller can commit with a plain assignment.

use crate::error::{AmmError, Result};
use crate::math::{checked_add, checked_sub, mul_div};
use crate::reserves::{PoolPhase, PoolReserves};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Amounts moved and shares minted by one deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositPlan {
    pub shares_minted: U256,
    pub base_taken: U256,
    /// Never more than the depositor offered
    pub token_taken: U256,
}

/// Amounts returned and shares burned by one withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPlan {
    pub shares_burned: U256,
    pub base_returned: U256,
    pub token_returned: U256,
}

/// Plan a deposit of `base_sent` with up to `token_offered` tokens
///
/// An empty pool takes the full token offer and mints one share per base
/// unit, fixing the initial price. An active pool takes only the tokens that
/// keep the reserve ratio, measured before this deposit's base is credited.
pub fn plan_deposit(
    reserves: &PoolReserves,
    token_offered: U256,
    base_sent: U256,
) -> Result<DepositPlan> {
    if base_sent.is_zero() {
        return Err(AmmError::InvalidAmount("deposit must send base value"));
    }

    match reserves.phase() {
        PoolPhase::Empty => {
            if token_offered.is_zero() {
                return Err(AmmError::InvalidAmount(
                    "first deposit must offer tokens to set a price",
                ));
            }
            Ok(DepositPlan {
                shares_minted: base_sent,
                base_taken: base_sent,
                token_taken: token_offered,
            })
        }
        PoolPhase::Active => {
            let required =
                mul_div(base_sent, reserves.reserve_token, reserves.reserve_base)?;
            if token_offered < required {
                return Err(AmmError::InsufficientTokenAmount {
                    required,
                    offered: token_offered,
                });
            }

            let shares_minted =
                mul_div(reserves.total_shares, base_sent, reserves.reserve_base)?;
            if shares_minted.is_zero() {
                return Err(AmmError::InvalidAmount("deposit too small to mint shares"));
            }

            Ok(DepositPlan {
                shares_minted,
                base_taken: base_sent,
                token_taken: required,
            })
        }
    }
}

/// Plan burning `shares_to_burn` of an owner holding `owner_shares`
///
/// Both payouts are floored so the rounding remainder stays in the pool.
/// Burning the entire supply returns exactly both reserves.
pub fn plan_withdraw(
    reserves: &PoolReserves,
    owner_shares: U256,
    shares_to_burn: U256,
) -> Result<WithdrawPlan> {
    if shares_to_burn.is_zero() {
        return Err(AmmError::InvalidAmount("cannot burn zero shares"));
    }
    if shares_to_burn > owner_shares {
        return Err(AmmError::InvalidAmount("burn exceeds owner's shares"));
    }

    let base_returned = mul_div(reserves.reserve_base, shares_to_burn, reserves.total_shares)?;
    let token_returned =
        mul_div(reserves.reserve_token, shares_to_burn, reserves.total_shares)?;

    Ok(WithdrawPlan {
        shares_burned: shares_to_burn,
        base_returned,
        token_returned,
    })
}

impl PoolReserves {
    pub fn after_deposit(&self, plan: &DepositPlan) -> Result<PoolReserves> {
        Ok(PoolReserves {
            reserve_base: checked_add(self.reserve_base, plan.base_taken, "base reserve")?,
            reserve_token: checked_add(self.reserve_token, plan.token_taken, "token reserve")?,
            total_shares: checked_add(self.total_shares, plan.shares_minted, "share supply")?,
        })
    }

    pub fn after_withdraw(&self, plan: &WithdrawPlan) -> Result<PoolReserves> {
        let next = PoolReserves {
            reserve_base: checked_sub(self.reserve_base, plan.base_returned, "base reserve")?,
            reserve_token: checked_sub(self.reserve_token, plan.token_returned, "token reserve")?,
            total_shares: checked_sub(self.total_shares, plan.shares_burned, "share supply")?,
        };
        debug_assert!(
            !next.total_shares.is_zero()
                || (next.reserve_base.is_zero() && next.reserve_token.is_zero()),
            "drained pool must hold no reserves"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn seeded() -> PoolReserves {
        PoolReserves::new(u(1000), u(500), u(1000))
    }

    #[test]
    fn test_first_deposit_sets_price() {
        let plan = plan_deposit(&PoolReserves::EMPTY, u(500), u(1000)).unwrap();
        assert_eq!(plan.shares_minted, u(1000));
        assert_eq!(plan.token_taken, u(500));

        let next = PoolReserves::EMPTY.after_deposit(&plan).unwrap();
        assert_eq!(next, seeded());
    }

    #[test]
    fn test_first_deposit_requires_both_assets() {
        assert!(matches!(
            plan_deposit(&PoolReserves::EMPTY, U256::zero(), u(1000)),
            Err(AmmError::InvalidAmount(_))
        ));
        assert!(matches!(
            plan_deposit(&PoolReserves::EMPTY, u(500), U256::zero()),
            Err(AmmError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_proportional_deposit_takes_required_tokens_only() {
        let plan = plan_deposit(&seeded(), u(80), u(100)).unwrap();
        assert_eq!(plan.token_taken, u(50));
        assert_eq!(plan.shares_minted, u(100));

        let next = seeded().after_deposit(&plan).unwrap();
        assert_eq!(next, PoolReserves::new(u(1100), u(550), u(1100)));
    }

    #[test]
    fn test_under_supplied_tokens_rejected() {
        let err = plan_deposit(&seeded(), u(40), u(100)).unwrap_err();
        assert_eq!(
            err,
            AmmError::InsufficientTokenAmount {
                required: u(50),
                offered: u(40),
            }
        );
    }

    #[test]
    fn test_required_tokens_are_floored() {
        // 3 base into (7 base, 5 token, 7 shares): required = floor(15/7) = 2
        let pool = PoolReserves::new(u(7), u(5), u(7));
        let plan = plan_deposit(&pool, u(10), u(3)).unwrap();
        assert_eq!(plan.token_taken, u(2));
        assert_eq!(plan.shares_minted, u(3));
    }

    #[test]
    fn test_dust_deposit_rejected() {
        // shares = floor(10 * 1 / 1000) = 0
        let pool = PoolReserves::new(u(1000), u(1000), u(10));
        assert!(matches!(
            plan_deposit(&pool, u(10), u(1)),
            Err(AmmError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_withdraw_bounds() {
        assert!(matches!(
            plan_withdraw(&seeded(), u(1000), U256::zero()),
            Err(AmmError::InvalidAmount(_))
        ));
        assert!(matches!(
            plan_withdraw(&seeded(), u(400), u(401)),
            Err(AmmError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_partial_withdraw_floors() {
        let pool = PoolReserves::new(u(1001), u(503), u(1000));
        let plan = plan_withdraw(&pool, u(1000), u(333)).unwrap();
        // floor(1001*333/1000) = 333, floor(503*333/1000) = 167
        assert_eq!(plan.base_returned, u(333));
        assert_eq!(plan.token_returned, u(167));
    }

    #[test]
    fn test_full_withdraw_drains_exactly() {
        let pool = PoolReserves::new(u(1234), u(987), u(1000));
        let plan = plan_withdraw(&pool, u(1000), u(1000)).unwrap();
        assert_eq!(plan.base_returned, u(1234));
        assert_eq!(plan.token_returned, u(987));

        let next = pool.after_withdraw(&plan).unwrap();
        assert_eq!(next, PoolReserves::EMPTY);
        assert_eq!(next.phase(), PoolPhase::Empty);
    }
}
