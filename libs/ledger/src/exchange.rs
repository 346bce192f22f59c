//! Single-Pool Exchange
//!
//! Owns one pool's reserves and LP positions behind a single-writer lock.
//! Every public mutation runs snapshot → plan → transfer → commit while the
//! lock is held, so a quote is always priced against the reserves it mutates.
//! Planning and successor-state computation happen before the transfer batch,
//! and the commit itself cannot fail: an error on any step leaves the pool,
//! the positions and every owner balance exactly as they were.

use crate::address::{Address, Asset};
use crate::error::Result;
use crate::transfer::{AssetTransfer, Transfer};
use cdex_amm::math::{checked_add, checked_sub};
use cdex_amm::{
    plan_deposit, plan_swap, plan_withdraw, quote_output_with_fee, FeeRate, PoolPhase,
    PoolReserves, SwapDirection, SwapQuote, U256,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The two assets a pool trades
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAssets {
    pub base: Asset,
    pub token: Asset,
}

impl PoolAssets {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base: Asset::new(base),
            token: Asset::new(token),
        }
    }
}

impl Default for PoolAssets {
    fn default() -> Self {
        Self::new("ETH", "CD")
    }
}

/// LP shares held by one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub owner: Address,
    pub shares: U256,
}

/// Read-only view of a pool for queries and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub name: String,
    pub assets: PoolAssets,
    pub fee: FeeRate,
    pub reserves: PoolReserves,
    pub phase: PoolPhase,
    /// Sorted by owner
    pub positions: Vec<LiquidityPosition>,
}

#[derive(Debug, Default)]
struct PoolState {
    reserves: PoolReserves,
    /// Owners with zero shares are removed
    positions: HashMap<Address, U256>,
}

impl PoolState {
    fn share_of(&self, owner: &Address) -> U256 {
        self.positions.get(owner).copied().unwrap_or_default()
    }

    fn sorted_positions(&self) -> Vec<LiquidityPosition> {
        let mut positions: Vec<_> = self
            .positions
            .iter()
            .map(|(owner, shares)| LiquidityPosition {
                owner: *owner,
                shares: *shares,
            })
            .collect();
        positions.sort_by(|a, b| a.owner.cmp(&b.owner));
        positions
    }

    fn set_position(&mut self, owner: &Address, shares: U256) {
        if shares.is_zero() {
            self.positions.remove(owner);
        } else {
            self.positions.insert(*owner, shares);
        }
    }
}

/// Constant product exchange for one asset pair
pub struct Exchange {
    name: String,
    assets: PoolAssets,
    fee: FeeRate,
    state: Mutex<PoolState>,
    transfers: Arc<dyn AssetTransfer>,
}

impl Exchange {
    /// Create an empty pool settling through `transfers`
    pub fn new(
        name: impl Into<String>,
        assets: PoolAssets,
        fee: FeeRate,
        transfers: Arc<dyn AssetTransfer>,
    ) -> Self {
        Self {
            name: name.into(),
            assets,
            fee,
            state: Mutex::new(PoolState::default()),
            transfers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assets(&self) -> &PoolAssets {
        &self.assets
    }

    pub fn fee(&self) -> FeeRate {
        self.fee
    }

    /// `(reserve_base, reserve_token)`
    pub fn reserves(&self) -> (U256, U256) {
        let state = self.state.lock();
        (state.reserves.reserve_base, state.reserves.reserve_token)
    }

    pub fn total_shares(&self) -> U256 {
        self.state.lock().reserves.total_shares
    }

    /// Shares held by `owner`; zero for unknown owners
    pub fn share_of(&self, owner: &Address) -> U256 {
        self.state.lock().share_of(owner)
    }

    pub fn phase(&self) -> PoolPhase {
        self.state.lock().reserves.phase()
    }

    pub fn positions(&self) -> Vec<LiquidityPosition> {
        self.state.lock().sorted_positions()
    }

    /// Reserves and positions read under one lock acquisition
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        PoolSnapshot {
            name: self.name.clone(),
            assets: self.assets.clone(),
            fee: self.fee,
            reserves: state.reserves,
            phase: state.reserves.phase(),
            positions: state.sorted_positions(),
        }
    }

    /// Price `input_base` against the current reserves without trading
    pub fn quote_base_for_token(&self, input_base: U256) -> Result<SwapQuote> {
        self.quote(SwapDirection::BaseForToken, input_base)
    }

    pub fn quote_token_for_base(&self, input_token: U256) -> Result<SwapQuote> {
        self.quote(SwapDirection::TokenForBase, input_token)
    }

    /// Deposit `base_sent` with up to `token_offered` tokens
    ///
    /// Returns the LP shares minted. Only the tokens that keep the reserve
    /// ratio are pulled from `owner`.
    pub fn add_liquidity(
        &self,
        token_offered: U256,
        base_sent: U256,
        owner: &Address,
    ) -> Result<U256> {
        let mut state = self.state.lock();
        let result = self.apply_deposit(&mut state, token_offered, base_sent, owner);
        self.log_rejection("add_liquidity", owner, result)
    }

    /// Burn `shares_to_burn` of `owner`'s shares for a pro-rata payout
    ///
    /// Returns `(base_returned, token_returned)`.
    pub fn remove_liquidity(&self, shares_to_burn: U256, owner: &Address) -> Result<(U256, U256)> {
        let mut state = self.state.lock();
        let result = self.apply_withdraw(&mut state, shares_to_burn, owner);
        self.log_rejection("remove_liquidity", owner, result)
    }

    /// Sell `input_base` for at least `min_token_out` tokens
    pub fn swap_base_for_token(
        &self,
        input_base: U256,
        min_token_out: U256,
        owner: &Address,
    ) -> Result<U256> {
        self.swap(SwapDirection::BaseForToken, input_base, min_token_out, owner)
    }

    /// Sell `input_token` for at least `min_base_out` base
    pub fn swap_token_for_base(
        &self,
        input_token: U256,
        min_base_out: U256,
        owner: &Address,
    ) -> Result<U256> {
        self.swap(SwapDirection::TokenForBase, input_token, min_base_out, owner)
    }

    fn quote(&self, direction: SwapDirection, amount_in: U256) -> Result<SwapQuote> {
        let reserves = self.state.lock().reserves;
        let (reserve_in, reserve_out) = reserves.oriented(direction);
        let amount_out = quote_output_with_fee(amount_in, reserve_in, reserve_out, self.fee)?;
        debug!(
            "Quote on {}: {:?} {} in -> {} out",
            self.name, direction, amount_in, amount_out
        );
        Ok(SwapQuote { amount_out })
    }

    fn swap(
        &self,
        direction: SwapDirection,
        amount_in: U256,
        min_out: U256,
        owner: &Address,
    ) -> Result<U256> {
        let mut state = self.state.lock();
        let result = self.apply_swap(&mut state, direction, amount_in, min_out, owner);
        self.log_rejection("swap", owner, result)
    }

    fn apply_deposit(
        &self,
        state: &mut PoolState,
        token_offered: U256,
        base_sent: U256,
        owner: &Address,
    ) -> Result<U256> {
        let plan = plan_deposit(&state.reserves, token_offered, base_sent)?;
        let next = state.reserves.after_deposit(&plan)?;
        let position = checked_add(state.share_of(owner), plan.shares_minted, "owner shares")?;
        debug!("Deposit plan on {}: {:?}", self.name, plan);

        self.transfers.execute(
            owner,
            &[
                Transfer::into_pool(&self.assets.base, plan.base_taken),
                Transfer::into_pool(&self.assets.token, plan.token_taken),
            ],
        )?;

        if state.reserves.phase() == PoolPhase::Empty {
            info!(
                "Pool {} activated by {}: price set at {} {} / {} {}",
                self.name,
                owner,
                plan.base_taken,
                self.assets.base,
                plan.token_taken,
                self.assets.token
            );
        }
        state.reserves = next;
        state.set_position(owner, position);

        info!(
            "Liquidity added to {} by {}: {} {} + {} {} -> {} shares",
            self.name,
            owner,
            plan.base_taken,
            self.assets.base,
            plan.token_taken,
            self.assets.token,
            plan.shares_minted
        );
        Ok(plan.shares_minted)
    }

    fn apply_withdraw(
        &self,
        state: &mut PoolState,
        shares_to_burn: U256,
        owner: &Address,
    ) -> Result<(U256, U256)> {
        let owned = state.share_of(owner);
        let plan = plan_withdraw(&state.reserves, owned, shares_to_burn)?;
        let next = state.reserves.after_withdraw(&plan)?;
        let remaining = checked_sub(owned, plan.shares_burned, "owner shares")?;
        debug!("Withdraw plan on {}: {:?}", self.name, plan);

        self.transfers.execute(
            owner,
            &[
                Transfer::out_of_pool(&self.assets.base, plan.base_returned),
                Transfer::out_of_pool(&self.assets.token, plan.token_returned),
            ],
        )?;

        state.reserves = next;
        state.set_position(owner, remaining);

        info!(
            "Liquidity removed from {} by {}: {} shares -> {} {} + {} {}",
            self.name,
            owner,
            plan.shares_burned,
            plan.base_returned,
            self.assets.base,
            plan.token_returned,
            self.assets.token
        );
        if next.phase() == PoolPhase::Empty {
            info!("Pool {} drained to empty", self.name);
        }
        Ok((plan.base_returned, plan.token_returned))
    }

    fn apply_swap(
        &self,
        state: &mut PoolState,
        direction: SwapDirection,
        amount_in: U256,
        min_out: U256,
        owner: &Address,
    ) -> Result<U256> {
        let plan = plan_swap(&state.reserves, direction, amount_in, min_out, self.fee)?;
        let next = state.reserves.after_swap(&plan)?;
        debug_assert!(next.invariant() >= state.reserves.invariant());

        let (asset_in, asset_out) = match direction {
            SwapDirection::BaseForToken => (&self.assets.base, &self.assets.token),
            SwapDirection::TokenForBase => (&self.assets.token, &self.assets.base),
        };
        self.transfers.execute(
            owner,
            &[
                Transfer::into_pool(asset_in, plan.amount_in),
                Transfer::out_of_pool(asset_out, plan.amount_out),
            ],
        )?;

        state.reserves = next;

        info!(
            "Swap on {} by {}: {} {} -> {} {}",
            self.name, owner, plan.amount_in, asset_in, plan.amount_out, asset_out
        );
        Ok(plan.amount_out)
    }

    fn log_rejection<T>(&self, operation: &str, owner: &Address, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!("{} on {} rejected for {}: {}", operation, self.name, owner, e);
        }
        result
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("name", &self.name)
            .field("assets", &self.assets)
            .field("fee", &self.fee)
            .field("reserves", &self.state.try_lock().map(|state| state.reserves))
            .finish_non_exhaustive()
    }
}
