//! Reserve snapshot of a two-asset pool

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};

/// Reserves and LP supply of one pool at a point in time
///
/// Plans are computed against a snapshot and produce a successor snapshot;
/// the ledger swaps the successor in only after every check has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolReserves {
    pub reserve_base: U256,
    pub reserve_token: U256,
    pub total_shares: U256,
}

/// Macro-state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolPhase {
    /// No shares outstanding; the next deposit sets the price
    Empty,
    Active,
}

/// Which asset the trader sends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    BaseForToken,
    TokenForBase,
}

impl PoolReserves {
    pub const EMPTY: PoolReserves = PoolReserves {
        reserve_base: U256::zero(),
        reserve_token: U256::zero(),
        total_shares: U256::zero(),
    };

    pub fn new(reserve_base: U256, reserve_token: U256, total_shares: U256) -> Self {
        Self {
            reserve_base,
            reserve_token,
            total_shares,
        }
    }

    pub fn phase(&self) -> PoolPhase {
        if self.total_shares.is_zero() {
            PoolPhase::Empty
        } else {
            PoolPhase::Active
        }
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`
    pub fn oriented(&self, direction: SwapDirection) -> (U256, U256) {
        match direction {
            SwapDirection::BaseForToken => (self.reserve_base, self.reserve_token),
            SwapDirection::TokenForBase => (self.reserve_token, self.reserve_base),
        }
    }

    /// `reserve_base * reserve_token` without truncation
    pub fn invariant(&self) -> U512 {
        self.reserve_base.full_mul(self.reserve_token)
    }
}
