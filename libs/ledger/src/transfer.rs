//! Asset transfer seam
//!
//! The ledger never holds owner balances itself. It hands each operation's
//! movements to an [`AssetTransfer`] as one batch and commits its own state
//! only if the whole batch succeeded.

use crate::address::{Address, Asset};
use cdex_amm::U256;
use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Which way value moves relative to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Owner pays the pool
    IntoPool,
    /// Pool pays the owner
    OutOfPool,
}

/// One leg of a settlement batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub asset: Asset,
    pub direction: Direction,
    pub amount: U256,
}

impl Transfer {
    pub fn into_pool(asset: &Asset, amount: U256) -> Self {
        Self {
            asset: asset.clone(),
            direction: Direction::IntoPool,
            amount,
        }
    }

    pub fn out_of_pool(asset: &Asset, amount: U256) -> Self {
        Self {
            asset: asset.clone(),
            direction: Direction::OutOfPool,
            amount,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient {asset} balance for {owner}: required {required}, available {available}")]
    InsufficientBalance {
        owner: Address,
        asset: Asset,
        required: U256,
        available: U256,
    },

    #[error("Balance overflow crediting {asset} to {owner}")]
    Overflow { owner: Address, asset: Asset },

    /// Transport or custody failure reported by an external implementation
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Moves assets between owners and the pool
///
/// `execute` is all-or-nothing: either every leg is applied or none is, and
/// an error leaves every balance untouched.
pub trait AssetTransfer: Send + Sync {
    fn execute(&self, owner: &Address, transfers: &[Transfer]) -> Result<(), TransferError>;
}

/// In-memory owner balances
#[derive(Debug, Default)]
pub struct Wallets {
    balances: Mutex<HashMap<(Address, Asset), U256>>,
}

impl Wallets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `asset` to `owner` outside any pool
    pub fn credit(&self, owner: &Address, asset: &Asset, amount: U256) -> Result<(), TransferError> {
        let mut balances = self.balances.lock();
        let entry = balances.entry((*owner, asset.clone())).or_default();
        *entry = entry.checked_add(amount).ok_or_else(|| TransferError::Overflow {
            owner: *owner,
            asset: asset.clone(),
        })?;
        Ok(())
    }

    pub fn balance(&self, owner: &Address, asset: &Asset) -> U256 {
        self.balances
            .lock()
            .get(&(*owner, asset.clone()))
            .copied()
            .unwrap_or_default()
    }
}

impl AssetTransfer for Wallets {
    fn execute(&self, owner: &Address, transfers: &[Transfer]) -> Result<(), TransferError> {
        let mut balances = self.balances.lock();

        // Stage every leg against a scratch copy of the touched balances
        let mut staged: HashMap<&Asset, U256> = HashMap::new();
        for transfer in transfers {
            let current = match staged.get(&transfer.asset) {
                Some(value) => *value,
                None => balances
                    .get(&(*owner, transfer.asset.clone()))
                    .copied()
                    .unwrap_or_default(),
            };

            let next = match transfer.direction {
                Direction::IntoPool => current.checked_sub(transfer.amount).ok_or_else(|| {
                    TransferError::InsufficientBalance {
                        owner: *owner,
                        asset: transfer.asset.clone(),
                        required: transfer.amount,
                        available: current,
                    }
                })?,
                Direction::OutOfPool => current.checked_add(transfer.amount).ok_or_else(|| {
                    TransferError::Overflow {
                        owner: *owner,
                        asset: transfer.asset.clone(),
                    }
                })?,
            };
            staged.insert(&transfer.asset, next);
        }

        for (asset, value) in staged {
            balances.insert((*owner, asset.clone()), value);
        }
        debug!("Settled {} transfer legs for {}", transfers.len(), owner);
        Ok(())
    }
}
