//! Ledger error types

use crate::transfer::TransferError;
use cdex_amm::AmmError;
use thiserror::Error;

/// Failure of one ledger operation
///
/// Every variant is raised before any reserve, position or balance changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Amm(#[from] AmmError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Unknown pool: {0}")]
    UnknownPool(String),

    #[error("Pool already exists: {0}")]
    DuplicatePool(String),

    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
