//! Pool registry
//!
//! Holds every configured pool by name. Each pool carries its own lock, so
//! operations on distinct pools never contend.

use crate::error::{LedgerError, Result};
use crate::exchange::{Exchange, PoolAssets};
use crate::transfer::AssetTransfer;
use cdex_amm::FeeRate;
use cdex_config::{LedgerConfig, PoolSettings};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// All pools of one ledger, keyed by pool name
pub struct PoolRegistry {
    pools: DashMap<String, Arc<Exchange>>,
    transfers: Arc<dyn AssetTransfer>,
}

impl PoolRegistry {
    /// Create an empty registry settling every pool through `transfers`
    pub fn new(transfers: Arc<dyn AssetTransfer>) -> Self {
        Self {
            pools: DashMap::new(),
            transfers,
        }
    }

    /// Create every pool listed in `config`
    pub fn from_config(config: &LedgerConfig, transfers: Arc<dyn AssetTransfer>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;

        let registry = Self::new(transfers);
        for settings in &config.pools {
            registry.create_pool(settings)?;
        }
        info!("Pool registry initialized with {} pools", registry.len());
        Ok(registry)
    }

    /// Add an empty pool described by `settings`
    pub fn create_pool(&self, settings: &PoolSettings) -> Result<Arc<Exchange>> {
        if settings.base_symbol == settings.token_symbol {
            return Err(LedgerError::InvalidConfig(format!(
                "Pool {} trades {} against itself",
                settings.name, settings.base_symbol
            )));
        }
        let fee = FeeRate::from_bps(settings.fee_bps)?;
        match self.pools.entry(settings.name.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicatePool(settings.name.clone())),
            Entry::Vacant(slot) => {
                let exchange = Arc::new(Exchange::new(
                    settings.name.clone(),
                    PoolAssets::new(settings.base_symbol.clone(), settings.token_symbol.clone()),
                    fee,
                    self.transfers.clone(),
                ));
                slot.insert(exchange.clone());
                info!(
                    "Created pool {} ({}/{}, {} bps)",
                    settings.name, settings.base_symbol, settings.token_symbol, settings.fee_bps
                );
                Ok(exchange)
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<Exchange>> {
        self.pools
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::UnknownPool(name.to_string()))
    }

    /// Pool names in sorted order
    pub fn pool_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.pools.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::transfer::Wallets;
    use cdex_amm::{AmmError, U256};

    fn wallets() -> Arc<Wallets> {
        Arc::new(Wallets::new())
    }

    #[test]
    fn test_default_config_creates_eth_cd() {
        let registry = PoolRegistry::from_config(&LedgerConfig::default(), wallets()).unwrap();
        assert_eq!(registry.pool_names(), vec!["ETH-CD".to_string()]);

        let pool = registry.get("ETH-CD").unwrap();
        assert_eq!(pool.assets().base.symbol(), "ETH");
        assert_eq!(pool.assets().token.symbol(), "CD");
        assert_eq!(pool.fee(), FeeRate::DEFAULT);
    }

    #[test]
    fn test_unknown_and_duplicate_pools() {
        let registry = PoolRegistry::new(wallets());
        assert_eq!(registry.get("nope").unwrap_err(), LedgerError::UnknownPool("nope".into()));

        registry.create_pool(&PoolSettings::default()).unwrap();
        assert_eq!(
            registry.create_pool(&PoolSettings::default()).unwrap_err(),
            LedgerError::DuplicatePool("ETH-CD".into())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let registry = PoolRegistry::new(wallets());
        let settings = PoolSettings {
            fee_bps: 10_000,
            ..PoolSettings::default()
        };
        assert_eq!(
            registry.create_pool(&settings).unwrap_err(),
            LedgerError::Amm(AmmError::InvalidFee(10_000))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_asset_pair_rejected() {
        let registry = PoolRegistry::new(wallets());
        let settings = PoolSettings {
            name: "ETH-ETH".into(),
            token_symbol: "ETH".into(),
            ..PoolSettings::default()
        };
        assert!(matches!(
            registry.create_pool(&settings),
            Err(LedgerError::InvalidConfig(_))
        ));
        assert!(registry.is_empty());
        assert!(matches!(registry.get("ETH-ETH"), Err(LedgerError::UnknownPool(_))));
    }

    #[test]
    fn test_pools_are_independent() {
        let wallets = wallets();
        let mut config = LedgerConfig::default();
        config.pools.push(PoolSettings {
            name: "ETH-USDC".into(),
            token_symbol: "USDC".into(),
            fee_bps: 30,
            ..PoolSettings::default()
        });
        let registry = PoolRegistry::from_config(&config, wallets.clone()).unwrap();

        let owner = Address::from_bytes([9u8; 20]);
        for symbol in ["ETH", "CD", "USDC"] {
            wallets
                .credit(&owner, &crate::address::Asset::new(symbol), U256::from(10_000))
                .unwrap();
        }

        let cd = registry.get("ETH-CD").unwrap();
        let usdc = registry.get("ETH-USDC").unwrap();
        cd.add_liquidity(U256::from(500), U256::from(1000), &owner).unwrap();

        assert_eq!(cd.reserves(), (U256::from(1000), U256::from(500)));
        assert_eq!(usdc.reserves(), (U256::zero(), U256::zero()));
        assert_eq!(usdc.fee().bps(), 30);
    }
}
