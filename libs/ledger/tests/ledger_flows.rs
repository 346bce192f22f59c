//! End-to-end ledger flows: configuration → registry → operations → balances

use cdex_ledger::{
    Address, AmmError, Asset, Exchange, FeeRate, LedgerConfig, LedgerError, PoolAssets,
    PoolPhase, PoolRegistry, Wallets, U256,
};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn u(v: u64) -> U256 {
    U256::from(v)
}

fn owner(tag: u8) -> Address {
    Address::from_bytes([tag; 20])
}

fn init_logging() {
    let _ = cdex_config::init_tracing(&cdex_config::LoggingConfig {
        level: "cdex_ledger=debug".to_string(),
        json: false,
    });
}

/// Pool reserves plus all tracked wallet balances for one asset
fn total_supply(wallets: &Wallets, owners: &[Address], asset: &Asset, pool_reserve: U256) -> U256 {
    owners
        .iter()
        .fold(pool_reserve, |acc, o| acc + wallets.balance(o, asset))
}

#[test]
fn test_registry_from_toml_runs_reference_scenario() {
    init_logging();
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("ledger.toml");
    fs::write(
        &config_path,
        r#"
[logging]
level = "info"

[[pools]]
name = "ETH-CD"
base_symbol = "ETH"
token_symbol = "CD"
fee_bps = 100
"#,
    )
    .unwrap();

    let config = LedgerConfig::load(Some(&config_path)).unwrap();
    let wallets = Arc::new(Wallets::new());
    let registry = PoolRegistry::from_config(&config, wallets.clone()).unwrap();
    let pool = registry.get("ETH-CD").unwrap();
    let assets = pool.assets().clone();

    let (lp, trader) = (owner(1), owner(2));
    for o in [lp, trader] {
        wallets.credit(&o, &assets.base, u(10_000)).unwrap();
        wallets.credit(&o, &assets.token, u(10_000)).unwrap();
    }

    // Empty pool: shares == base sent, reserves take the full token offer
    assert_eq!(pool.add_liquidity(u(500), u(1000), &lp).unwrap(), u(1000));
    assert_eq!(pool.reserves(), (u(1000), u(500)));

    // 100 base requires floor(100*500/1000) = 50 tokens
    let err = pool.add_liquidity(u(40), u(100), &trader).unwrap_err();
    assert_eq!(
        err,
        LedgerError::Amm(AmmError::InsufficientTokenAmount {
            required: u(50),
            offered: u(40),
        })
    );

    // Drain, then reseed at (1000, 1000) for the swap example
    let drained = pool.remove_liquidity(u(1000), &lp).unwrap();
    assert_eq!(drained, (u(1000), u(500)));
    assert_eq!(pool.phase(), PoolPhase::Empty);
    pool.add_liquidity(u(1000), u(1000), &lp).unwrap();

    let err = pool.swap_base_for_token(u(100), u(91), &trader).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Amm(AmmError::InsufficientOutputAmount { .. })
    ));
    assert_eq!(pool.swap_base_for_token(u(100), u(90), &trader).unwrap(), u(90));
    assert_eq!(pool.reserves(), (u(1100), u(910)));
}

#[test]
fn test_value_is_conserved_across_operations() {
    let wallets = Arc::new(Wallets::new());
    let assets = PoolAssets::default();
    let pool = Exchange::new("ETH-CD", assets.clone(), FeeRate::DEFAULT, wallets.clone());
    let owners = [owner(1), owner(2), owner(3)];
    for o in &owners {
        wallets.credit(o, &assets.base, u(1_000_000)).unwrap();
        wallets.credit(o, &assets.token, u(1_000_000)).unwrap();
    }
    let base_total = u(3_000_000);
    let token_total = u(3_000_000);

    pool.add_liquidity(u(40_000), u(100_000), &owners[0]).unwrap();
    pool.add_liquidity(u(10_001), u(25_000), &owners[1]).unwrap();
    pool.swap_base_for_token(u(7_777), U256::zero(), &owners[2]).unwrap();
    pool.swap_token_for_base(u(3_333), U256::zero(), &owners[2]).unwrap();
    pool.remove_liquidity(u(12_345), &owners[0]).unwrap();
    // Rejected operations must not move anything either
    let _ = pool.swap_token_for_base(u(10), u(1_000_000), &owners[1]);
    let _ = pool.remove_liquidity(u(1), &owners[2]);

    let (reserve_base, reserve_token) = pool.reserves();
    assert_eq!(total_supply(&wallets, &owners, &assets.base, reserve_base), base_total);
    assert_eq!(total_supply(&wallets, &owners, &assets.token, reserve_token), token_total);

    let share_sum = pool
        .positions()
        .iter()
        .fold(U256::zero(), |acc, p| acc + p.shares);
    assert_eq!(share_sum, pool.total_shares());
}

#[test]
fn test_round_trip_deposit_never_profits() {
    let wallets = Arc::new(Wallets::new());
    let assets = PoolAssets::default();
    let pool = Exchange::new("ETH-CD", assets.clone(), FeeRate::DEFAULT, wallets.clone());
    let (lp, trader, tourist) = (owner(1), owner(2), owner(3));
    for o in [lp, trader, tourist] {
        wallets.credit(&o, &assets.base, u(1_000_000)).unwrap();
        wallets.credit(&o, &assets.token, u(1_000_000)).unwrap();
    }

    pool.add_liquidity(u(333_333), u(777_777), &lp).unwrap();
    pool.swap_token_for_base(u(12_345), U256::zero(), &trader).unwrap();

    let shares = pool.add_liquidity(u(1_000_000), u(1_001), &tourist).unwrap();
    pool.remove_liquidity(shares, &tourist).unwrap();

    assert!(wallets.balance(&tourist, &assets.base) <= u(1_000_000));
    assert!(wallets.balance(&tourist, &assets.token) <= u(1_000_000));
    assert_eq!(pool.share_of(&tourist), U256::zero());
}

#[test]
fn test_concurrent_swaps_serialize_per_pool() {
    let wallets = Arc::new(Wallets::new());
    let assets = PoolAssets::default();
    let pool = Arc::new(Exchange::new(
        "ETH-CD",
        assets.clone(),
        FeeRate::DEFAULT,
        wallets.clone(),
    ));

    let lp = owner(0);
    wallets.credit(&lp, &assets.base, u(10_000_000)).unwrap();
    wallets.credit(&lp, &assets.token, u(10_000_000)).unwrap();
    pool.add_liquidity(u(10_000_000), u(10_000_000), &lp).unwrap();

    let traders: Vec<Address> = (1..=8).map(owner).collect();
    for t in &traders {
        wallets.credit(t, &assets.base, u(100_000)).unwrap();
        wallets.credit(t, &assets.token, u(100_000)).unwrap();
    }

    let handles: Vec<_> = traders
        .iter()
        .copied()
        .enumerate()
        .map(|(i, trader)| {
            let pool = pool.clone();
            thread::spawn(move || {
                for round in 0..50u64 {
                    let amount = U256::from(100 + round + i as u64);
                    if (round + i as u64) % 2 == 0 {
                        pool.swap_base_for_token(amount, U256::zero(), &trader).unwrap();
                    } else {
                        pool.swap_token_for_base(amount, U256::zero(), &trader).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut everyone = traders.clone();
    everyone.push(lp);
    let (reserve_base, reserve_token) = pool.reserves();
    assert_eq!(
        total_supply(&wallets, &everyone, &assets.base, reserve_base),
        u(10_800_000)
    );
    assert_eq!(
        total_supply(&wallets, &everyone, &assets.token, reserve_token),
        u(10_800_000)
    );
    // Fees only ever grow the product
    assert!(reserve_base.full_mul(reserve_token) >= u(10_000_000).full_mul(u(10_000_000)));
}
