//! End-to-end flows through the engine facade

use std::sync::Arc;

use vela_common::{wad, OracleError, RateError, VelaError, PRECISION, U256};
use vela_engine::{Engine, EngineConfig};
use vela_oracle::{InMemoryOracle, ManualClock};

const NOW: u64 = 1_700_000_000;

const CONFIG: &str = r#"
[oracle]
timeout_ms = 1000
default_max_age_secs = 3600
fast_max_age_secs = 5
native_asset_key = "STT/USD"

[rates.default]
base_rate = "0.02"
slope1 = "0.08"
slope2 = "2.5"
kink = "0.8"
reserve_factor = "0.1"

[[rates.assets]]
asset = "BTC/USD"
base_rate = "0.01"
slope1 = "0.04"
slope2 = "1.0"
kink = "0.5"
reserve_factor = "0.2"
"#;

fn build() -> (Engine, Arc<InMemoryOracle>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    let oracle = Arc::new(InMemoryOracle::new());
    let engine = Engine::with_clock(EngineConfig::from_toml_str(CONFIG).unwrap(), clock.clone()).unwrap();
    engine.attach_oracle(oracle.clone()).unwrap();
    (engine, oracle, clock)
}

fn percent(value: u64) -> U256 {
    U256::from(value) * U256::exp10(16)
}

#[tokio::test]
async fn test_price_then_staleness() {
    let (engine, oracle, clock) = build();
    oracle.set_value("BTC/USD", 5_000_000_000, NOW as u128);

    let (price, fresh) = engine
        .feed()
        .get_price_if_not_older_than("BTC/USD", 3_600)
        .await
        .unwrap();
    assert_eq!(price, wad(50));
    assert!(fresh);

    clock.advance(3_601);
    let (price, fresh) = engine
        .feed()
        .get_price_if_not_older_than("BTC/USD", 3_600)
        .await
        .unwrap();
    assert_eq!(price, U256::zero());
    assert!(!fresh);
}

#[tokio::test]
async fn test_native_price() {
    let (engine, oracle, clock) = build();
    oracle.set_value("STT/USD", 25_000_000, (NOW - 10) as u128);

    // 0.25 at 8 decimals
    assert_eq!(engine.native_price().await.unwrap(), PRECISION / 4u64);

    clock.advance(3_600);
    let err = engine.native_price().await.unwrap_err();
    assert!(matches!(
        err,
        VelaError::Oracle(OracleError::PriceTooOld { age: 3_610, max_age: 3_600 })
    ));
}

#[tokio::test]
async fn test_oracle_attached_once() {
    let (engine, _, _) = build();
    let err = engine.attach_oracle(Arc::new(InMemoryOracle::new())).unwrap_err();
    assert!(matches!(err, VelaError::Oracle(OracleError::AlreadyConfigured)));
}

#[tokio::test]
async fn test_batch_alignment() {
    let (engine, oracle, _) = build();
    oracle.set_value("ETH/USD", 300_000_000_000, (NOW - 100) as u128);
    oracle.set_value("BTC/USD", 6_000_000_000_000, (NOW - 1) as u128);

    let keys = ["ETH/USD", "BTC/USD"];
    let (prices, all_fresh) = engine.feed().get_batch_fresh_prices(&keys, 60).await.unwrap();
    assert_eq!(prices, vec![U256::zero(), wad(60_000)]);
    assert!(!all_fresh);

    let (prices, timestamps) = engine.feed().get_batch_prices(&keys).await.unwrap();
    assert_eq!(prices, vec![wad(3_000), wad(60_000)]);
    assert_eq!(timestamps, vec![NOW - 100, NOW - 1]);
}

#[test]
fn test_configured_curves() {
    let (engine, _, _) = build();
    let rates = engine.rates();
    assert!(rates.has_custom_params("BTC/USD"));
    assert!(!rates.has_custom_params("ETH/USD"));

    // default curve at its kink: 2% + 8%
    let eth = rates.calculate_rates("ETH/USD", wad(100), wad(80)).unwrap();
    assert_eq!(eth.borrow_rate, percent(10));

    // custom curve at its kink: 1% + 4%, supply 5% * 50% * 80% = 2%
    let btc = rates.calculate_rates("BTC/USD", wad(100), wad(50)).unwrap();
    assert_eq!(btc.borrow_rate, percent(5));
    assert_eq!(btc.supply_rate, percent(2));
}

#[test]
fn test_runtime_parameter_updates() {
    let (engine, _, _) = build();
    let rates = engine.rates();

    let removed = rates.remove_custom_params("BTC/USD").unwrap();
    assert_eq!(removed.kink, PRECISION / 2u64);
    assert_eq!(
        rates.remove_custom_params("BTC/USD"),
        Err(RateError::AssetNotFound("BTC/USD".to_string()))
    );

    let btc = rates.calculate_rates_at("BTC/USD", wad(8) / 10u64).unwrap();
    assert_eq!(btc.borrow_rate, percent(10));
}

#[test]
fn test_rate_report() {
    let (engine, _, _) = build();
    let report = engine.rate_report(3).unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].asset, "default");
    assert!(!report[0].custom);
    assert_eq!(report[1].asset, "BTC/USD");
    assert!(report[1].custom);

    // 0.0, 0.5, 1.0 on the custom curve; 0.5 is its kink
    let rows = &report[1].rows;
    assert_eq!(rows[1].utilization, "0.500000000000000000");
    assert_eq!(rows[1].borrow_rate, "0.050000000000000000");
    assert_eq!(rows[2].borrow_rate, "1.050000000000000000");
    assert_eq!(report[1].max_borrow_rate, rows[2].borrow_rate);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json[1]["asset"], "BTC/USD");
}
