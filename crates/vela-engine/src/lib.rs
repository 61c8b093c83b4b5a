//! # Vela Engine
//!
//! Wires the price feed and rate curves together from an [`EngineConfig`].
//!
//! ```text
//! EngineConfig ──> Engine ──┬─> PriceFeed ──> OracleSource
//!                           └─> RateParamsRegistry ──> curve
//! ```

pub mod config;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use vela_common::{format_wad, MathError, RateCurveParams, Result, PRECISION, U256};
use vela_math::mul_div;
use vela_oracle::{Clock, OracleSource, PriceFeed, SystemClock};
use vela_rates::{get_borrow_rate, get_supply_rate, RateParamsRegistry, RateQuote};

pub use crate::config::EngineConfig;

/// Price feed plus rate registry built from one configuration
pub struct Engine {
    config: EngineConfig,
    feed: PriceFeed,
    rates: RateParamsRegistry,
}

impl Engine {
    /// Build an engine on the wall clock
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build an engine with an injected clock
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let feed = PriceFeed::new(clock)
            .with_timeout(config.oracle.timeout())
            .with_policies(config.oracle.default_policy(), config.oracle.fast_policy());

        let rates = RateParamsRegistry::new(config.rates.default.to_params()?)?;
        for (asset, params) in config.rates.asset_params()? {
            rates.set_interest_rate_params(&asset, params)?;
        }

        info!(
            custom_assets = rates.custom_assets().len(),
            native_asset = %config.oracle.native_asset_key,
            "Engine initialized"
        );

        Ok(Self { config, feed, rates })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn feed(&self) -> &PriceFeed {
        &self.feed
    }

    pub fn rates(&self) -> &RateParamsRegistry {
        &self.rates
    }

    /// Install the oracle collaborator
    pub fn attach_oracle(&self, source: Arc<dyn OracleSource>) -> Result<()> {
        Ok(self.feed.set_oracle(source)?)
    }

    /// Fresh price of the configured native asset
    pub async fn native_price(&self) -> Result<U256> {
        Ok(self.feed.get_fresh_price(&self.config.oracle.native_asset_key).await?)
    }

    /// Rates for `asset` at `points` evenly spaced utilizations from 0 to 1
    pub fn rate_table(&self, asset: &str, points: usize) -> Result<Vec<RateQuote>> {
        quote_curve(&self.rates.get_params(asset), points)
    }

    /// Tables for the default curve and every asset with custom parameters
    pub fn rate_report(&self, points: usize) -> Result<Vec<CurveReport>> {
        let default_params = self.rates.default_params();
        let mut report = vec![CurveReport::new(
            "default",
            false,
            &default_params,
            &quote_curve(&default_params, points)?,
        )?];
        for asset in self.rates.custom_assets() {
            let params = self.rates.get_params(&asset);
            report.push(CurveReport::new(&asset, true, &params, &quote_curve(&params, points)?)?);
        }
        Ok(report)
    }
}

fn quote_curve(params: &RateCurveParams, points: usize) -> Result<Vec<RateQuote>> {
    if points < 2 {
        return Err(MathError::invalid(format!("rate table needs at least 2 points, got {}", points)).into());
    }
    let last = U256::from(points - 1);
    let mut quotes = Vec::with_capacity(points);
    for i in 0..points {
        let utilization = mul_div(PRECISION, U256::from(i), last)?;
        let borrow_rate = get_borrow_rate(params, utilization)?;
        let supply_rate = get_supply_rate(utilization, borrow_rate, params.reserve_factor)?;
        quotes.push(RateQuote {
            utilization,
            borrow_rate,
            supply_rate,
        });
    }
    Ok(quotes)
}

/// Human-readable rate table for one curve
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    pub asset: String,
    pub custom: bool,
    /// Borrow rate at the kink
    pub kink_rate: String,
    /// Borrow rate at 100% utilization
    pub max_borrow_rate: String,
    pub rows: Vec<RateRow>,
}

impl CurveReport {
    fn new(asset: &str, custom: bool, params: &RateCurveParams, quotes: &[RateQuote]) -> Result<Self> {
        let kink_rate = params.rate_at_kink().ok_or(MathError::Overflow)?;
        let max_borrow_rate = params.rate_at_full_utilization().ok_or(MathError::Overflow)?;
        Ok(Self {
            asset: asset.to_string(),
            custom,
            kink_rate: format_wad(kink_rate),
            max_borrow_rate: format_wad(max_borrow_rate),
            rows: quotes.iter().map(RateRow::from).collect(),
        })
    }
}

/// One row of a rate table, values rendered as decimals
#[derive(Debug, Clone, Serialize)]
pub struct RateRow {
    pub utilization: String,
    pub borrow_rate: String,
    pub supply_rate: String,
    pub borrow_rate_per_second: String,
    pub supply_rate_per_second: String,
}

impl From<&RateQuote> for RateRow {
    fn from(quote: &RateQuote) -> Self {
        Self {
            utilization: format_wad(quote.utilization),
            borrow_rate: format_wad(quote.borrow_rate),
            supply_rate: format_wad(quote.supply_rate),
            borrow_rate_per_second: format_wad(quote.borrow_rate_per_second()),
            supply_rate_per_second: format_wad(quote.supply_rate_per_second()),
        }
    }
}
