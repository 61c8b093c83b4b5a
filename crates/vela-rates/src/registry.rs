//! Per-asset rate parameters
//!
//! Assets without custom parameters resolve to the default curve. Reads are
//! lock-free on the custom map; the default sits behind a single coarse lock.

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info};
use vela_common::{RateCurveParams, RateError, U256};

use crate::curve::{
    get_borrow_rate, get_supply_rate, get_utilization_rate, per_second_rate, RateResult,
};

/// Borrow and supply rates at one utilization point, annualized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuote {
    pub utilization: U256,
    pub borrow_rate: U256,
    pub supply_rate: U256,
}

impl RateQuote {
    pub fn borrow_rate_per_second(&self) -> U256 {
        per_second_rate(self.borrow_rate)
    }

    pub fn supply_rate_per_second(&self) -> U256 {
        per_second_rate(self.supply_rate)
    }
}

/// Custom-vs-default parameter store
#[derive(Debug)]
pub struct RateParamsRegistry {
    default_params: RwLock<RateCurveParams>,
    custom: DashMap<String, RateCurveParams>,
}

impl RateParamsRegistry {
    /// Create a registry with a validated default curve
    pub fn new(default_params: RateCurveParams) -> RateResult<Self> {
        default_params.validate()?;
        Ok(Self {
            default_params: RwLock::new(default_params),
            custom: DashMap::new(),
        })
    }

    pub fn has_custom_params(&self, asset: &str) -> bool {
        self.custom.contains_key(asset)
    }

    /// Install or replace custom parameters for `asset`
    pub fn set_interest_rate_params(&self, asset: &str, params: RateCurveParams) -> RateResult<()> {
        if asset.is_empty() {
            return Err(RateError::InvalidParams("asset key must not be empty".to_string()));
        }
        params.validate()?;
        let replaced = self.custom.insert(asset.to_string(), params).is_some();
        info!(asset, replaced, "Custom rate parameters set");
        Ok(())
    }

    /// Drop custom parameters so `asset` falls back to the default curve
    pub fn remove_custom_params(&self, asset: &str) -> RateResult<RateCurveParams> {
        let (_, params) = self
            .custom
            .remove(asset)
            .ok_or_else(|| RateError::AssetNotFound(asset.to_string()))?;
        info!(asset, "Custom rate parameters removed");
        Ok(params)
    }

    /// Replace the default curve used by every asset without custom params
    pub fn update_default_params(&self, params: RateCurveParams) -> RateResult<()> {
        params.validate()?;
        *self.default_params.write() = params;
        info!("Default rate parameters updated");
        Ok(())
    }

    pub fn default_params(&self) -> RateCurveParams {
        *self.default_params.read()
    }

    /// Effective parameters for `asset`
    pub fn get_params(&self, asset: &str) -> RateCurveParams {
        match self.custom.get(asset) {
            Some(entry) => *entry.value(),
            None => self.default_params(),
        }
    }

    /// Assets with custom parameters, sorted
    pub fn custom_assets(&self) -> Vec<String> {
        let mut assets: Vec<String> = self.custom.iter().map(|e| e.key().clone()).collect();
        assets.sort();
        assets
    }

    /// Rates for `asset` given its market totals
    pub fn calculate_rates(&self, asset: &str, total_supply: U256, total_borrow: U256) -> RateResult<RateQuote> {
        let utilization = get_utilization_rate(total_supply, total_borrow)?;
        self.calculate_rates_at(asset, utilization)
    }

    /// Rates for `asset` at an explicit utilization
    pub fn calculate_rates_at(&self, asset: &str, utilization: U256) -> RateResult<RateQuote> {
        let params = self.get_params(asset);
        let borrow_rate = get_borrow_rate(&params, utilization)?;
        let supply_rate = get_supply_rate(utilization, borrow_rate, params.reserve_factor)?;
        debug!(asset, %utilization, %borrow_rate, %supply_rate, "Rates calculated");

        Ok(RateQuote {
            utilization,
            borrow_rate,
            supply_rate,
        })
    }
}

impl Default for RateParamsRegistry {
    fn default() -> Self {
        Self {
            default_params: RwLock::new(RateCurveParams::default()),
            custom: DashMap::new(),
        }
    }
}
