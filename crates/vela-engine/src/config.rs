//! Engine configuration
//!
//! Layered as: built-in defaults, an optional TOML file, then `VELA__*`
//! environment variables (`VELA__ORACLE__TIMEOUT_MS=500`). A `.env` file in
//! the working directory is read first.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use vela_common::{
    RateCurveParams, RateError, Result, StalenessPolicy, VelaError, DEFAULT_MAX_PRICE_AGE_SECS,
    DEFAULT_ORACLE_TIMEOUT_MS, FAST_FINALITY_MAX_AGE_SECS, NATIVE_ASSET_KEY,
};

/// Vela engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Oracle feed settings
    pub oracle: OracleSettings,
    /// Interest-rate curve settings
    pub rates: RateSettings,
}

impl EngineConfig {
    /// Load configuration from `.env`, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("VELA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        info!(
            timeout_ms = cfg.oracle.timeout_ms,
            custom_assets = cfg.rates.assets.len(),
            "Loaded configuration"
        );
        Ok(cfg)
    }

    /// Parse configuration from TOML text alone, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let cfg: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints and that every curve is valid
    pub fn validate(&self) -> Result<()> {
        let oracle = &self.oracle;
        if oracle.timeout_ms == 0 {
            return Err(VelaError::Config("oracle.timeout_ms must be positive".to_string()));
        }
        if oracle.fast_max_age_secs > oracle.default_max_age_secs {
            return Err(VelaError::Config(format!(
                "oracle.fast_max_age_secs ({}) exceeds default_max_age_secs ({})",
                oracle.fast_max_age_secs, oracle.default_max_age_secs
            )));
        }
        if oracle.native_asset_key.is_empty() {
            return Err(VelaError::Config("oracle.native_asset_key must not be empty".to_string()));
        }

        self.rates.default.to_params()?;
        self.rates.asset_params()?;
        Ok(())
    }
}

/// Oracle feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Timeout for one oracle lookup in milliseconds
    pub timeout_ms: u64,
    /// Threshold for `get_fresh_price`
    pub default_max_age_secs: u64,
    /// Threshold for `get_fast_price`
    pub fast_max_age_secs: u64,
    /// Price key of the network's native asset
    pub native_asset_key: String,
}

impl OracleSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn default_policy(&self) -> StalenessPolicy {
        StalenessPolicy::new(self.default_max_age_secs)
    }

    pub fn fast_policy(&self) -> StalenessPolicy {
        StalenessPolicy::new(self.fast_max_age_secs)
    }
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            default_max_age_secs: DEFAULT_MAX_PRICE_AGE_SECS,
            fast_max_age_secs: FAST_FINALITY_MAX_AGE_SECS,
            native_asset_key: NATIVE_ASSET_KEY.to_string(),
        }
    }
}

/// Rate curve settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSettings {
    /// Curve for assets without their own entry
    pub default: CurveSettings,
    /// Per-asset curves
    pub assets: Vec<AssetCurveSettings>,
}

impl RateSettings {
    /// Parsed per-asset curves in file order.
    ///
    /// Empty and duplicate asset keys are rejected.
    pub fn asset_params(&self) -> Result<Vec<(String, RateCurveParams)>> {
        let mut seen = HashSet::new();
        let mut parsed = Vec::with_capacity(self.assets.len());
        for entry in &self.assets {
            if entry.asset.is_empty() {
                return Err(VelaError::Config("rates.assets entry without asset key".to_string()));
            }
            if !seen.insert(entry.asset.as_str()) {
                return Err(VelaError::Config(format!(
                    "duplicate rate curve for asset {}",
                    entry.asset
                )));
            }
            parsed.push((entry.asset.clone(), entry.curve.to_params()?));
        }
        Ok(parsed)
    }
}

/// Curve parameters as human decimals (`0.02` is 2%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub base_rate: Decimal,
    pub slope1: Decimal,
    pub slope2: Decimal,
    pub kink: Decimal,
    pub reserve_factor: Decimal,
}

impl CurveSettings {
    pub fn to_params(&self) -> std::result::Result<RateCurveParams, RateError> {
        RateCurveParams::from_decimals(
            self.base_rate,
            self.slope1,
            self.slope2,
            self.kink,
            self.reserve_factor,
        )
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            base_rate: Decimal::new(2, 2),
            slope1: Decimal::new(8, 2),
            slope2: Decimal::new(25, 1),
            kink: Decimal::new(8, 1),
            reserve_factor: Decimal::new(1, 1),
        }
    }
}

/// Curve override for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCurveSettings {
    /// Asset key, e.g. `BTC/USD`
    pub asset: String,
    #[serde(flatten)]
    pub curve: CurveSettings,
}
