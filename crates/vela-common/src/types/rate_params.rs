//! Rate curve parameters - kinked two-slope utilization model
//!
//! ```text
//! u <  kink: rate = base + slope1 * u / kink
//! u >= kink: rate = base + slope1 + slope2 * (u - kink) / (1 - kink)
//! ```
//!
//! All fields are 18-decimal fixed point annual rates or ratios.

use rust_decimal::Decimal;

use crate::error::RateError;
use crate::types::wad::{parse_decimal, U256};
use crate::PRECISION;

/// Interest-rate curve parameters for one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCurveParams {
    /// Borrow rate at zero utilization
    pub base_rate: U256,
    /// Rate increase accumulated from zero utilization up to the kink
    pub slope1: U256,
    /// Rate increase accumulated from the kink up to full utilization
    pub slope2: U256,
    /// Optimal utilization where the curve steepens
    pub kink: U256,
    /// Share of borrower interest retained by the protocol
    pub reserve_factor: U256,
}

impl RateCurveParams {
    pub fn new(
        base_rate: U256,
        slope1: U256,
        slope2: U256,
        kink: U256,
        reserve_factor: U256,
    ) -> Self {
        Self {
            base_rate,
            slope1,
            slope2,
            kink,
            reserve_factor,
        }
    }

    /// Build parameters from human decimals such as `0.02`
    pub fn from_decimals(
        base_rate: Decimal,
        slope1: Decimal,
        slope2: Decimal,
        kink: Decimal,
        reserve_factor: Decimal,
    ) -> Result<Self, RateError> {
        let params = Self::new(
            parse_decimal(base_rate)?,
            parse_decimal(slope1)?,
            parse_decimal(slope2)?,
            parse_decimal(kink)?,
            parse_decimal(reserve_factor)?,
        );
        params.validate()?;
        Ok(params)
    }

    /// Check structural soundness.
    ///
    /// The kink must sit strictly inside `(0, 1)` so neither segment divides
    /// by zero, and the reserve factor cannot exceed 100%.
    pub fn validate(&self) -> Result<(), RateError> {
        if self.kink.is_zero() || self.kink >= PRECISION {
            return Err(RateError::InvalidParams(format!(
                "kink must be in (0, 1), got {}",
                self.kink
            )));
        }
        if self.reserve_factor > PRECISION {
            return Err(RateError::InvalidParams(format!(
                "reserve factor must be <= 1, got {}",
                self.reserve_factor
            )));
        }
        Ok(())
    }

    /// Borrow rate reached exactly at the kink
    pub fn rate_at_kink(&self) -> Option<U256> {
        self.base_rate.checked_add(self.slope1)
    }

    /// Borrow rate reached at 100% utilization
    pub fn rate_at_full_utilization(&self) -> Option<U256> {
        self.rate_at_kink()?.checked_add(self.slope2)
    }
}

impl Default for RateCurveParams {
    fn default() -> Self {
        Self {
            base_rate: U256::from(20_000_000_000_000_000u64),
            slope1: U256::from(80_000_000_000_000_000u64),
            slope2: U256::from(2_500_000_000_000_000_000u64),
            kink: U256::from(800_000_000_000_000_000u64),
            reserve_factor: U256::from(100_000_000_000_000_000u64),
        }
    }
}
