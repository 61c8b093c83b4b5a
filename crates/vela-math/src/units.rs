//! Unit conversions: basis points and rate annualization

use vela_common::{MathError, BPS, PRECISION, U256};

use crate::fixed_point::{mul_div, pow};
use crate::transcendental::{exp, ln};
use crate::MathResult;

/// Basis points (10^4 scale) to fixed point
pub fn bps_to_decimal(bps: U256) -> MathResult<U256> {
    mul_div(bps, PRECISION, U256::from(BPS))
}

/// Fixed point to basis points, truncated
pub fn decimal_to_bps(value: U256) -> MathResult<U256> {
    mul_div(value, U256::from(BPS), PRECISION)
}

/// `(1 + period_rate) ^ periods_per_year - 1`
pub fn annualize_rate(period_rate: U256, periods_per_year: u64) -> MathResult<U256> {
    if periods_per_year == 0 {
        return Err(MathError::DivisionByZero);
    }
    let growth = PRECISION
        .checked_add(period_rate)
        .ok_or(MathError::Overflow)?;
    Ok(pow(growth, periods_per_year)? - PRECISION)
}

/// Inverse of [`annualize_rate`]: `(1 + annual_rate) ^ (1 / periods_per_year) - 1`.
///
/// The root is taken as `exp(ln(1 + r) / n)`, so the result carries the
/// `ln`/`exp` tolerance.
pub fn deannualize_rate(annual_rate: U256, periods_per_year: u64) -> MathResult<U256> {
    if periods_per_year == 0 {
        return Err(MathError::DivisionByZero);
    }
    let growth = PRECISION
        .checked_add(annual_rate)
        .ok_or(MathError::Overflow)?;
    // growth >= 1.0, so the logarithm is non-negative
    let log = ln(growth)?.unsigned_abs();
    let per_period = U256::from(log / periods_per_year as u128);
    Ok(exp(per_period)?.saturating_sub(PRECISION))
}
