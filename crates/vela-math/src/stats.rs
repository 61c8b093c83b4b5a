//! Population statistics over fixed-point series
//!
//! Used for portfolio risk reporting. Inputs are 18-decimal fixed-point
//! values; signed outputs are `i128` fixed point. Deviations below `1e-9`
//! lose precision when squared, so near-constant series may report a zero
//! standard deviation and fail with [`MathError::DivisionByZero`] where it is
//! used as a divisor.

use vela_common::{to_signed, MathError, PRECISION, U256};

use crate::fixed_point::{div_wad, mul_wad, sqrt_wad};
use crate::MathResult;

/// Running sum of signed fixed-point magnitudes
#[derive(Debug, Default, Clone, Copy)]
struct SignedSum {
    positive: U256,
    negative: U256,
}

impl SignedSum {
    fn add(&mut self, is_negative: bool, magnitude: U256) -> MathResult<()> {
        let slot = if is_negative {
            &mut self.negative
        } else {
            &mut self.positive
        };
        *slot = slot.checked_add(magnitude).ok_or(MathError::Overflow)?;
        Ok(())
    }

    /// `(is_negative, magnitude)` of the net sum
    fn net(&self) -> (bool, U256) {
        if self.negative > self.positive {
            (true, self.negative - self.positive)
        } else {
            (false, self.positive - self.negative)
        }
    }
}

fn apply_sign(is_negative: bool, magnitude: U256) -> MathResult<i128> {
    let value = to_signed(magnitude)?;
    Ok(if is_negative { -value } else { value })
}

fn checked_sum(values: &[U256]) -> MathResult<U256> {
    values.iter().try_fold(U256::zero(), |acc, v| {
        acc.checked_add(*v).ok_or(MathError::Overflow)
    })
}

/// Signed deviation `value - center` as `(is_negative, magnitude)`
fn deviation(value: U256, center: U256) -> (bool, U256) {
    if value < center {
        (true, center - value)
    } else {
        (false, value - center)
    }
}

/// Arithmetic mean, truncated
pub fn mean(values: &[U256]) -> MathResult<U256> {
    if values.is_empty() {
        return Err(MathError::invalid("mean of an empty series"));
    }
    Ok(checked_sum(values)? / U256::from(values.len()))
}

/// `sum(values[i] * weights[i]) / sum(weights)`.
///
/// Weights may use any scale as long as it is consistent.
pub fn weighted_average(values: &[U256], weights: &[U256]) -> MathResult<U256> {
    if values.is_empty() || values.len() != weights.len() {
        return Err(MathError::invalid(format!(
            "expected equal non-empty lengths, got {} values and {} weights",
            values.len(),
            weights.len()
        )));
    }

    let total_weight = checked_sum(weights)?;
    if total_weight.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let weighted = values
        .iter()
        .zip(weights)
        .try_fold(U256::zero(), |acc, (value, weight)| {
            let product = value.checked_mul(*weight).ok_or(MathError::Overflow)?;
            acc.checked_add(product).ok_or(MathError::Overflow)
        })?;

    Ok(weighted / total_weight)
}

/// Relative change `(new - old) / old` as signed fixed point (0.25e18 = +25%)
pub fn percentage_change(old: U256, new: U256) -> MathResult<i128> {
    if old.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (is_negative, diff) = deviation(new, old);
    apply_sign(is_negative, div_wad(diff, old)?)
}

/// Simple moving averages over every full window.
///
/// Returns `values.len() - window + 1` truncated means.
pub fn moving_average(values: &[U256], window: usize) -> MathResult<Vec<U256>> {
    if window == 0 || window > values.len() {
        return Err(MathError::invalid(format!(
            "window {} out of range for {} values",
            window,
            values.len()
        )));
    }

    let divisor = U256::from(window);
    let mut running = checked_sum(&values[..window])?;
    let mut averages = Vec::with_capacity(values.len() - window + 1);
    averages.push(running / divisor);

    for i in window..values.len() {
        running = running
            .checked_add(values[i])
            .ok_or(MathError::Overflow)?
            - values[i - window];
        averages.push(running / divisor);
    }

    Ok(averages)
}

/// Population variance
pub fn variance(values: &[U256]) -> MathResult<U256> {
    let center = mean(values)?;
    let mut squares = U256::zero();
    for value in values {
        let (_, diff) = deviation(*value, center);
        squares = squares
            .checked_add(mul_wad(diff, diff)?)
            .ok_or(MathError::Overflow)?;
    }
    Ok(squares / U256::from(values.len()))
}

/// Population standard deviation
pub fn standard_deviation(values: &[U256]) -> MathResult<U256> {
    Ok(sqrt_wad(variance(values)?))
}

/// `(mean(returns) - risk_free_rate) / stddev(returns)`, signed
pub fn sharpe_ratio(returns: &[U256], risk_free_rate: U256) -> MathResult<i128> {
    let average = mean(returns)?;
    let spread = standard_deviation(returns)?;
    if spread.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (is_negative, excess) = deviation(average, risk_free_rate);
    apply_sign(is_negative, div_wad(excess, spread)?)
}

/// Pearson correlation in `[-1, 1]` fixed point
pub fn correlation(x: &[U256], y: &[U256]) -> MathResult<i128> {
    if x.is_empty() || x.len() != y.len() {
        return Err(MathError::invalid(format!(
            "expected equal non-empty lengths, got {} and {}",
            x.len(),
            y.len()
        )));
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut covariance = SignedSum::default();
    let mut sum_xx = U256::zero();
    let mut sum_yy = U256::zero();
    for (xi, yi) in x.iter().zip(y) {
        let (neg_x, dx) = deviation(*xi, mean_x);
        let (neg_y, dy) = deviation(*yi, mean_y);
        covariance.add(neg_x != neg_y, mul_wad(dx, dy)?)?;
        sum_xx = sum_xx.checked_add(mul_wad(dx, dx)?).ok_or(MathError::Overflow)?;
        sum_yy = sum_yy.checked_add(mul_wad(dy, dy)?).ok_or(MathError::Overflow)?;
    }

    let denominator = mul_wad(sqrt_wad(sum_xx), sqrt_wad(sum_yy))?;
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let (is_negative, magnitude) = covariance.net();
    // rounding can push |r| a hair past 1
    let r = div_wad(magnitude, denominator)?.min(PRECISION);
    apply_sign(is_negative, r)
}

/// Historical value at risk.
///
/// Sorts `returns` ascending and takes the element at the
/// `(100 - confidence_level)` percentile index. The result is the loss
/// magnitude: a negative return `-r` yields `r`, a non-negative one yields 0.
pub fn calculate_var(returns: &[i128], confidence_level: u8) -> MathResult<U256> {
    if confidence_level >= 100 {
        return Err(MathError::invalid(format!(
            "confidence level must be below 100, got {}",
            confidence_level
        )));
    }
    if returns.is_empty() {
        return Err(MathError::invalid("value at risk of an empty series"));
    }

    let mut sorted = returns.to_vec();
    sorted.sort_unstable();

    let tail = (100 - confidence_level) as usize;
    let index = (sorted.len() * tail / 100).min(sorted.len() - 1);

    let selected = sorted[index];
    Ok(if selected < 0 {
        U256::from(selected.unsigned_abs())
    } else {
        U256::zero()
    })
}
