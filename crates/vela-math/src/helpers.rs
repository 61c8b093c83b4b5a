//! Comparison and interpolation helpers

use vela_common::{MathError, PRECISION, U256};

use crate::fixed_point::mul_wad;
use crate::MathResult;

#[inline]
pub fn min(a: U256, b: U256) -> U256 {
    a.min(b)
}

#[inline]
pub fn max(a: U256, b: U256) -> U256 {
    a.max(b)
}

/// Bound `value` to `[lower, upper]`; fails if the bounds are inverted
pub fn clamp(value: U256, lower: U256, upper: U256) -> MathResult<U256> {
    if lower > upper {
        return Err(MathError::invalid(format!(
            "lower bound {} exceeds upper bound {}",
            lower, upper
        )));
    }
    Ok(value.max(lower).min(upper))
}

/// `|a - b|`
#[inline]
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Whether `a` and `b` differ by at most `tolerance`
#[inline]
pub fn approx_equal(a: U256, b: U256, tolerance: U256) -> bool {
    abs_diff(a, b) <= tolerance
}

/// Linear interpolation `a + (b - a) * t` for `t` in `[0, 1]`.
///
/// Works in either direction; fails if `t > PRECISION`.
pub fn lerp(a: U256, b: U256, t: U256) -> MathResult<U256> {
    if t > PRECISION {
        return Err(MathError::invalid(format!(
            "interpolation factor {} exceeds 1.0",
            t
        )));
    }
    if b >= a {
        Ok(a + mul_wad(b - a, t)?)
    } else {
        Ok(a - mul_wad(a - b, t)?)
    }
}
