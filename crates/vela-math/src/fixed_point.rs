//! Core fixed-point primitives
//!
//! Products are formed in [`U512`] so `a * b` never wraps, then divided and
//! narrowed back to [`U256`]. A quotient that does not fit is an
//! [`MathError::Overflow`], never a truncated value.

use vela_common::{MathError, PRECISION, U256, U512};

use crate::MathResult;

/// Compute `a * b / c` with a 512-bit intermediate product.
///
/// Fails with [`MathError::DivisionByZero`] when `c == 0` and with
/// [`MathError::Overflow`] when the quotient exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, c: U256) -> MathResult<U256> {
    if c.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if a.is_zero() || b.is_zero() {
        return Ok(U256::zero());
    }

    let product = U512::from(a) * U512::from(b);
    U256::try_from(product / U512::from(c))
}

/// Fixed-point multiply: `a * b / PRECISION`
#[inline]
pub fn mul_wad(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, b, PRECISION)
}

/// Fixed-point divide: `a * PRECISION / b`
#[inline]
pub fn div_wad(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, PRECISION, b)
}

/// Floor integer square root by Newton's method.
///
/// Starts from `(x + 1) / 2` and iterates `z = (x / z + z) / 2` until the
/// estimate stops decreasing.
pub fn sqrt(x: U256) -> U256 {
    if x.is_zero() {
        return U256::zero();
    }

    // (x + 1) / 2 without overflowing at U256::MAX
    let mut z = (x >> 1usize) + (x & U256::one());
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) >> 1usize;
    }
    y
}

/// Fixed-point square root: `sqrt(x) * sqrt(PRECISION)`.
///
/// Values too large to be pre-scaled fall back to `sqrt(x) * 10^9`, which
/// drops the lowest nine fractional digits.
pub fn sqrt_wad(x: U256) -> U256 {
    match x.checked_mul(PRECISION) {
        Some(scaled) => sqrt(scaled),
        None => sqrt(x) * U256::exp10(9),
    }
}

/// Raise a fixed-point `base` to a plain integer `exponent` by squaring.
///
/// `pow(base, 0) == PRECISION` for every base, including zero.
pub fn pow(base: U256, exponent: u64) -> MathResult<U256> {
    let mut result = PRECISION;
    let mut factor = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = mul_wad(result, factor)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            factor = mul_wad(factor, factor)?;
        }
    }

    Ok(result)
}

/// `principal * (1 + rate_per_period) ^ periods`
pub fn compound_interest(principal: U256, rate_per_period: U256, periods: u64) -> MathResult<U256> {
    let growth = PRECISION
        .checked_add(rate_per_period)
        .ok_or(MathError::Overflow)?;
    mul_wad(principal, pow(growth, periods)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vela_common::{wad, HALF_PRECISION};

    #[test]
    fn test_mul_div_basic() {
        // 2 * 3 / 6 = 1
        assert_eq!(mul_div(wad(2), wad(3), wad(6)).unwrap(), PRECISION);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // a * b overflows 256 bits but the quotient fits
        let a = U256::MAX;
        let b = U256::from(4u64);
        assert_eq!(mul_div(a, b, U256::from(8u64)).unwrap(), U256::MAX / 2u64);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(
            mul_div(wad(1), wad(1), U256::zero()),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            mul_div(U256::MAX, U256::MAX, U256::one()),
            Err(MathError::Overflow)
        );
        assert_eq!(mul_div(U256::zero(), wad(5), wad(1)).unwrap(), U256::zero());
    }

    #[test]
    fn test_mul_wad_div_wad() {
        assert_eq!(mul_wad(wad(3), wad(1) / 2u64).unwrap(), wad(3) / 2u64);
        assert_eq!(div_wad(wad(3), wad(2)).unwrap(), wad(3) / 2u64);
        assert_eq!(div_wad(wad(1), U256::zero()), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_sqrt_values() {
        assert_eq!(sqrt(U256::zero()), U256::zero());
        assert_eq!(sqrt(U256::one()), U256::one());
        assert_eq!(sqrt(U256::from(15u64)), U256::from(3u64));
        assert_eq!(sqrt(U256::from(16u64)), U256::from(4u64));
        assert_eq!(sqrt(U256::MAX), U256::from(u128::MAX));
    }

    #[test]
    fn test_sqrt_wad_perfect_square() {
        assert_eq!(sqrt_wad(wad(4)), wad(2));
        assert_eq!(sqrt_wad(PRECISION), PRECISION);
        // sqrt(0.25) = 0.5
        assert_eq!(sqrt_wad(wad(1) / 4u64), HALF_PRECISION);
    }

    #[test]
    fn test_pow_identities() {
        assert_eq!(pow(wad(7), 0).unwrap(), PRECISION);
        assert_eq!(pow(U256::zero(), 0).unwrap(), PRECISION);
        assert_eq!(pow(U256::zero(), 3).unwrap(), U256::zero());
        assert_eq!(pow(PRECISION, 1_000_000).unwrap(), PRECISION);
        assert_eq!(pow(wad(2), 10).unwrap(), wad(1024));
        assert_eq!(pow(wad(1) / 2u64, 2).unwrap(), wad(1) / 4u64);
    }

    #[test]
    fn test_pow_overflow() {
        assert_eq!(pow(wad(10), 80), Err(MathError::Overflow));
    }

    #[test]
    fn test_compound_interest() {
        // 100 at 10% for 2 periods = 121
        let rate = wad(1) / 10u64;
        assert_eq!(compound_interest(wad(100), rate, 2).unwrap(), wad(121));
        assert_eq!(compound_interest(wad(100), rate, 0).unwrap(), wad(100));
    }

    proptest! {
        #[test]
        fn prop_sqrt_is_floor(x in any::<u128>()) {
            let x = U256::from(x);
            let root = sqrt(x);
            prop_assert!(root * root <= x);
            let next = root + U256::one();
            prop_assert!(next * next > x);
        }

        #[test]
        fn prop_mul_div_wad_round_trip(a in 1u128..=u64::MAX as u128 * 1_000, b_units in 1u64..1_000_000) {
            let a = U256::from(a);
            let b = wad(b_units);
            let back = div_wad(mul_wad(a, b).unwrap(), b).unwrap();
            let diff = if back > a { back - a } else { a - back };
            prop_assert!(diff <= U256::one());
        }

        #[test]
        fn prop_pow_of_one_is_one(n in any::<u64>()) {
            prop_assert_eq!(pow(PRECISION, n).unwrap(), PRECISION);
        }
    }
}
