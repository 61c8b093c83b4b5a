//! Logarithm, exponent and factorial
//!
//! ```text
//! ln(x)  = k * ln(2) + 2 * atanh((y - 1) / (y + 1)),   x = y * 2^k, y in [1, 2)
//! exp(x) = e^n * sum_{i < 15} f^i / i!,                 x = n + f, f in [0, 1)
//! ```
//!
//! With `y` in `[1, 2)` the `atanh` argument stays below 1/3, so 10 terms
//! leave a truncation error under `1e-11`. The 15-term `exp` series on
//! `f < 1` is bounded by `1 / 15!`.

use vela_common::{
    to_signed, MathError, E, EXP_SERIES_TERMS, LN_2, LN_SERIES_TERMS, MAX_FACTORIAL_INPUT,
    PRECISION, U256,
};

use crate::fixed_point::{div_wad, mul_wad, pow};
use crate::MathResult;

/// Largest integer part accepted by [`exp`]; e^136 no longer fits
const MAX_EXP_INTEGER: u64 = 135;

/// Natural logarithm of a fixed-point value, returned signed.
///
/// Inputs below 1.0 yield negative results. Fails with
/// [`MathError::InvalidInput`] for zero.
pub fn ln(x: U256) -> MathResult<i128> {
    if x.is_zero() {
        return Err(MathError::invalid("ln of zero is undefined"));
    }
    if x < PRECISION {
        let inverse = div_wad(PRECISION, x)?;
        return Ok(-to_signed(ln_at_least_one(inverse)?)?);
    }
    to_signed(ln_at_least_one(x)?)
}

fn ln_at_least_one(x: U256) -> MathResult<U256> {
    let two = PRECISION << 1usize;
    let mut y = x;
    let mut power = 0u64;
    while y >= two {
        y = y >> 1usize;
        power += 1;
    }

    // u = (y - 1) / (y + 1), in [0, 1/3)
    let u = div_wad(y - PRECISION, y + PRECISION)?;
    let u_squared = mul_wad(u, u)?;

    let mut sum = U256::zero();
    let mut term = u;
    for i in 0..LN_SERIES_TERMS {
        sum = sum + term / U256::from(2 * i + 1);
        term = mul_wad(term, u_squared)?;
        if term.is_zero() {
            break;
        }
    }

    let series = sum << 1usize;
    let whole = LN_2 * U256::from(power);
    series.checked_add(whole).ok_or(MathError::Overflow)
}

/// `e^x` for a non-negative fixed-point exponent.
///
/// Fails with [`MathError::Overflow`] once the result no longer fits.
pub fn exp(x: U256) -> MathResult<U256> {
    let integer = x / PRECISION;
    if integer > U256::from(MAX_EXP_INTEGER) {
        return Err(MathError::Overflow);
    }
    let fraction = x % PRECISION;

    let mut sum = PRECISION;
    let mut term = PRECISION;
    for i in 1..EXP_SERIES_TERMS {
        term = mul_wad(term, fraction)? / U256::from(i);
        if term.is_zero() {
            break;
        }
        sum = sum + term;
    }

    mul_wad(pow(E, integer.low_u64())?, sum)
}

/// `e^-x` for a non-negative fixed-point exponent; underflows to zero
pub fn exp_neg(x: U256) -> MathResult<U256> {
    if x / PRECISION > U256::from(MAX_EXP_INTEGER) {
        return Ok(U256::zero());
    }
    // just under 136 the integer guard passes but e^x still overflows
    match exp(x) {
        Ok(value) => div_wad(PRECISION, value),
        Err(MathError::Overflow) => Ok(U256::zero()),
        Err(e) => Err(e),
    }
}

/// Plain (unscaled) factorial, bounded so the result fits in 256 bits
pub fn factorial(n: u32) -> MathResult<U256> {
    if n > MAX_FACTORIAL_INPUT {
        return Err(MathError::Overflow);
    }
    let mut result = U256::one();
    for i in 2..=n {
        result = result.checked_mul(U256::from(i)).ok_or(MathError::Overflow)?;
    }
    Ok(result)
}
