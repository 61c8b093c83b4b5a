//! Wide unsigned integers backing 18-decimal fixed point.
//!
//! Every fixed-point value in Vela is a [`U256`] scaled by 10^18. Products of
//! two such values are formed in [`U512`] so they can never wrap before the
//! final division.

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use crate::error::MathError;
use crate::{PRECISION, WAD_DECIMALS};
use rust_decimal::Decimal;
use uint::construct_uint;

// U256 with 256 bits consisting of 4 x 64-bit words
construct_uint! {
    pub struct U256(4);
}

// U512 with 512 bits consisting of 8 x 64-bit words
construct_uint! {
    pub struct U512(8);
}

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let U256(ref words) = value;
        let mut wide = [0u64; 8];
        wide[..4].copy_from_slice(words);
        U512(wide)
    }
}

impl TryFrom<U512> for U256 {
    type Error = MathError;

    fn try_from(value: U512) -> Result<Self, Self::Error> {
        let U512(ref words) = value;
        if words[4..].iter().any(|w| *w != 0) {
            return Err(MathError::Overflow);
        }
        let mut narrow = [0u64; 4];
        narrow.copy_from_slice(&words[..4]);
        Ok(U256(narrow))
    }
}

/// Lift a whole number of units into fixed point
pub fn wad(units: u64) -> U256 {
    U256::from(units) * PRECISION
}

/// Convert a fixed-point magnitude to a signed value
pub fn to_signed(value: U256) -> Result<i128, MathError> {
    if value.bits() > 127 {
        return Err(MathError::Overflow);
    }
    Ok(value.low_u128() as i128)
}

/// Convert a human decimal (e.g. `0.02`) into fixed point.
///
/// Negative values and values with more than 18 fractional digits are
/// rejected rather than rounded.
pub fn parse_decimal(value: Decimal) -> Result<U256, MathError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::invalid(format!("negative value {}", value)));
    }
    let scale = value.scale();
    if scale > WAD_DECIMALS {
        return Err(MathError::invalid(format!(
            "{} has more than {} decimal places",
            value, WAD_DECIMALS
        )));
    }
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    mantissa
        .checked_mul(U256::exp10((WAD_DECIMALS - scale) as usize))
        .ok_or(MathError::Overflow)
}

/// Render a fixed-point value with all 18 fractional digits
pub fn format_wad(value: U256) -> String {
    let decimals = WAD_DECIMALS as usize;
    let mut digits = value.to_string();
    if digits.len() <= decimals {
        digits.insert_str(0, &"0".repeat(decimals - digits.len()));
        digits.insert_str(0, "0.");
    } else {
        digits.insert(digits.len() - decimals, '.');
    }
    digits
}
