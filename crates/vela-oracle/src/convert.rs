//! Standalone price conversions, usable without an oracle handle

use vela_common::{MathError, U256, ORACLE_DECIMALS};
use vela_math::{percentage_change, MathResult};

/// Largest power of ten that fits in 256 bits
const MAX_DECIMALS: u32 = 77;

/// Rescale a raw 8-decimal oracle price to `target_decimals`.
///
/// Scaling down truncates the dropped digits.
pub fn convert_dia_price(raw_price: u128, target_decimals: u32) -> MathResult<U256> {
    if target_decimals > MAX_DECIMALS {
        return Err(MathError::invalid(format!(
            "target decimals {} exceed {}",
            target_decimals, MAX_DECIMALS
        )));
    }
    let raw = U256::from(raw_price);
    if target_decimals >= ORACLE_DECIMALS {
        let factor = U256::exp10((target_decimals - ORACLE_DECIMALS) as usize);
        raw.checked_mul(factor).ok_or(MathError::Overflow)
    } else {
        Ok(raw / U256::exp10((ORACLE_DECIMALS - target_decimals) as usize))
    }
}

/// Signed relative change from `old_price` to `new_price` as a fixed-point
/// fraction (`0.05e18` is +5%)
pub fn calculate_price_change(old_price: U256, new_price: U256) -> MathResult<i128> {
    percentage_change(old_price, new_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_common::wad;

    #[test]
    fn test_convert_to_wad() {
        // 50.00000000 at 8 decimals
        assert_eq!(convert_dia_price(5_000_000_000, 18).unwrap(), wad(50));
        assert_eq!(
            convert_dia_price(5_000_000_000, 8).unwrap(),
            U256::from(5_000_000_000u64)
        );
    }

    #[test]
    fn test_convert_down_truncates() {
        // 12.34567891 -> 12.34 at 2 decimals
        assert_eq!(
            convert_dia_price(1_234_567_891, 2).unwrap(),
            U256::from(1_234u64)
        );
        assert_eq!(convert_dia_price(99, 0).unwrap(), U256::zero());
    }

    #[test]
    fn test_convert_rejects_huge_precision() {
        assert!(convert_dia_price(1, 78).is_err());
        assert_eq!(convert_dia_price(u128::MAX, 77), Err(MathError::Overflow));
    }

    #[test]
    fn test_price_change() {
        // 50 -> 55 is +10%
        assert_eq!(
            calculate_price_change(wad(50), wad(55)).unwrap(),
            100_000_000_000_000_000
        );
        assert_eq!(
            calculate_price_change(wad(50), wad(40)).unwrap(),
            -200_000_000_000_000_000
        );
        assert_eq!(
            calculate_price_change(U256::zero(), wad(1)),
            Err(MathError::DivisionByZero)
        );
    }
}
