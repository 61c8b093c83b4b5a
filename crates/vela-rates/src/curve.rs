//! Kinked utilization curve
//!
//! Rates here are annual unless the function name says otherwise. The
//! per-second variants divide linearly by [`SECONDS_PER_YEAR`].

use vela_common::{MathError, RateCurveParams, RateError, PRECISION, SECONDS_PER_YEAR, U256};
use vela_math::{div_wad, mul_div, mul_wad};

/// Result alias for rate computations
pub type RateResult<T> = std::result::Result<T, RateError>;

/// `total_borrow / total_supply`; an empty market is 0% utilized.
///
/// Borrows exceeding supply yield a ratio above 1.0; no clamping is applied.
pub fn get_utilization_rate(total_supply: U256, total_borrow: U256) -> RateResult<U256> {
    if total_supply.is_zero() {
        return Ok(U256::zero());
    }
    Ok(div_wad(total_borrow, total_supply)?)
}

/// Annual borrow rate at `utilization`
pub fn get_borrow_rate(params: &RateCurveParams, utilization: U256) -> RateResult<U256> {
    params.validate()?;

    if utilization < params.kink {
        let slope = mul_div(params.slope1, utilization, params.kink)?;
        return checked_add(params.base_rate, slope);
    }

    let excess = utilization - params.kink;
    let slope = mul_div(params.slope2, excess, PRECISION - params.kink)?;
    let at_kink = checked_add(params.base_rate, params.slope1)?;
    checked_add(at_kink, slope)
}

/// `borrow_rate * utilization * (1 - reserve_factor)`
pub fn get_supply_rate(utilization: U256, borrow_rate: U256, reserve_factor: U256) -> RateResult<U256> {
    if reserve_factor > PRECISION {
        return Err(RateError::InvalidParams(format!(
            "reserve factor must be <= 1, got {}",
            reserve_factor
        )));
    }
    let gross = mul_wad(borrow_rate, utilization)?;
    Ok(mul_wad(gross, PRECISION - reserve_factor)?)
}

/// Linear per-second equivalent of an annual rate
pub fn per_second_rate(annual_rate: U256) -> U256 {
    annual_rate / U256::from(SECONDS_PER_YEAR)
}

pub fn borrow_rate_per_second(params: &RateCurveParams, utilization: U256) -> RateResult<U256> {
    Ok(per_second_rate(get_borrow_rate(params, utilization)?))
}

pub fn supply_rate_per_second(params: &RateCurveParams, utilization: U256) -> RateResult<U256> {
    let borrow_rate = get_borrow_rate(params, utilization)?;
    Ok(per_second_rate(get_supply_rate(
        utilization,
        borrow_rate,
        params.reserve_factor,
    )?))
}

fn checked_add(a: U256, b: U256) -> RateResult<U256> {
    a.checked_add(b).ok_or(RateError::Math(MathError::Overflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vela_common::wad;

    fn ratio(thousandths: u64) -> U256 {
        U256::from(thousandths) * U256::exp10(15)
    }

    #[test]
    fn test_utilization() {
        assert_eq!(get_utilization_rate(wad(100), wad(80)).unwrap(), ratio(800));
        assert_eq!(get_utilization_rate(U256::zero(), wad(5)).unwrap(), U256::zero());
        assert_eq!(get_utilization_rate(wad(100), U256::zero()).unwrap(), U256::zero());
    }

    #[test]
    fn test_borrow_rate_at_kink() {
        // base 2% + slope1 8% at the 80% kink
        let params = RateCurveParams::default();
        assert_eq!(get_borrow_rate(&params, ratio(800)).unwrap(), ratio(100));
    }

    #[test]
    fn test_borrow_rate_segments() {
        let params = RateCurveParams::default();
        assert_eq!(get_borrow_rate(&params, U256::zero()).unwrap(), ratio(20));
        // half way to the kink: 2% + 4%
        assert_eq!(get_borrow_rate(&params, ratio(400)).unwrap(), ratio(60));
        // half way past the kink: 10% + 125%
        assert_eq!(get_borrow_rate(&params, ratio(900)).unwrap(), ratio(1_350));
        assert_eq!(get_borrow_rate(&params, PRECISION).unwrap(), ratio(2_600));
        assert_eq!(
            get_borrow_rate(&params, PRECISION).unwrap(),
            params.rate_at_full_utilization().unwrap()
        );
    }

    #[test]
    fn test_borrow_rate_continuous_at_kink() {
        let params = RateCurveParams::default();
        let below = get_borrow_rate(&params, params.kink - U256::one()).unwrap();
        let at = get_borrow_rate(&params, params.kink).unwrap();
        let above = get_borrow_rate(&params, params.kink + U256::one()).unwrap();

        assert!(below <= at && at <= above);
        assert!(at - below <= U256::one());
        // slope2 / (1 - kink) = 12.5 wei per wei of utilization
        assert!(above - at <= U256::from(13u64));
    }

    #[test]
    fn test_borrow_rate_rejects_degenerate_kink() {
        let params = RateCurveParams {
            kink: PRECISION,
            ..RateCurveParams::default()
        };
        assert!(matches!(
            get_borrow_rate(&params, ratio(500)),
            Err(RateError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_supply_rate() {
        // 10% * 80% * 90% = 7.2%
        assert_eq!(
            get_supply_rate(ratio(800), ratio(100), ratio(100)).unwrap(),
            ratio(72)
        );
        assert_eq!(
            get_supply_rate(U256::zero(), ratio(100), ratio(100)).unwrap(),
            U256::zero()
        );
        assert!(get_supply_rate(ratio(800), ratio(100), wad(2)).is_err());
    }

    #[test]
    fn test_per_second_rates() {
        assert_eq!(per_second_rate(U256::from(SECONDS_PER_YEAR * 7)), U256::from(7u64));

        let params = RateCurveParams::default();
        let annual = get_borrow_rate(&params, ratio(800)).unwrap();
        assert_eq!(
            borrow_rate_per_second(&params, ratio(800)).unwrap(),
            annual / U256::from(SECONDS_PER_YEAR)
        );
        assert!(
            supply_rate_per_second(&params, ratio(800)).unwrap()
                <= borrow_rate_per_second(&params, ratio(800)).unwrap()
        );
    }

    #[test]
    fn test_overflowing_slope() {
        let params = RateCurveParams {
            base_rate: U256::MAX,
            ..RateCurveParams::default()
        };
        assert_eq!(
            get_borrow_rate(&params, ratio(500)),
            Err(RateError::Math(MathError::Overflow))
        );
    }

    proptest! {
        #[test]
        fn prop_supply_never_exceeds_borrow(
            u in 0u64..=1_000,
            rf in 0u64..=1_000,
        ) {
            let params = RateCurveParams::default();
            let utilization = ratio(u);
            let borrow = get_borrow_rate(&params, utilization).unwrap();
            let supply = get_supply_rate(utilization, borrow, ratio(rf)).unwrap();
            prop_assert!(supply <= borrow);
        }

        #[test]
        fn prop_borrow_rate_continuous_at_any_kink(
            kink in 1u64..1_000,
            base in 0u64..=100,
            slope1 in 0u64..=10_000,
            slope2 in 0u64..=10_000,
        ) {
            let params = RateCurveParams {
                base_rate: ratio(base),
                slope1: ratio(slope1),
                slope2: ratio(slope2),
                kink: ratio(kink),
                reserve_factor: ratio(100),
            };
            let at = get_borrow_rate(&params, params.kink).unwrap();
            let below = get_borrow_rate(&params, params.kink - U256::one()).unwrap();

            prop_assert_eq!(at, params.base_rate + params.slope1);
            prop_assert!(below <= at);
            // one wei of utilization moves the rate by at most ceil(slope1 / kink)
            prop_assert!(at - below <= params.slope1 / params.kink + U256::one());
        }

        #[test]
        fn prop_borrow_rate_is_monotonic(a in 0u64..=1_000, b in 0u64..=1_000) {
            let params = RateCurveParams::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                get_borrow_rate(&params, ratio(lo)).unwrap()
                    <= get_borrow_rate(&params, ratio(hi)).unwrap()
            );
        }
    }
}
