//! # Vela Math
//!
//! Deterministic, overflow-safe arithmetic on 18-decimal fixed-point values.
//!
//! ## Modules
//!
//! - [`fixed_point`]: `mul_div` with a 512-bit intermediate, scaled multiply and
//!   divide, integer square root, integer powers, compound interest
//! - [`transcendental`]: `ln`, `exp` and bounded factorials
//! - [`stats`]: averages, dispersion, Sharpe ratio, correlation, value at risk
//! - [`helpers`]: comparison and interpolation helpers
//! - [`units`]: basis points and rate annualization
//!
//! ## Numeric contract
//!
//! `ln` evaluates 10 terms of the `atanh` series after halving its argument
//! into `[1, 2)`; `exp` evaluates 15 Taylor terms on the fractional part.
//! Both stay within `1e-9` relative error of an exact reference for inputs in
//! their supported ranges. Everything else is exact up to truncating division.
//!
//! Every function is pure and can be called from any number of threads.

pub mod fixed_point;
pub mod helpers;
pub mod stats;
pub mod transcendental;
pub mod units;

use vela_common::MathError;

/// Result alias for math operations
pub type MathResult<T> = std::result::Result<T, MathError>;

pub use fixed_point::{compound_interest, div_wad, mul_div, mul_wad, pow, sqrt, sqrt_wad};
pub use helpers::{abs_diff, approx_equal, clamp, lerp, max, min};
pub use stats::{
    calculate_var, correlation, mean, moving_average, percentage_change, sharpe_ratio,
    standard_deviation, variance, weighted_average,
};
pub use transcendental::{exp, exp_neg, factorial, ln};
pub use units::{annualize_rate, bps_to_decimal, deannualize_rate, decimal_to_bps};
