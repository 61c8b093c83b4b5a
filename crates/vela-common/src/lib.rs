//! # Vela Common
//!
//! Shared types, errors, and constants for the Vela lending engine.
//!
//! ## Core Types
//!
//! - [`U256`]/[`U512`]: wide unsigned integers backing 18-decimal fixed point
//! - [`PriceReading`]: a rescaled, validated oracle price
//! - [`StalenessPolicy`]: maximum accepted price age, passed per call
//! - [`RateCurveParams`]: kinked interest-rate curve parameters for one asset
//!
//! ## Errors
//!
//! - [`MathError`]: arithmetic failures (division by zero, overflow, bad input)
//! - [`OracleError`]: price-feed validation failures
//! - [`RateError`]: rate-curve and parameter-registry failures
//! - [`VelaError`]: unified error folding all of the above

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{MathError, OracleError, RateError, Result, VelaError};
pub use types::{
    price::{PriceReading, RawQuote, StalenessPolicy},
    rate_params::RateCurveParams,
    wad::{format_wad, parse_decimal, to_signed, wad, U256, U512},
};

/// Vela version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed-point scale as a plain integer (10^18)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Number of decimals carried by a fixed-point value
pub const WAD_DECIMALS: u32 = 18;

/// 1.0 in 18-decimal fixed point
pub const PRECISION: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// 0.5 in 18-decimal fixed point
pub const HALF_PRECISION: U256 = U256([500_000_000_000_000_000, 0, 0, 0]);

/// 100% in basis points
pub const BPS: u64 = 10_000;

/// ln(2) in 18-decimal fixed point
pub const LN_2: U256 = U256([693_147_180_559_945_309, 0, 0, 0]);

/// Euler's number in 18-decimal fixed point
pub const E: U256 = U256([2_718_281_828_459_045_235, 0, 0, 0]);

/// Series terms used by `ln`
pub const LN_SERIES_TERMS: u32 = 10;

/// Series terms used by `exp`
pub const EXP_SERIES_TERMS: u32 = 15;

/// Largest `n` whose factorial fits in 256 bits
pub const MAX_FACTORIAL_INPUT: u32 = 57;

/// Seconds in a non-leap year, used for per-second rate conversion
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Decimals of raw prices returned by the oracle collaborator
pub const ORACLE_DECIMALS: u32 = 8;

/// Factor lifting an 8-decimal oracle price to 18 decimals (10^10)
pub const ORACLE_SCALE_FACTOR: u64 = 10_000_000_000;

/// Default maximum price age for generic queries (1 hour)
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 3_600;

/// Maximum price age for low-latency, fast-finality reads
pub const FAST_FINALITY_MAX_AGE_SECS: u64 = 5;

/// Default timeout for a single oracle lookup in milliseconds
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 2_000;

/// Default key of the network's native asset price
pub const NATIVE_ASSET_KEY: &str = "STT/USD";
