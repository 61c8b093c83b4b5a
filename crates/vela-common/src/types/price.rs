//! Price types - raw oracle quotes and validated readings
//!
//! The oracle collaborator reports prices with 8 decimals. The engine lifts
//! them to 18 decimals and hands out [`PriceReading`]s, which are never
//! cached by the engine itself.

use serde::{Deserialize, Serialize};

use crate::types::wad::U256;
use crate::{DEFAULT_MAX_PRICE_AGE_SECS, FAST_FINALITY_MAX_AGE_SECS};

/// Raw `(price, timestamp)` pair as returned by the oracle collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Price scaled by 10^8
    pub price: u128,
    /// Unix seconds of the last update
    pub timestamp: u128,
}

impl RawQuote {
    pub fn new(price: u128, timestamp: u128) -> Self {
        Self { price, timestamp }
    }
}

/// A rescaled price for one key.
///
/// Readings returned as valid always satisfy `value > 0` and
/// `timestamp <= now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReading {
    /// Price in 18-decimal fixed point
    pub value: U256,
    /// Unix seconds of the last oracle update
    pub timestamp: u64,
    /// Symbolic key, e.g. `BTC/USD`
    pub key: String,
}

impl PriceReading {
    /// Seconds elapsed since the reading was produced
    #[inline]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the reading satisfies the policy at `now`
    pub fn is_fresh(&self, now: u64, policy: StalenessPolicy) -> bool {
        self.age(now) <= policy.max_age
    }
}

/// Maximum accepted price age, passed per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessPolicy {
    /// Maximum age in seconds (inclusive)
    pub max_age: u64,
}

impl StalenessPolicy {
    pub const fn new(max_age: u64) -> Self {
        Self { max_age }
    }

    /// Tight threshold for fast-finality reads
    pub const fn fast() -> Self {
        Self::new(FAST_FINALITY_MAX_AGE_SECS)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRICE_AGE_SECS)
    }
}
