//! Price feed
//!
//! Reads raw quotes from the installed [`OracleSource`], lifts them from 8 to
//! 18 decimals and checks freshness against the injected [`Clock`]. Nothing
//! is cached: every call goes to the source under a per-call timeout.

use futures::future::{join_all, try_join_all};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use vela_common::{
    OracleError, PriceReading, StalenessPolicy, U256, DEFAULT_ORACLE_TIMEOUT_MS,
    ORACLE_SCALE_FACTOR,
};

use crate::clock::{Clock, SystemClock};
use crate::source::OracleSource;

/// Result alias for feed operations
pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Outcome of a partial-success batch lookup.
///
/// All vectors are aligned with the requested keys. Failed entries carry a
/// zero price and timestamp and `ok[i] == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReadings {
    pub prices: Vec<U256>,
    pub timestamps: Vec<u64>,
    pub ok: Vec<bool>,
}

impl BatchReadings {
    /// Whether every key resolved
    pub fn all_ok(&self) -> bool {
        self.ok.iter().all(|ok| *ok)
    }
}

/// Oracle-backed price feed
pub struct PriceFeed {
    /// Installed oracle handle, set once
    oracle: RwLock<Option<Arc<dyn OracleSource>>>,
    /// Time source for age computations
    clock: Arc<dyn Clock>,
    /// Upper bound on a single source lookup
    timeout: Duration,
    /// Threshold used by `get_fresh_price`
    default_policy: StalenessPolicy,
    /// Threshold used by `get_fast_price`
    fast_policy: StalenessPolicy,
}

impl PriceFeed {
    /// Create a feed with no oracle installed
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            oracle: RwLock::new(None),
            clock,
            timeout: Duration::from_millis(DEFAULT_ORACLE_TIMEOUT_MS),
            default_policy: StalenessPolicy::default(),
            fast_policy: StalenessPolicy::fast(),
        }
    }

    /// Create feed with custom lookup timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create feed with custom staleness thresholds
    pub fn with_policies(mut self, default_policy: StalenessPolicy, fast_policy: StalenessPolicy) -> Self {
        self.default_policy = default_policy;
        self.fast_policy = fast_policy;
        self
    }

    /// Create feed with an oracle already installed
    pub fn with_oracle(self, source: Arc<dyn OracleSource>) -> Self {
        *self.oracle.write() = Some(source);
        self
    }

    /// Install the oracle handle.
    ///
    /// Fails with [`OracleError::AlreadyConfigured`] if one is present; call
    /// [`PriceFeed::clear_oracle`] first to replace it.
    pub fn set_oracle(&self, source: Arc<dyn OracleSource>) -> OracleResult<()> {
        let mut oracle = self.oracle.write();
        if oracle.is_some() {
            return Err(OracleError::AlreadyConfigured);
        }
        *oracle = Some(source);
        info!("Oracle handle installed");
        Ok(())
    }

    /// Tear down the oracle handle, returning the previous one
    pub fn clear_oracle(&self) -> Option<Arc<dyn OracleSource>> {
        let previous = self.oracle.write().take();
        if previous.is_some() {
            info!("Oracle handle cleared");
        }
        previous
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.read().is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_policy(&self) -> StalenessPolicy {
        self.default_policy
    }

    pub fn fast_policy(&self) -> StalenessPolicy {
        self.fast_policy
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    fn source(&self) -> OracleResult<Arc<dyn OracleSource>> {
        self.oracle.read().clone().ok_or(OracleError::InvalidOracle)
    }

    /// Fetch and rescale the latest price for `key`.
    ///
    /// Rejects an unset oracle, an empty key, a zero price and a timestamp
    /// ahead of the clock. Staleness is not checked here.
    #[instrument(skip(self))]
    pub async fn get_price(&self, key: &str) -> OracleResult<PriceReading> {
        let (reading, _) = self.read_price(key).await?;
        Ok(reading)
    }

    /// Validated reading plus the clock sample it was checked against.
    ///
    /// Callers derive the age from the returned `now` so the future-timestamp
    /// check and the staleness check see the same instant.
    async fn read_price(&self, key: &str) -> OracleResult<(PriceReading, u64)> {
        let source = self.source()?;
        if key.is_empty() {
            return Err(OracleError::InvalidKey);
        }

        let quote = match tokio::time::timeout(self.timeout, source.get_value(key)).await {
            Ok(result) => result?,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(key, timeout_ms, "Oracle lookup timed out");
                return Err(OracleError::Unavailable {
                    key: key.to_string(),
                    timeout_ms,
                });
            }
        };

        if quote.price == 0 {
            return Err(OracleError::ZeroPrice);
        }

        let now = self.clock.now();
        let timestamp = u64::try_from(quote.timestamp).unwrap_or(u64::MAX);
        if timestamp > now {
            warn!(key, timestamp, now, "Oracle timestamp ahead of clock");
            return Err(OracleError::FutureTimestamp { timestamp, now });
        }

        let value = U256::from(quote.price) * U256::from(ORACLE_SCALE_FACTOR);
        debug!(key, timestamp, raw = %quote.price, "Price read");

        let reading = PriceReading {
            value,
            timestamp,
            key: key.to_string(),
        };
        Ok((reading, now))
    }

    /// Price for `key` if its age is at most `max_age` seconds.
    ///
    /// A stale price is reported as `(0, false)` rather than an error.
    #[instrument(skip(self))]
    pub async fn get_price_if_not_older_than(&self, key: &str, max_age: u64) -> OracleResult<(U256, bool)> {
        let (reading, now) = self.read_price(key).await?;
        let age = reading.age(now);
        if age <= max_age {
            Ok((reading.value, true))
        } else {
            warn!(key, age, max_age, "Stale price");
            Ok((U256::zero(), false))
        }
    }

    /// Price for `key` under the default threshold; stale is an error
    pub async fn get_fresh_price(&self, key: &str) -> OracleResult<U256> {
        self.get_price_with_policy(key, self.default_policy).await
    }

    /// Price for `key` under the fast-finality threshold
    pub async fn get_fast_price(&self, key: &str) -> OracleResult<U256> {
        self.get_price_with_policy(key, self.fast_policy).await
    }

    async fn get_price_with_policy(&self, key: &str, policy: StalenessPolicy) -> OracleResult<U256> {
        let (reading, now) = self.read_price(key).await?;
        let age = reading.age(now);
        if age > policy.max_age {
            warn!(key, age, max_age = policy.max_age, "Rejecting stale price");
            return Err(OracleError::PriceTooOld {
                age,
                max_age: policy.max_age,
            });
        }
        Ok(reading.value)
    }

    /// Prices and timestamps for every key, in key order.
    ///
    /// Lookups run concurrently; the first failure fails the whole batch.
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn get_batch_prices<K>(&self, keys: &[K]) -> OracleResult<(Vec<U256>, Vec<u64>)>
    where
        K: AsRef<str> + Sync,
    {
        let readings = try_join_all(keys.iter().map(|key| self.get_price(key.as_ref()))).await?;
        Ok(readings
            .into_iter()
            .map(|reading| (reading.value, reading.timestamp))
            .unzip())
    }

    /// Like [`PriceFeed::get_batch_prices`] but never fails as a whole;
    /// per-key outcomes are reported in [`BatchReadings::ok`]
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn get_batch_prices_partial<K>(&self, keys: &[K]) -> BatchReadings
    where
        K: AsRef<str> + Sync,
    {
        let results = join_all(keys.iter().map(|key| self.get_price(key.as_ref()))).await;

        let mut batch = BatchReadings::default();
        for (key, result) in keys.iter().zip(results) {
            match result {
                Ok(reading) => {
                    batch.prices.push(reading.value);
                    batch.timestamps.push(reading.timestamp);
                    batch.ok.push(true);
                }
                Err(e) => {
                    debug!(key = key.as_ref(), error = %e, "Batch entry failed");
                    batch.prices.push(U256::zero());
                    batch.timestamps.push(0);
                    batch.ok.push(false);
                }
            }
        }
        batch
    }

    /// Prices for every key under `max_age`; stale entries are zero.
    ///
    /// The flag is true only if every entry was fresh. Any lookup error
    /// fails the batch.
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn get_batch_fresh_prices<K>(&self, keys: &[K], max_age: u64) -> OracleResult<(Vec<U256>, bool)>
    where
        K: AsRef<str> + Sync,
    {
        let results = try_join_all(
            keys.iter()
                .map(|key| self.get_price_if_not_older_than(key.as_ref(), max_age)),
        )
        .await?;

        let all_fresh = results.iter().all(|(_, fresh)| *fresh);
        let prices = results.into_iter().map(|(price, _)| price).collect();
        Ok((prices, all_fresh))
    }

    /// Seconds since the last update of `key`
    pub async fn get_price_age(&self, key: &str) -> OracleResult<u64> {
        let (reading, now) = self.read_price(key).await?;
        Ok(reading.age(now))
    }

    /// Whether `key` was updated within `max_age` seconds
    pub async fn is_price_fresh(&self, key: &str, max_age: u64) -> OracleResult<bool> {
        let (reading, now) = self.read_price(key).await?;
        Ok(reading.is_fresh(now, StalenessPolicy::new(max_age)))
    }

    /// Validate a price already obtained elsewhere against the clock
    pub fn validate_oracle_response(&self, price: U256, timestamp: u64, max_age: u64) -> OracleResult<()> {
        if price.is_zero() {
            return Err(OracleError::ZeroPrice);
        }
        let now = self.clock.now();
        if timestamp > now {
            return Err(OracleError::FutureTimestamp { timestamp, now });
        }
        let age = now - timestamp;
        if age > max_age {
            return Err(OracleError::PriceTooOld { age, max_age });
        }
        Ok(())
    }
}

impl Default for PriceFeed {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
