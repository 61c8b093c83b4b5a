//! Oracle sources
//!
//! The collaborator answering raw `(price, timestamp)` queries. Prices come
//! back scaled by 10^8; the feed does all rescaling and validation.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use vela_common::{OracleError, RawQuote};

/// Trait for external price oracles
#[async_trait]
pub trait OracleSource: Send + Sync {
    /// Fetch the latest raw quote for `key`
    async fn get_value(&self, key: &str) -> Result<RawQuote, OracleError>;
}

/// In-memory oracle backed by a concurrent map
///
/// Useful for local runs and tests; values are whatever was last set.
#[derive(Debug, Default)]
pub struct InMemoryOracle {
    quotes: DashMap<String, RawQuote>,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a raw 8-decimal price for `key`
    pub fn set_value(&self, key: &str, price: u128, timestamp: u128) {
        debug!(key, price = %price, timestamp = %timestamp, "Oracle value set");
        self.quotes
            .insert(key.to_string(), RawQuote::new(price, timestamp));
    }

    /// Drop the quote for `key`, returning it if present
    pub fn remove(&self, key: &str) -> Option<RawQuote> {
        self.quotes.remove(key).map(|(_, quote)| quote)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[async_trait]
impl OracleSource for InMemoryOracle {
    async fn get_value(&self, key: &str) -> Result<RawQuote, OracleError> {
        self.quotes
            .get(key)
            .map(|entry| *entry.value())
            .ok_or_else(|| OracleError::PriceNotFound {
                key: key.to_string(),
            })
    }
}
