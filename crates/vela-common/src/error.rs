//! Error types for the Vela engine
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using VelaError
pub type Result<T> = std::result::Result<T, VelaError>;

/// Unified error type for Vela operations
#[derive(Debug, Error)]
pub enum VelaError {
    // Arithmetic errors
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    // Oracle errors
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    // Rate curve errors
    #[error("Rate error: {0}")]
    Rates(#[from] RateError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fixed-point arithmetic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MathError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        MathError::InvalidInput(reason.into())
    }
}

/// Oracle price-feed errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Oracle handle is not configured")]
    InvalidOracle,

    #[error("Oracle handle is already configured")]
    AlreadyConfigured,

    #[error("Price key must not be empty")]
    InvalidKey,

    #[error("Oracle returned a zero price")]
    ZeroPrice,

    #[error("Price too old: age {age}s exceeds {max_age}s")]
    PriceTooOld { age: u64, max_age: u64 },

    #[error("Price not found for key: {key}")]
    PriceNotFound { key: String },

    #[error("Price timestamp {timestamp} is ahead of current time {now}")]
    FutureTimestamp { timestamp: u64, now: u64 },

    #[error("Oracle unavailable for {key} after {timeout_ms}ms")]
    Unavailable { key: String, timeout_ms: u64 },

    #[error("Oracle math error: {0}")]
    Math(#[from] MathError),
}

/// Interest-rate curve and registry errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("Invalid rate curve parameters: {0}")]
    InvalidParams(String),

    #[error("No custom rate parameters for asset: {0}")]
    AssetNotFound(String),

    #[error("Rate math error: {0}")]
    Math(#[from] MathError),
}

impl From<config::ConfigError> for VelaError {
    fn from(err: config::ConfigError) -> Self {
        VelaError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for VelaError {
    fn from(err: anyhow::Error) -> Self {
        VelaError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VelaError::Oracle(OracleError::PriceNotFound {
            key: "BTC/USD".to_string(),
        });
        assert!(err.to_string().contains("BTC/USD"));
    }

    #[test]
    fn test_stale_price_error() {
        let err = OracleError::PriceTooOld {
            age: 3601,
            max_age: 3600,
        };
        assert!(err.to_string().contains("3601s exceeds 3600s"));
    }

    #[test]
    fn test_math_error_folds_into_rate_error() {
        let err: RateError = MathError::DivisionByZero.into();
        assert_eq!(err, RateError::Math(MathError::DivisionByZero));
    }
}
