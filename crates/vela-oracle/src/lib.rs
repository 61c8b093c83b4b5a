//! # Vela Oracle
//!
//! Price feed over a pluggable external oracle.
//!
//! ## Components
//!
//! - [`OracleSource`]: the raw `(price, timestamp)` collaborator, 8 decimals
//! - [`PriceFeed`]: rescaling to 18 decimals, freshness checks, batch reads
//! - [`Clock`]: injected notion of "now" for age computations
//! - [`convert`]: rescaling and price-change helpers that need no oracle
//!
//! Staleness is reported as a boolean by the `*_if_not_older_than` family and
//! only becomes an error in [`PriceFeed::get_fresh_price`] and
//! [`PriceFeed::get_fast_price`].

pub mod clock;
pub mod convert;
pub mod feed;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use convert::{calculate_price_change, convert_dia_price};
pub use feed::{BatchReadings, OracleResult, PriceFeed};
pub use source::{InMemoryOracle, OracleSource};
