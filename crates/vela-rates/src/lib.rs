//! # Vela Rates
//!
//! Two-slope ("kinked") utilization interest-rate model.
//!
//! - [`curve`]: pure rate functions of explicit inputs
//! - [`registry`]: per-asset parameters with a shared default curve

pub mod curve;
pub mod registry;

pub use curve::{
    borrow_rate_per_second, get_borrow_rate, get_supply_rate, get_utilization_rate,
    per_second_rate, supply_rate_per_second, RateResult,
};
pub use registry::{RateParamsRegistry, RateQuote};
