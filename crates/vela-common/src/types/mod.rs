//! Core types for the Vela engine

pub mod price;
pub mod rate_params;
pub mod wad;
