//! Shared vocabulary for the Loam tile-grid engine: constants, coordinate
//! math, packed tile ids, the error taxonomy and engine configuration.

pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod hash;
pub mod math;
pub mod types;
