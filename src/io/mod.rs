//! Input/output helpers.
//!
//! - analytics results to JSON, portfolio definitions from JSON (`json`)
//! - trend series to CSV (`export`)

pub mod export;
pub mod json;

pub use export::*;
pub use json::*;
