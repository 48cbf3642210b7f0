//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the static series catalog (`catalog`)
//! - time series and portfolio inputs (`TimeSeries`, `Portfolio`)
//! - analytics outputs (`YieldCurveSnapshot`, `PortfolioStats`, etc.)

pub mod catalog;
pub mod types;

pub use types::*;
