//! JSON read/write for analytics results and portfolio definitions.
//!
//! Snapshots, trends, stats and comparisons all serialize as plain JSON so a
//! presentation layer can consume them without linking this crate.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::Portfolio;
use crate::error::AppError;

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(4, format!("Failed to write JSON: {e}")))?;
    Ok(())
}

/// Print `value` as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)
        .map_err(|e| AppError::new(4, format!("Failed to write JSON: {e}")))?;
    writeln!(out).map_err(|e| AppError::new(4, format!("Failed to write JSON: {e}")))?;
    Ok(())
}

/// Read a portfolio definition.
///
/// Accepts either `{"positions": [...]}` or a bare array of positions, each
/// `{"series": "DGS10", "weight": 0.3, "face_value": 1000, "coupon": 3.0}`.
pub fn read_portfolio_json(path: &Path) -> Result<Portfolio, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open portfolio JSON '{}': {e}", path.display())))?;
    let parsed: PortfolioFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid portfolio JSON: {e}")))?;
    Ok(parsed.into())
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PortfolioFile {
    Wrapped(Portfolio),
    Bare(Vec<crate::domain::PortfolioPosition>),
}

impl From<PortfolioFile> for Portfolio {
    fn from(value: PortfolioFile) -> Self {
        match value {
            PortfolioFile::Wrapped(p) => p,
            PortfolioFile::Bare(positions) => Portfolio::new(positions),
        }
    }
}
