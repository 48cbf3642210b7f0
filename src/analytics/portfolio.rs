//! Portfolio statistics for one date.
//!
//! ## Formulas
//!
//! ```text
//! weighted_yield_i   = w_i × y_i
//! average yield      = Σ weighted_yield_i
//! allocation_i       = w_i × investment
//! annual income      = Σ allocation_i × y_i / 100
//! total value        = Σ face_i × w_i
//! ```
//!
//! Unlike the yield curve, a portfolio with any unresolved position is not
//! reported at all: a partial portfolio snapshot would misstate every
//! aggregate.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::domain::{Portfolio, PortfolioStats, PositionStats};
use crate::error::DataError;
use crate::store::SeriesStore;

/// Allowed distance of the weight sum from 1.0 before a warning is raised.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Non-fatal conditions surfaced next to the computed statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortfolioWarning {
    /// Weights do not sum to 1; stats use the weights as entered.
    WeightImbalance { sum: f64 },
}

impl std::fmt::Display for PortfolioWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioWarning::WeightImbalance { sum } => {
                write!(f, "portfolio weights sum to {sum:.4}, expected 1.0")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub stats: PortfolioStats,
    pub warnings: Vec<PortfolioWarning>,
}

/// Compute statistics for `portfolio` on `date`.
///
/// Fails with [`DataError::MissingSeries`] when a position's series has no
/// stored file, and with [`DataError::NoDataForDate`] (listing every
/// unresolved series) when a stored series has no observation on `date`.
pub fn portfolio_stats(
    store: &SeriesStore,
    portfolio: &Portfolio,
    date: NaiveDate,
    investment: f64,
) -> Result<PortfolioReport, DataError> {
    if portfolio.positions.is_empty() {
        return Err(DataError::InvalidInput("portfolio has no positions".to_string()));
    }
    if !(investment.is_finite() && investment >= 0.0) {
        return Err(DataError::InvalidInput(format!(
            "investment amount must be a non-negative number, got {investment}"
        )));
    }

    let mut resolved = Vec::with_capacity(portfolio.positions.len());
    let mut unresolved = Vec::new();
    for position in &portfolio.positions {
        let ts = store.require(&position.series)?;
        match ts.value_on(date) {
            Some(y) => resolved.push(y),
            None => unresolved.push(position.series.clone()),
        }
    }
    if !unresolved.is_empty() {
        return Err(DataError::NoDataForDate { date, series: unresolved });
    }

    let positions: Vec<PositionStats> = portfolio
        .positions
        .iter()
        .zip(resolved)
        .map(|(p, yield_pct)| PositionStats {
            series: p.series.clone(),
            weight: p.weight,
            face_value: p.face_value,
            coupon: p.coupon,
            yield_pct,
            weighted_yield: p.weight * yield_pct,
            allocation: p.weight * investment,
        })
        .collect();

    let average_weighted_yield = positions.iter().map(|p| p.weighted_yield).sum();
    let total_value = positions.iter().map(|p| p.face_value * p.weight).sum();
    let estimated_annual_income = positions.iter().map(|p| p.allocation * p.yield_pct / 100.0).sum();

    let mut warnings = Vec::new();
    let weight_sum = portfolio.weight_sum();
    if (weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
        warn!(sum = weight_sum, "portfolio weights do not sum to 1.0");
        warnings.push(PortfolioWarning::WeightImbalance { sum: weight_sum });
    }

    Ok(PortfolioReport {
        stats: PortfolioStats {
            date,
            positions,
            average_weighted_yield,
            total_value,
            investment,
            estimated_annual_income,
        },
        warnings,
    })
}
