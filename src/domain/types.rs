//! Shared domain types.
//!
//! These types are intentionally plain and serializable so they can be:
//!
//! - persisted/loaded by the series store
//! - passed between ingestion, storage and analytics
//! - handed to a presentation layer (JSON) without any rendering concerns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Broad class of a cataloged series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Treasury,
    Corporate,
    Spread,
}

impl Category {
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Treasury => "Treasury",
            Category::Corporate => "Corporate",
            Category::Spread => "Spread",
        }
    }
}

/// Static metadata for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    /// Provider identifier (e.g. `DGS10`). Unique within the catalog.
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    /// Years to maturity; only yield-curve members carry one.
    pub maturity_years: Option<f64>,
}

/// One dated value: a yield in percent, or a spread in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered, date-unique observations for one series.
///
/// The only way to build one is through constructors that enforce strictly
/// increasing dates, so every `TimeSeries` in the program satisfies that.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from observations that must already be strictly ascending by date.
    pub fn new(observations: Vec<Observation>) -> Result<Self, DataError> {
        if let Some(pair) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(DataError::InvalidInput(format!(
                "observation dates must be strictly increasing ({} followed by {})",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { observations })
    }

    /// Build from observations in any order.
    ///
    /// Rows are sorted ascending by date; on duplicate dates the row that came
    /// last in the input wins.
    pub fn from_unordered(mut observations: Vec<Observation>) -> Self {
        // Stable sort keeps input order among equal dates.
        observations.sort_by_key(|o| o.date);
        let mut out: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match out.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => out.push(obs),
            }
        }
        Self { observations: out }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Value observed exactly on `date`, if any.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|idx| self.observations[idx].value)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// One holding in a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub series: String,
    /// Fraction of the portfolio (0..=1).
    pub weight: f64,
    pub face_value: f64,
    /// Coupon rate in percent.
    pub coupon: f64,
}

impl PortfolioPosition {
    pub fn new(series: &str, weight: f64, face_value: f64, coupon: f64) -> Self {
        Self {
            series: series.to_string(),
            weight,
            face_value,
            coupon,
        }
    }
}

/// Ordered collection of positions. Weights are expected (not required) to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub positions: Vec<PortfolioPosition>,
}

impl Portfolio {
    pub fn new(positions: Vec<PortfolioPosition>) -> Self {
        Self { positions }
    }

    pub fn weight_sum(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }

    /// Sample allocation across the curve plus one corporate index.
    pub fn sample() -> Self {
        Self::new(vec![
            PortfolioPosition::new("DGS1", 0.2, 1000.0, 2.0),
            PortfolioPosition::new("DGS5", 0.3, 1000.0, 2.5),
            PortfolioPosition::new("DGS10", 0.3, 1000.0, 3.0),
            PortfolioPosition::new("BAA", 0.2, 1000.0, 4.5),
        ])
    }
}

/// One point on a yield curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePoint {
    pub series: String,
    pub maturity_years: f64,
    pub yield_pct: f64,
}

/// Yields across maturities on a single date, ordered by ascending maturity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldCurveSnapshot {
    pub date: NaiveDate,
    pub points: Vec<CurvePoint>,
    /// Series that are stored but have no observation on `date`.
    pub excluded: Vec<String>,
    /// Series with no stored file at all.
    pub missing: Vec<String>,
    /// Series whose stored file could not be decoded.
    pub unreadable: Vec<String>,
}

/// A full stored series prepared for side-by-side charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub series: String,
    pub label: String,
    pub observations: Vec<Observation>,
}

/// Per-position portfolio figures for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionStats {
    pub series: String,
    pub weight: f64,
    pub face_value: f64,
    pub coupon: f64,
    pub yield_pct: f64,
    pub weighted_yield: f64,
    pub allocation: f64,
}

/// Portfolio statistics for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub date: NaiveDate,
    pub positions: Vec<PositionStats>,
    /// Σ weight × yield, in percent.
    pub average_weighted_yield: f64,
    /// Σ face value × weight.
    pub total_value: f64,
    pub investment: f64,
    /// Σ allocation × yield / 100.
    pub estimated_annual_income: f64,
}

/// One bar of the corporate vs treasury comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditEntry {
    pub series: String,
    pub label: String,
    pub yield_pct: f64,
}

/// Corporate vs treasury yields on a single date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditComparison {
    pub date: NaiveDate,
    pub entries: Vec<CreditEntry>,
    /// BAA − AAA, when both are present.
    pub quality_spread: Option<f64>,
    /// Each present corporate series minus the benchmark treasury.
    pub spreads_over_treasury: Vec<(String, f64)>,
}
