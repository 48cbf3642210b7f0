//! Shared workflow used by every command.
//!
//! A `Session` owns the store (and therefore its read cache) for one run.
//! Commands go through it so the sequence store → analytics → result is
//! written once; the CLI only decides how to print.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::analytics::{self, PortfolioReport};
use crate::data::{FredClient, IngestReport, IngestWindow, Ingestor, SeriesProvider};
use crate::domain::catalog::{self, CATALOG};
use crate::domain::{CreditComparison, Portfolio, SeriesDescriptor, TrendSeries, YieldCurveSnapshot};
use crate::error::{AppError, DataError};
use crate::store::{SeriesStore, StoredSeriesInfo};

pub struct Session {
    store: SeriesStore,
}

impl Session {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: SeriesStore::open(data_dir),
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// `date` if given, else the latest stored date of the reference series.
    pub fn resolve_date(&self, date: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
        if let Some(date) = date {
            return Ok(date);
        }
        analytics::latest_date(&self.store, catalog::REFERENCE_SERIES)?.ok_or_else(|| {
            AppError::new(
                3,
                format!("Stored {} series is empty; pass --date.", catalog::REFERENCE_SERIES),
            )
        })
    }

    pub fn curve(&self, date: NaiveDate) -> Result<YieldCurveSnapshot, DataError> {
        analytics::assemble_yield_curve(&self.store, date, &catalog::treasury_curve())
    }

    pub fn credit(&self, date: NaiveDate) -> Result<CreditComparison, AppError> {
        let corporates = resolve_ids(&catalog::CORPORATE_SERIES.map(String::from))?;
        let benchmark = lookup(catalog::BENCHMARK_TREASURY)?;
        Ok(analytics::credit_comparison(&self.store, date, &corporates, benchmark)?)
    }

    /// Trends for `ids` (default set when empty), followed by any `(a, b)` spreads.
    pub fn trends(&self, ids: &[String], spreads: &[(String, String)]) -> Result<Vec<TrendSeries>, AppError> {
        let series = if ids.is_empty() {
            resolve_ids(&catalog::TREND_SERIES.map(String::from))?
        } else {
            resolve_ids(ids)?
        };
        let mut out = analytics::historical_trends(&self.store, &series)?;
        for (a, b) in spreads {
            out.push(analytics::spread_between(&self.store, lookup(a)?, lookup(b)?)?);
        }
        Ok(out)
    }

    pub fn portfolio(
        &self,
        portfolio: &Portfolio,
        date: NaiveDate,
        investment: f64,
    ) -> Result<PortfolioReport, DataError> {
        analytics::portfolio_stats(&self.store, portfolio, date, investment)
    }

    /// Every catalog entry with its stored summary (`None` if not stored).
    pub fn status(&self) -> Result<Vec<(&'static SeriesDescriptor, Option<StoredSeriesInfo>)>, DataError> {
        CATALOG
            .iter()
            .map(|d| -> Result<_, DataError> { Ok((d, self.store.info(d.id)?)) })
            .collect()
    }

    pub fn ingest(
        &self,
        provider: &dyn SeriesProvider,
        window: IngestWindow,
        ids: &[String],
        parallel: bool,
    ) -> Result<IngestReport, AppError> {
        let series = if ids.is_empty() {
            CATALOG.iter().collect()
        } else {
            resolve_ids(ids)?
        };
        Ok(Ingestor::new(provider, &self.store, window)
            .parallel(parallel)
            .run(&series))
    }
}

/// FRED-backed ingestion with the key from settings.
pub fn fred_provider(api_key: &str) -> Result<FredClient, AppError> {
    Ok(FredClient::new(api_key)?)
}

fn resolve_ids(ids: &[String]) -> Result<Vec<&'static SeriesDescriptor>, AppError> {
    catalog::resolve(ids).map_err(|e| AppError::new(2, e))
}

fn lookup(id: &str) -> Result<&'static SeriesDescriptor, AppError> {
    catalog::lookup(id).ok_or_else(|| AppError::new(2, format!("Unknown series '{id}'.")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::domain::{Observation, TimeSeries};

    struct OneSeries;

    impl SeriesProvider for OneSeries {
        fn provider_name(&self) -> &'static str {
            "one"
        }

        fn get_series(&self, series_id: &str, start: NaiveDate, _end: NaiveDate) -> Result<Vec<Observation>, DataError> {
            match series_id {
                "DGS10" => Ok(vec![Observation::new(start, 3.9)]),
                _ => Err(DataError::provider(series_id, "unavailable")),
            }
        }
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn resolve_date_prefers_explicit_then_reference_series() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path());
        assert_eq!(session.resolve_date(None).unwrap_err().exit_code(), 3);

        let ts = TimeSeries::new(vec![Observation::new(d(1, 2), 3.9), Observation::new(d(1, 3), 3.8)]).unwrap();
        session.store().write("DGS10", &ts).unwrap();
        assert_eq!(session.resolve_date(None).unwrap(), d(1, 3));
        assert_eq!(session.resolve_date(Some(d(1, 2))).unwrap(), d(1, 2));
    }

    #[test]
    fn ingest_then_analyze_end_to_end() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path());
        let window = IngestWindow::new(d(1, 2), d(1, 31)).unwrap();

        let report = session.ingest(&OneSeries, window, &[], false).unwrap();
        assert_eq!(report.updated_count(), 1);
        assert_eq!(report.failed_count(), CATALOG.len() - 1);

        let date = session.resolve_date(None).unwrap();
        let curve = session.curve(date).unwrap();
        assert_eq!(curve.points.len(), 1);
        assert_eq!(curve.missing.len(), 9);

        let status = session.status().unwrap();
        assert_eq!(status.iter().filter(|(_, info)| info.is_some()).count(), 1);
    }

    #[test]
    fn unknown_ids_are_usage_errors() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path());
        let window = IngestWindow::new(d(1, 2), d(1, 31)).unwrap();
        let err = session.ingest(&OneSeries, window, &["DGS4".to_string()], false).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = session.trends(&[], &[("DGS10".into(), "NOPE".into())]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
