//! Batch ingestion: provider → normalize → store, one series at a time.
//!
//! A failure for one series (network, unknown id, bad payload, write error) is
//! logged and recorded in the report; the run always continues with the next
//! series. Updating N of M series is a normal outcome.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::data::fred::{SeriesProvider, normalize};
use crate::domain::SeriesDescriptor;
use crate::error::DataError;
use crate::store::SeriesStore;

/// Date range requested from the provider (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl IngestWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DataError> {
        if start > end {
            return Err(DataError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Outcome of a single series in a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    Updated { n_obs: usize },
    Failed(DataError),
}

/// Per-series results of an ingestion run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub results: Vec<(String, SeriesOutcome)>,
}

impl IngestReport {
    pub fn updated(&self) -> impl Iterator<Item = (&str, usize)> {
        self.results.iter().filter_map(|(id, o)| match o {
            SeriesOutcome::Updated { n_obs } => Some((id.as_str(), *n_obs)),
            SeriesOutcome::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &DataError)> {
        self.results.iter().filter_map(|(id, o)| match o {
            SeriesOutcome::Failed(e) => Some((id.as_str(), e)),
            SeriesOutcome::Updated { .. } => None,
        })
    }

    pub fn updated_count(&self) -> usize {
        self.updated().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }
}

pub struct Ingestor<'a> {
    provider: &'a dyn SeriesProvider,
    store: &'a SeriesStore,
    window: IngestWindow,
    parallel: bool,
}

impl<'a> Ingestor<'a> {
    pub fn new(provider: &'a dyn SeriesProvider, store: &'a SeriesStore, window: IngestWindow) -> Self {
        Self {
            provider,
            store,
            window,
            parallel: false,
        }
    }

    /// Fetch series concurrently. Series are independent; the store
    /// serializes writes per identifier.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, series: &[&SeriesDescriptor]) -> IngestReport {
        info!(
            provider = self.provider.provider_name(),
            start = %self.window.start,
            end = %self.window.end,
            n_series = series.len(),
            parallel = self.parallel,
            "starting ingestion"
        );

        let results: Vec<(String, SeriesOutcome)> = if self.parallel {
            series
                .par_iter()
                .map(|d| (d.id.to_string(), self.ingest_one(d)))
                .collect()
        } else {
            series
                .iter()
                .map(|d| (d.id.to_string(), self.ingest_one(d)))
                .collect()
        };

        let report = IngestReport { results };
        info!(
            updated = report.updated_count(),
            failed = report.failed_count(),
            "data fetch complete"
        );
        report
    }

    fn ingest_one(&self, descriptor: &SeriesDescriptor) -> SeriesOutcome {
        info!(series = descriptor.id, label = descriptor.label, "fetching");
        match self.fetch_and_store(descriptor) {
            Ok(n_obs) => {
                info!(
                    series = descriptor.id,
                    n_obs,
                    path = %self.store.path_for(descriptor.id).display(),
                    "saved"
                );
                SeriesOutcome::Updated { n_obs }
            }
            Err(err) => {
                warn!(series = descriptor.id, error = %err, "ingestion failed; continuing");
                SeriesOutcome::Failed(err)
            }
        }
    }

    fn fetch_and_store(&self, descriptor: &SeriesDescriptor) -> Result<usize, DataError> {
        let raw = self
            .provider
            .get_series(descriptor.id, self.window.start, self.window.end)?;
        let series = normalize(raw, self.window.start, self.window.end);
        self.store.write(descriptor.id, &series)?;
        Ok(series.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::domain::catalog::{self, CATALOG};
    use crate::domain::Observation;

    /// In-memory provider: known ids return fixed rows, others fail like FRED's HTTP 400.
    struct FixedProvider {
        rows: HashMap<&'static str, Vec<Observation>>,
    }

    impl SeriesProvider for FixedProvider {
        fn provider_name(&self) -> &'static str {
            "fixed"
        }

        fn get_series(&self, series_id: &str, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Observation>, DataError> {
            self.rows
                .get(series_id)
                .cloned()
                .ok_or_else(|| DataError::provider(series_id, "request failed with status 400 Bad Request"))
        }
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn provider() -> FixedProvider {
        let mut rows = HashMap::new();
        // Deliberately unsorted with a duplicate, as a provider might return.
        rows.insert(
            "DGS10",
            vec![
                Observation::new(d(1, 3), 3.91),
                Observation::new(d(1, 2), 3.95),
                Observation::new(d(1, 5), 4.05),
                Observation::new(d(1, 3), 3.92),
            ],
        );
        rows.insert("DGS2", vec![Observation::new(d(1, 2), 4.33), Observation::new(d(1, 3), 4.30)]);
        FixedProvider { rows }
    }

    fn window() -> IngestWindow {
        IngestWindow::new(d(1, 1), d(1, 31)).unwrap()
    }

    #[test]
    fn window_rejects_inverted_range() {
        assert!(IngestWindow::new(d(2, 1), d(1, 1)).is_err());
        assert!(IngestWindow::new(d(1, 1), d(1, 1)).is_ok());
    }

    #[test]
    fn failures_are_isolated_per_series() {
        let dir = tempdir().unwrap();
        let store = SeriesStore::open(dir.path());
        let provider = provider();
        let series: Vec<_> = CATALOG.iter().collect();

        let report = Ingestor::new(&provider, &store, window()).run(&series);

        assert_eq!(report.results.len(), CATALOG.len());
        assert_eq!(report.updated_count(), 2);
        assert_eq!(report.failed_count(), CATALOG.len() - 2);
        assert_eq!(store.list().unwrap(), vec!["DGS10".to_string(), "DGS2".to_string()]);

        let dgs10 = store.require("DGS10").unwrap();
        let dates: Vec<_> = dgs10.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![d(1, 2), d(1, 3), d(1, 5)]);
        assert_eq!(dgs10.value_on(d(1, 3)), Some(3.92));
    }

    #[test]
    fn ingestion_is_idempotent_byte_for_byte() {
        let dir = tempdir().unwrap();
        let store = SeriesStore::open(dir.path());
        let provider = provider();
        let series = vec![catalog::lookup("DGS10").unwrap(), catalog::lookup("DGS2").unwrap()];

        Ingestor::new(&provider, &store, window()).run(&series);
        let first = fs::read(store.path_for("DGS10")).unwrap();

        Ingestor::new(&provider, &store, window()).run(&series);
        let second = fs::read(store.path_for("DGS10")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let seq_dir = tempdir().unwrap();
        let par_dir = tempdir().unwrap();
        let seq_store = SeriesStore::open(seq_dir.path());
        let par_store = SeriesStore::open(par_dir.path());
        let provider = provider();
        let series: Vec<_> = CATALOG.iter().collect();

        let seq = Ingestor::new(&provider, &seq_store, window()).run(&series);
        let par = Ingestor::new(&provider, &par_store, window()).parallel(true).run(&series);

        let ids = |r: &IngestReport| r.results.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&seq), ids(&par));
        assert_eq!(seq.updated_count(), par.updated_count());
        assert_eq!(
            fs::read(seq_store.path_for("DGS2")).unwrap(),
            fs::read(par_store.path_for("DGS2")).unwrap()
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let store = SeriesStore::open(dir.path());
        let aaa = catalog::lookup("AAA").unwrap();
        let previous = crate::domain::TimeSeries::new(vec![Observation::new(d(1, 2), 4.9)]).unwrap();
        store.write("AAA", &previous).unwrap();

        let report = Ingestor::new(&provider(), &store, window()).run(&[aaa]);

        assert_eq!(report.failed_count(), 1);
        assert_eq!(*store.require("AAA").unwrap(), previous);
    }
}
