//! Data acquisition.
//!
//! - provider trait + FRED client + payload normalization (`fred`)
//! - catalog-wide ingestion runs into the store (`ingest`)

pub mod fred;
pub mod ingest;

pub use fred::{FredClient, SeriesProvider};
pub use ingest::{IngestReport, IngestWindow, Ingestor, SeriesOutcome};
