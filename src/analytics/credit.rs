//! Corporate vs treasury yields on one date.
//!
//! Moody's Aaa/Baa indices next to the benchmark treasury. High-grade vs
//! lower-grade corporates is also a common stand-in for an ESG tilt.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{CreditComparison, CreditEntry, SeriesDescriptor};
use crate::error::DataError;
use crate::store::SeriesStore;

/// Compare `corporates` (high grade first) against `benchmark` on `date`.
///
/// Series without an observation on `date` (or without a readable file) are
/// left out.
/// If nothing is available the result is [`DataError::NoDataForDate`].
pub fn credit_comparison(
    store: &SeriesStore,
    date: NaiveDate,
    corporates: &[&SeriesDescriptor],
    benchmark: &SeriesDescriptor,
) -> Result<CreditComparison, DataError> {
    let mut entries = Vec::new();
    let mut unavailable = Vec::new();
    for descriptor in corporates.iter().chain(std::iter::once(&benchmark)) {
        let stored = match store.read(descriptor.id) {
            Ok(stored) => stored,
            Err(err @ DataError::Storage { .. }) => {
                warn!(series = descriptor.id, error = %err, "unreadable series left out of comparison");
                None
            }
            Err(err) => return Err(err),
        };
        match stored.and_then(|ts| ts.value_on(date)) {
            Some(yield_pct) => entries.push(CreditEntry {
                series: descriptor.id.to_string(),
                label: descriptor.label.to_string(),
                yield_pct,
            }),
            None => unavailable.push(descriptor.id.to_string()),
        }
    }

    if entries.is_empty() {
        return Err(DataError::NoDataForDate { date, series: unavailable });
    }
    if !unavailable.is_empty() {
        warn!(%date, series = ?unavailable, "no observation on date; left out of comparison");
    }

    let value_of = |id: &str| entries.iter().find(|e| e.series == id).map(|e| e.yield_pct);

    let quality_spread = match corporates {
        [high, .., low] => value_of(high.id).zip(value_of(low.id)).map(|(h, l)| l - h),
        _ => None,
    };

    let spreads_over_treasury = match value_of(benchmark.id) {
        Some(treasury) => corporates
            .iter()
            .filter_map(|c| value_of(c.id).map(|y| (c.id.to_string(), y - treasury)))
            .collect(),
        None => Vec::new(),
    };

    Ok(CreditComparison {
        date,
        entries,
        quality_spread,
        spreads_over_treasury,
    })
}
