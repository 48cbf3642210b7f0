//! Yield-curve snapshot for a single date.
//!
//! Series without an observation on the exact date are left out of the curve
//! (no forward/backward fill). A partial curve is still a useful curve; only
//! an entirely empty one is reported as an error. A member whose file cannot
//! be decoded is set aside like a missing one.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{CurvePoint, SeriesDescriptor, YieldCurveSnapshot};
use crate::error::DataError;
use crate::store::SeriesStore;

/// Build the curve for `date` from the maturity-bearing series in `series`.
///
/// Descriptors without a maturity are ignored. Points come back in strictly
/// ascending maturity order regardless of the input order.
pub fn assemble_yield_curve(
    store: &SeriesStore,
    date: NaiveDate,
    series: &[&SeriesDescriptor],
) -> Result<YieldCurveSnapshot, DataError> {
    let mut points = Vec::new();
    let mut excluded = Vec::new();
    let mut missing = Vec::new();
    let mut unreadable = Vec::new();
    let mut first_storage_error = None;

    for descriptor in series {
        let Some(maturity_years) = descriptor.maturity_years else {
            continue;
        };
        let stored = match store.read(descriptor.id) {
            Ok(stored) => stored,
            Err(err @ DataError::Storage { .. }) => {
                warn!(series = descriptor.id, error = %err, "unreadable series left out of curve");
                unreadable.push(descriptor.id.to_string());
                if first_storage_error.is_none() {
                    first_storage_error = Some(err);
                }
                continue;
            }
            Err(err) => return Err(err),
        };
        match stored {
            None => missing.push(descriptor.id.to_string()),
            Some(ts) => match ts.value_on(date) {
                Some(yield_pct) => points.push(CurvePoint {
                    series: descriptor.id.to_string(),
                    maturity_years,
                    yield_pct,
                }),
                None => excluded.push(descriptor.id.to_string()),
            },
        }
    }

    if !missing.is_empty() {
        warn!(%date, series = ?missing, "curve series have no stored file");
    }

    if points.is_empty() {
        if !excluded.is_empty() {
            return Err(DataError::NoDataForDate { date, series: excluded });
        }
        if let Some(err) = first_storage_error {
            return Err(err);
        }
        if !missing.is_empty() {
            return Err(DataError::MissingSeries { series: missing.join(", ") });
        }
        return Err(DataError::InvalidInput("no maturity-bearing series requested".into()));
    }

    if !excluded.is_empty() {
        warn!(%date, series = ?excluded, "no observation on date; excluded from curve");
    }

    points.sort_by(|a, b| a.maturity_years.total_cmp(&b.maturity_years));
    points.dedup_by(|b, a| a.maturity_years == b.maturity_years);

    Ok(YieldCurveSnapshot {
        date,
        points,
        excluded,
        missing,
        unreadable,
    })
}
