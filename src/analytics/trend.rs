//! Historical trends: full stored series side by side, plus derived spreads.

use tracing::warn;

use crate::domain::{Observation, SeriesDescriptor, TrendSeries};
use crate::error::DataError;
use crate::store::SeriesStore;

/// Full stored history for each series, unmodified and in input order.
///
/// Series with no file, an empty file, or a file that cannot be decoded are
/// omitted.
pub fn historical_trends(
    store: &SeriesStore,
    series: &[&SeriesDescriptor],
) -> Result<Vec<TrendSeries>, DataError> {
    let mut out = Vec::with_capacity(series.len());
    for descriptor in series {
        let stored = match store.read(descriptor.id) {
            Ok(stored) => stored,
            Err(err @ DataError::Storage { .. }) => {
                warn!(series = descriptor.id, error = %err, "unreadable series omitted from trends");
                continue;
            }
            Err(err) => return Err(err),
        };
        match stored {
            Some(ts) if !ts.is_empty() => out.push(TrendSeries {
                series: descriptor.id.to_string(),
                label: descriptor.label.to_string(),
                observations: ts.observations().to_vec(),
            }),
            Some(_) => warn!(series = descriptor.id, "stored series is empty; omitted from trends"),
            None => warn!(series = descriptor.id, "no stored file; omitted from trends"),
        }
    }
    Ok(out)
}

/// `minuend − subtrahend` on every date both series share.
///
/// Both series must be stored. The result may be empty if they never overlap.
pub fn spread_between(
    store: &SeriesStore,
    minuend: &SeriesDescriptor,
    subtrahend: &SeriesDescriptor,
) -> Result<TrendSeries, DataError> {
    let a = store.require(minuend.id)?;
    let b = store.require(subtrahend.id)?;

    // Both sides are strictly ascending, so a merge walk finds common dates.
    let (a, b) = (a.observations(), b.observations());
    let (mut i, mut j) = (0, 0);
    let mut observations = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                observations.push(Observation::new(a[i].date, a[i].value - b[j].value));
                i += 1;
                j += 1;
            }
        }
    }

    Ok(TrendSeries {
        series: format!("{}-{}", minuend.id, subtrahend.id),
        label: format!("{} minus {}", minuend.label, subtrahend.label),
        observations,
    })
}
