//! Analytics over stored series.
//!
//! Every operation is stateless: it takes a store, a date and the series it
//! needs, and returns a plain result value. Nothing here is persisted.
//!
//! - yield-curve assembly (`curve`)
//! - historical trends and derived spreads (`trend`)
//! - portfolio statistics (`portfolio`)
//! - corporate vs treasury comparison (`credit`)

use chrono::{Duration, NaiveDate};

use crate::error::DataError;
use crate::store::SeriesStore;

pub mod credit;
pub mod curve;
pub mod portfolio;
pub mod trend;

pub use credit::credit_comparison;
pub use curve::assemble_yield_curve;
pub use portfolio::{PortfolioReport, PortfolioWarning, WEIGHT_TOLERANCE, portfolio_stats};
pub use trend::{historical_trends, spread_between};

/// Latest stored observation date of `reference`.
///
/// `Ok(None)` when the series is stored but empty.
pub fn latest_date(store: &SeriesStore, reference: &str) -> Result<Option<NaiveDate>, DataError> {
    Ok(store.require(reference)?.last_date())
}

/// `days` consecutive calendar dates ending at `latest`, newest first.
pub fn date_window(latest: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days)
        .map_while(|i| latest.checked_sub_signed(Duration::days(i as i64)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::{d, store_with};
    use super::*;

    #[test]
    fn latest_date_uses_reference_series() {
        let (_dir, store) = store_with(&[("DGS10", &[(d(1, 2), 3.9), (d(1, 5), 4.0)])]);
        assert_eq!(latest_date(&store, "DGS10").unwrap(), Some(d(1, 5)));
        assert!(matches!(
            latest_date(&store, "DGS2"),
            Err(DataError::MissingSeries { .. })
        ));
    }

    #[test]
    fn date_window_counts_back_from_latest() {
        let window = date_window(d(3, 1), 365);
        assert_eq!(window.len(), 365);
        assert_eq!(window[0], d(3, 1));
        assert_eq!(window[1], d(2, 29));
        assert!(window.windows(2).all(|w| w[0] > w[1]));
    }
}
