//! Static catalog of the FRED series this tool ingests and analyzes.

use super::types::{Category, SeriesDescriptor};

const fn treasury(id: &'static str, label: &'static str, years: f64) -> SeriesDescriptor {
    SeriesDescriptor {
        id,
        label,
        category: Category::Treasury,
        maturity_years: Some(years),
    }
}

const fn other(id: &'static str, label: &'static str, category: Category) -> SeriesDescriptor {
    SeriesDescriptor {
        id,
        label,
        category,
        maturity_years: None,
    }
}

/// Every cataloged series, in ingestion order.
pub static CATALOG: [SeriesDescriptor; 13] = [
    treasury("DGS1MO", "1-Month Treasury", 1.0 / 12.0),
    treasury("DGS3MO", "3-Month Treasury", 3.0 / 12.0),
    treasury("DGS6MO", "6-Month Treasury", 6.0 / 12.0),
    treasury("DGS1", "1-Year Treasury", 1.0),
    treasury("DGS2", "2-Year Treasury", 2.0),
    treasury("DGS5", "5-Year Treasury", 5.0),
    treasury("DGS7", "7-Year Treasury", 7.0),
    treasury("DGS10", "10-Year Treasury", 10.0),
    treasury("DGS20", "20-Year Treasury", 20.0),
    treasury("DGS30", "30-Year Treasury", 30.0),
    other("AAA", "Moody's Aaa Corporate", Category::Corporate),
    other("BAA", "Moody's Baa Corporate", Category::Corporate),
    other("T10Y2Y", "10Y-2Y Spread", Category::Spread),
];

/// Series whose latest stored date drives the default analysis date.
pub const REFERENCE_SERIES: &str = "DGS10";

/// Treasury used as the benchmark in the corporate comparison.
pub const BENCHMARK_TREASURY: &str = "DGS10";

/// Corporate indices shown against the benchmark, high grade first.
pub const CORPORATE_SERIES: [&str; 2] = ["AAA", "BAA"];

/// Default series for the historical trend view.
pub const TREND_SERIES: [&str; 2] = ["DGS10", "T10Y2Y"];

/// Look up a descriptor by identifier (case-insensitive).
pub fn lookup(id: &str) -> Option<&'static SeriesDescriptor> {
    CATALOG.iter().find(|d| d.id.eq_ignore_ascii_case(id))
}

/// Treasury yield-curve members (descriptors with a maturity).
pub fn treasury_curve() -> Vec<&'static SeriesDescriptor> {
    CATALOG.iter().filter(|d| d.maturity_years.is_some()).collect()
}

/// Resolve a list of identifiers against the catalog, rejecting unknown ones.
pub fn resolve(ids: &[String]) -> Result<Vec<&'static SeriesDescriptor>, String> {
    ids.iter()
        .map(|id| lookup(id).ok_or_else(|| format!("Unknown series '{id}'.")))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifiers_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn only_treasuries_carry_maturities() {
        for d in &CATALOG {
            assert_eq!(d.maturity_years.is_some(), d.category == Category::Treasury, "{}", d.id);
        }
        assert_eq!(treasury_curve().len(), 10);
        assert_eq!(CATALOG.iter().filter(|d| d.category == Category::Corporate).count(), 2);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("dgs10").map(|d| d.id), Some("DGS10"));
        assert!(lookup("DGS4").is_none());
        assert_eq!(lookup("DGS3MO").and_then(|d| d.maturity_years), Some(0.25));
    }

    #[test]
    fn resolve_rejects_unknown_ids() {
        assert!(resolve(&["DGS2".into(), "BAA".into()]).is_ok());
        let err = resolve(&["DGS2".into(), "NOPE".into()]).unwrap_err();
        assert!(err.contains("NOPE"));
    }
}
