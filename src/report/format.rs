//! Plain-text terminal output.
//!
//! Formatting lives here so analytics code returns data only and output
//! changes stay localized.

use crate::analytics::PortfolioReport;
use crate::data::{IngestReport, SeriesOutcome};
use crate::domain::{CreditComparison, SeriesDescriptor, TrendSeries, YieldCurveSnapshot};
use crate::store::StoredSeriesInfo;

/// Render maturities like `1M`, `6M`, `2Y`.
pub fn maturity_label(years: f64) -> String {
    if years < 1.0 {
        format!("{}M", (years * 12.0).round() as i64)
    } else {
        format!("{}Y", years.round() as i64)
    }
}

pub fn format_curve(curve: &YieldCurveSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Treasury Yield Curve - {} ===\n", curve.date));
    out.push_str(&format!("{:<8} {:>9} {:>10}\n", "Series", "Maturity", "Yield (%)"));
    for p in &curve.points {
        out.push_str(&format!(
            "{:<8} {:>9} {:>10.2}\n",
            p.series,
            maturity_label(p.maturity_years),
            p.yield_pct
        ));
    }
    if !curve.excluded.is_empty() {
        out.push_str(&format!("No observation on {}: {}\n", curve.date, curve.excluded.join(", ")));
    }
    if !curve.missing.is_empty() {
        out.push_str(&format!("Not stored (run `bonds ingest`): {}\n", curve.missing.join(", ")));
    }
    if !curve.unreadable.is_empty() {
        out.push_str(&format!("Unreadable files: {}\n", curve.unreadable.join(", ")));
    }
    out
}

pub fn format_credit(cmp: &CreditComparison) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Corporate vs Treasury - {} ===\n", cmp.date));
    for e in &cmp.entries {
        out.push_str(&format!("{:<24} {:>7} {:>8.2}%\n", e.label, e.series, e.yield_pct));
    }
    if let Some(spread) = cmp.quality_spread {
        out.push_str(&format!("Baa - Aaa quality spread: {spread:.2} pp\n"));
    }
    for (series, spread) in &cmp.spreads_over_treasury {
        out.push_str(&format!("{series} over treasury: {spread:.2} pp\n"));
    }
    out
}

pub fn format_trends(trends: &[TrendSeries]) -> String {
    let mut out = String::new();
    out.push_str("=== Historical Trends ===\n");
    out.push_str(&format!(
        "{:<12} {:>6} {:>11} {:>11} {:>8} {:>8} {:>8}\n",
        "Series", "Obs", "First", "Last", "Min", "Max", "Latest"
    ));
    for t in trends {
        let (Some(first), Some(last)) = (t.observations.first(), t.observations.last()) else {
            out.push_str(&format!("{:<12} {:>6}\n", t.series, 0));
            continue;
        };
        let min = t.observations.iter().map(|o| o.value).fold(f64::INFINITY, f64::min);
        let max = t.observations.iter().map(|o| o.value).fold(f64::NEG_INFINITY, f64::max);
        out.push_str(&format!(
            "{:<12} {:>6} {:>11} {:>11} {:>8.2} {:>8.2} {:>8.2}\n",
            t.series,
            t.observations.len(),
            first.date,
            last.date,
            min,
            max,
            last.value
        ));
    }
    out
}

pub fn format_portfolio(report: &PortfolioReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str(&format!("=== Portfolio Summary - {} ===\n", stats.date));
    out.push_str(&format!(
        "{:<8} {:>7} {:>9} {:>10} {:>8} {:>9} {:>14}\n",
        "Series", "Weight", "Yield(%)", "Face", "Coupon", "W.Yield", "Allocation"
    ));
    for p in &stats.positions {
        out.push_str(&format!(
            "{:<8} {:>7.2} {:>9.2} {:>10.2} {:>8.2} {:>9.4} {:>14.2}\n",
            p.series, p.weight, p.yield_pct, p.face_value, p.coupon, p.weighted_yield, p.allocation
        ));
    }
    out.push_str(&format!("Average Weighted Yield: {:.2}%\n", stats.average_weighted_yield));
    out.push_str(&format!("Total Portfolio Value: ${:.2}\n", stats.total_value));
    out.push_str(&format!(
        "Estimated Annual Income: ${:.2} on ${:.2} invested\n",
        stats.estimated_annual_income, stats.investment
    ));
    for w in &report.warnings {
        out.push_str(&format!("Warning: {w}\n"));
    }
    out
}

pub fn format_ingest_report(report: &IngestReport) -> String {
    let mut out = String::new();
    for (id, outcome) in &report.results {
        match outcome {
            SeriesOutcome::Updated { n_obs } => out.push_str(&format!("{id:<8} ok      {n_obs} observations\n")),
            SeriesOutcome::Failed(err) => out.push_str(&format!("{id:<8} FAILED  {err}\n")),
        }
    }
    out.push_str(&format!(
        "{} of {} series updated.\n",
        report.updated_count(),
        report.results.len()
    ));
    out
}

/// Catalog coverage: one row per descriptor, with `None` for series not stored.
pub fn format_status(rows: &[(&SeriesDescriptor, Option<StoredSeriesInfo>)]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<24} {:<10} {:>6} {:>11} {:>11}\n",
        "Series", "Label", "Category", "Obs", "First", "Last"
    ));
    let mut stored = 0;
    for (d, info) in rows {
        let date = |v: Option<chrono::NaiveDate>| v.map(|x| x.to_string()).unwrap_or_else(|| "-".into());
        match info {
            Some(info) => {
                stored += 1;
                out.push_str(&format!(
                    "{:<8} {:<24} {:<10} {:>6} {:>11} {:>11}\n",
                    d.id,
                    d.label,
                    d.category.display_name(),
                    info.n_obs,
                    date(info.first),
                    date(info.last)
                ));
            }
            None => out.push_str(&format!(
                "{:<8} {:<24} {:<10} {:>6}\n",
                d.id,
                d.label,
                d.category.display_name(),
                "missing"
            )),
        }
    }
    out.push_str(&format!("{stored} of {} cataloged series stored.\n", rows.len()));
    out
}
