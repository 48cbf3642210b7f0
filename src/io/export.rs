//! Export trend series to CSV.
//!
//! Long format (`series,date,yield`) so series of different lengths share one
//! file and load directly into spreadsheets or dataframes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::TrendSeries;
use crate::error::AppError;

pub fn write_trends_csv(path: &Path, trends: &[TrendSeries]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_trends(BufWriter::new(file), trends)
}

fn write_trends<W: Write>(mut out: W, trends: &[TrendSeries]) -> Result<(), AppError> {
    writeln!(out, "series,date,yield")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for trend in trends {
        for obs in &trend.observations {
            // `{}` on f64 prints the shortest repr that parses back exactly.
            writeln!(out, "{},{},{}", trend.series, obs.date, obs.value)
                .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    out.flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Observation;

    #[test]
    fn writes_long_format_rows() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let trends = vec![
            TrendSeries {
                series: "DGS10".into(),
                label: "10-Year Treasury".into(),
                observations: vec![Observation::new(d(2), 3.95), Observation::new(d(3), 3.91)],
            },
            TrendSeries {
                series: "T10Y2Y".into(),
                label: "10Y-2Y Spread".into(),
                observations: vec![Observation::new(d(2), -0.38)],
            },
        ];

        let mut buf = Vec::new();
        write_trends(&mut buf, &trends).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "series,date,yield\nDGS10,2024-01-02,3.95\nDGS10,2024-01-03,3.91\nT10Y2Y,2024-01-02,-0.38\n"
        );
    }
}
