//! Parquet encoding of a single series.
//!
//! Layout: two columns, `date` (Date, days since 1970-01-01) and `yield`
//! (Float64). Values are stored as raw IEEE doubles so a write → read cycle is
//! bit-exact. Files are written uncompressed, which also keeps the bytes
//! identical for identical inputs.

use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::domain::{Observation, TimeSeries};

pub const DATE_COLUMN: &str = "date";
pub const YIELD_COLUMN: &str = "yield";

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

pub fn to_frame(series: &TimeSeries) -> PolarsResult<DataFrame> {
    let days: Vec<i32> = series.observations().iter().map(|o| to_epoch_days(o.date)).collect();
    let values: Vec<f64> = series.observations().iter().map(|o| o.value).collect();

    let dates = Series::new(DATE_COLUMN.into(), days).cast(&DataType::Date)?;
    let values = Series::new(YIELD_COLUMN.into(), values);
    DataFrame::new(vec![Column::from(dates), Column::from(values)])
}

pub fn from_frame(df: &DataFrame) -> Result<TimeSeries, String> {
    let date_col = df
        .column(DATE_COLUMN)
        .map_err(|_| format!("missing '{DATE_COLUMN}' column"))?
        .as_materialized_series();
    if date_col.dtype() != &DataType::Date {
        return Err(format!("'{DATE_COLUMN}' column has type {}, expected date", date_col.dtype()));
    }
    let yield_col = df
        .column(YIELD_COLUMN)
        .map_err(|_| format!("missing '{YIELD_COLUMN}' column"))?
        .as_materialized_series();

    let days = date_col.cast(&DataType::Int32).map_err(|e| e.to_string())?;
    let days = days.i32().map_err(|e| e.to_string())?;
    let values = yield_col.f64().map_err(|e| e.to_string())?;

    let mut observations = Vec::with_capacity(df.height());
    for (day, value) in days.into_iter().zip(values.into_iter()) {
        let (Some(day), Some(value)) = (day, value) else {
            return Err("null entries are not allowed".to_string());
        };
        let date = from_epoch_days(day).ok_or_else(|| format!("date out of range: {day}"))?;
        observations.push(Observation::new(date, value));
    }

    TimeSeries::new(observations).map_err(|e| e.to_string())
}

pub fn write_file(path: &Path, series: &TimeSeries) -> Result<(), String> {
    let mut df = to_frame(series).map_err(|e| e.to_string())?;
    let mut file = File::create(path).map_err(|e| format!("failed to create '{}': {e}", path.display()))?;
    ParquetWriter::new(&mut file)
        .with_compression(ParquetCompression::Uncompressed)
        .finish(&mut df)
        .map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
    file.sync_all()
        .map_err(|e| format!("failed to flush '{}': {e}", path.display()))?;
    Ok(())
}

pub fn read_file(path: &Path) -> Result<TimeSeries, String> {
    let file = File::open(path).map_err(|e| format!("failed to open '{}': {e}", path.display()))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    from_frame(&df).map_err(|e| format!("malformed series file '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_conversion_round_trips() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(to_epoch_days(epoch), 0);
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(to_epoch_days(d), 10_957);
        assert_eq!(from_epoch_days(10_957), Some(d));
    }

    #[test]
    fn frame_is_self_describing() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ts = TimeSeries::new(vec![Observation::new(d, 4.68)]).unwrap();
        let df = to_frame(&ts).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["date", "yield"]);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("yield").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn frame_without_yield_column_is_rejected() {
        let dates = Series::new("date".into(), vec![19_000i32]).cast(&DataType::Date).unwrap();
        let other = Series::new("close".into(), vec![1.0f64]);
        let df = DataFrame::new(vec![Column::from(dates), Column::from(other)]).unwrap();
        let err = from_frame(&df).unwrap_err();
        assert!(err.contains("yield"));
    }
}
