//! FRED API integration for daily yield series.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{Observation, TimeSeries};
use crate::error::DataError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 100_000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Source of raw series observations.
///
/// Implementations must return observations for `[start, end]`. Ordering is
/// not required; [`normalize`] takes care of it.
pub trait SeriesProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn get_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, DataError>;
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DataError::InvalidInput(format!("failed to build FRED http client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

impl SeriesProvider for FredClient {
    fn provider_name(&self) -> &'static str {
        "fred"
    }

    fn get_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, DataError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
                ("limit", &OBS_LIMIT.to_string()),
            ])
            .send()
            .map_err(|e| DataError::provider(series_id, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(DataError::provider(
                series_id,
                format!("request failed with status {}", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| DataError::provider(series_id, format!("failed to parse response: {e}")))?;

        parse_observations(series_id, body.observations)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

fn parse_observations(series_id: &str, raw: Vec<RawObservation>) -> Result<Vec<Observation>, DataError> {
    let mut out = Vec::with_capacity(raw.len());
    for obs in raw {
        let Some(value) = parse_value(series_id, &obs.value)? else {
            continue;
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| DataError::provider(series_id, format!("invalid date '{}': {e}", obs.date)))?;
        out.push(Observation::new(date, value));
    }
    Ok(out)
}

/// FRED encodes "no observation" (holidays etc.) as `.`; those rows are skipped.
fn parse_value(series_id: &str, raw: &str) -> Result<Option<f64>, DataError> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return Ok(None);
    }
    let v = trimmed
        .parse::<f64>()
        .map_err(|e| DataError::provider(series_id, format!("invalid value '{trimmed}': {e}")))?;
    if v.is_finite() {
        Ok(Some(v))
    } else {
        Err(DataError::provider(series_id, format!("non-finite value '{trimmed}'")))
    }
}

/// Turn raw provider rows into a store-ready series.
///
/// Rows outside `[start, end]` are dropped, the rest are sorted ascending and
/// de-duplicated by date. No interpolation: source gaps stay gaps.
pub fn normalize(observations: Vec<Observation>, start: NaiveDate, end: NaiveDate) -> TimeSeries {
    let in_range = observations
        .into_iter()
        .filter(|o| o.date >= start && o.date <= end)
        .collect();
    TimeSeries::from_unordered(in_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, value: &str) -> RawObservation {
        RawObservation {
            date: date.to_string(),
            value: value.to_string(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_payload_and_skips_missing_markers() {
        let json = r#"{"observations":[
            {"realtime_start":"2024-01-05","date":"2024-01-01","value":"."},
            {"realtime_start":"2024-01-05","date":"2024-01-02","value":"3.95"},
            {"realtime_start":"2024-01-05","date":"2024-01-03","value":"3.91"}
        ]}"#;
        let body: ObservationsResponse = serde_json::from_str(json).unwrap();
        let obs = parse_observations("DGS10", body.observations).unwrap();
        assert_eq!(
            obs,
            vec![
                Observation::new(d(2024, 1, 2), 3.95),
                Observation::new(d(2024, 1, 3), 3.91),
            ]
        );
    }

    #[test]
    fn malformed_rows_fail_the_series() {
        let err = parse_observations("DGS10", vec![raw("2024-13-01", "3.9")]).unwrap_err();
        assert!(matches!(err, DataError::Provider { ref series, .. } if series == "DGS10"));

        let err = parse_observations("DGS10", vec![raw("2024-01-02", "abc")]).unwrap_err();
        assert!(err.to_string().contains("invalid value"));

        assert!(parse_observations("DGS10", vec![raw("2024-01-02", "inf")]).is_err());
    }

    #[test]
    fn normalize_orders_dedupes_and_clips_without_filling_gaps() {
        let obs = vec![
            Observation::new(d(2024, 1, 8), 4.1),
            Observation::new(d(2023, 12, 29), 3.8),
            Observation::new(d(2024, 1, 5), 4.0),
            Observation::new(d(2024, 1, 2), 3.9),
            Observation::new(d(2024, 1, 5), 4.05),
        ];
        let ts = normalize(obs, d(2024, 1, 1), d(2024, 1, 31));
        let dates: Vec<_> = ts.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 5), d(2024, 1, 8)]);
        assert_eq!(ts.value_on(d(2024, 1, 5)), Some(4.05));
    }
}
