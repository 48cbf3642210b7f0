//! Runtime settings sourced from the environment (and `.env`, if present).
//!
//! Only the application layer reads these; the store, ingestion and analytics
//! modules receive plain values.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::AppError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_START_DATE: &str = "2000-01-01";

#[derive(Debug, Clone)]
pub struct Settings {
    pub fred_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub start_date: NaiveDate,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let start_raw = non_empty("BONDS_START_DATE").unwrap_or_else(|| DEFAULT_START_DATE.to_string());
        let start_date = parse_date(&start_raw)
            .map_err(|e| AppError::new(2, format!("Invalid BONDS_START_DATE: {e}")))?;

        Ok(Self {
            fred_api_key: non_empty("FRED_API_KEY"),
            data_dir: non_empty("BONDS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            start_date,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.fred_api_key
            .as_deref()
            .ok_or_else(|| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))
    }
}

/// Parse a `YYYY-MM-DD` date (also used as a clap value parser).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.start_date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert!(s.require_api_key().is_err());
    }

    #[test]
    fn env_values_override_defaults() {
        let s = settings(&[
            ("FRED_API_KEY", "abc123"),
            ("BONDS_DATA_DIR", "/tmp/yields"),
            ("BONDS_START_DATE", "2015-06-30"),
        ])
        .unwrap();
        assert_eq!(s.require_api_key().unwrap(), "abc123");
        assert_eq!(s.data_dir, PathBuf::from("/tmp/yields"));
        assert_eq!(s.start_date, NaiveDate::from_ymd_opt(2015, 6, 30).unwrap());
    }

    #[test]
    fn blank_key_counts_as_missing_and_bad_date_is_rejected() {
        assert!(settings(&[("FRED_API_KEY", "  ")]).unwrap().fred_api_key.is_none());
        let err = settings(&[("BONDS_START_DATE", "06/30/2015")]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
