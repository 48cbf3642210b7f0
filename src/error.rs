use chrono::NaiveDate;

/// Failure taxonomy of the ingestion, storage and analytics layers.
///
/// These errors carry enough structure for callers to degrade gracefully
/// (e.g. a missing file vs. a date with no observation). The CLI converts
/// them into [`AppError`] at the boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// The external provider could not deliver a series.
    #[error("provider error for {series}: {message}")]
    Provider { series: String, message: String },

    /// No persisted file exists for the series.
    #[error("no stored data for series {series}")]
    MissingSeries { series: String },

    /// The series exist but none (or not all) have an observation on `date`.
    #[error("no data for {date} in series {}", series.join(", "))]
    NoDataForDate { date: NaiveDate, series: Vec<String> },

    /// Reading or writing a persisted series failed.
    #[error("storage error for {series}: {message}")]
    Storage { series: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DataError {
    pub fn provider(series: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            series: series.to_string(),
            message: message.into(),
        }
    }

    pub fn storage(series: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            series: series.to_string(),
            message: message.into(),
        }
    }

    /// Exit code used when this error ends the process.
    pub fn exit_code(&self) -> u8 {
        match self {
            DataError::InvalidInput(_) => 2,
            DataError::MissingSeries { .. } | DataError::NoDataForDate { .. } => 3,
            DataError::Provider { .. } | DataError::Storage { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_exit_codes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let missing: AppError = DataError::MissingSeries { series: "DGS10".into() }.into();
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(missing.to_string(), "no stored data for series DGS10");

        let no_data: AppError = DataError::NoDataForDate {
            date,
            series: vec!["DGS1".into(), "BAA".into()],
        }
        .into();
        assert_eq!(no_data.exit_code(), 3);
        assert_eq!(no_data.to_string(), "no data for 2024-03-01 in series DGS1, BAA");

        let provider: AppError = DataError::provider("XYZ", "HTTP 400").into();
        assert_eq!(provider.exit_code(), 4);
    }
}
