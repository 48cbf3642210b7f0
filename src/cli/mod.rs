//! Command-line parsing for the bond analytics tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! ingestion, storage and analytics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::parse_date;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bonds", version, about = "Treasury/corporate yield ingestion and analytics (FRED-based)")]
pub struct Cli {
    /// Directory holding one Parquet file per series (overrides BONDS_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch cataloged series from FRED and overwrite their stored files.
    Ingest(IngestArgs),
    /// Treasury yield curve for a date.
    Curve(DateArgs),
    /// Corporate (Aaa/Baa) vs 10-year treasury for a date.
    Credit(DateArgs),
    /// Full stored history of selected series, optionally with derived spreads.
    Trend(TrendArgs),
    /// Weighted yield, allocation and income of a portfolio on a date.
    Portfolio(PortfolioArgs),
    /// Show which cataloged series are stored and their date ranges.
    Status,
}

#[derive(Debug, Args, Clone)]
pub struct IngestArgs {
    /// First observation date (default: BONDS_START_DATE or 2000-01-01).
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last observation date (default: today).
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Restrict ingestion to these series (repeatable). Default: whole catalog.
    #[arg(long = "series", value_name = "ID")]
    pub series: Vec<String>,

    /// Fetch series concurrently.
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DateArgs {
    /// Analysis date (default: latest stored DGS10 date).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Also write the result as JSON to this file.
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TrendArgs {
    /// Series to include (repeatable). Default: DGS10 and T10Y2Y.
    #[arg(long = "series", value_name = "ID")]
    pub series: Vec<String>,

    /// Derived spread `A:B` = A − B on common dates (repeatable).
    #[arg(long = "spread", value_name = "A:B")]
    pub spreads: Vec<String>,

    /// Write all trend rows to a CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print JSON instead of a summary table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PortfolioArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Portfolio definition (JSON). Default: built-in sample portfolio.
    #[arg(long, value_name = "JSON")]
    pub file: Option<PathBuf>,

    /// Total amount invested, used for dollar allocation and income.
    #[arg(long, default_value_t = 1_000_000.0)]
    pub investment: f64,
}

/// Split an `A:B` spread argument into its two identifiers.
pub fn parse_spread_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(format!("Invalid spread '{raw}', expected A:B (e.g. DGS10:DGS2).")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ingest_flags() {
        let cli = Cli::parse_from([
            "bonds", "--data-dir", "/tmp/d", "ingest", "--start", "2020-01-01", "--series", "DGS10", "--series",
            "BAA", "--parallel",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 1, 1));
                assert_eq!(args.end, None);
                assert_eq!(args.series, vec!["DGS10", "BAA"]);
                assert!(args.parallel);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn portfolio_flattens_date_args() {
        let cli = Cli::parse_from(["bonds", "portfolio", "--date", "2024-03-01", "--json"]);
        match cli.command {
            Command::Portfolio(args) => {
                assert_eq!(args.date.date, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert!(args.date.json);
                assert_eq!(args.investment, 1_000_000.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["bonds", "curve", "--date", "03/01/2024"]).is_err());
    }

    #[test]
    fn spread_pairs() {
        assert_eq!(parse_spread_pair("DGS10:DGS2").unwrap(), ("DGS10".into(), "DGS2".into()));
        assert!(parse_spread_pair("DGS10").is_err());
        assert!(parse_spread_pair(":DGS2").is_err());
    }
}
