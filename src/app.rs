//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - loads settings and parses CLI arguments
//! - dispatches to ingestion or one of the analytics commands
//! - prints tables/JSON and writes optional exports

use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, DateArgs, IngestArgs, PortfolioArgs, TrendArgs, parse_spread_pair};
use crate::config::Settings;
use crate::data::IngestWindow;
use crate::domain::Portfolio;
use crate::error::AppError;

pub mod pipeline;

/// Calendar days offered for analysis, counting back from the latest stored date.
const SELECTABLE_DAYS: usize = 365;

use pipeline::Session;

/// Entry point for the `bonds` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = crate::cli::Cli::parse();
    let settings = Settings::from_env()?;

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| settings.data_dir.clone());
    let session = Session::open(data_dir);

    match cli.command {
        Command::Ingest(args) => handle_ingest(&session, &settings, args),
        Command::Curve(args) => handle_curve(&session, args),
        Command::Credit(args) => handle_credit(&session, args),
        Command::Trend(args) => handle_trend(&session, args),
        Command::Portfolio(args) => handle_portfolio(&session, args),
        Command::Status => handle_status(&session),
    }
}

/// Logs go to stderr (filtered by `RUST_LOG`, default `info`) so stdout
/// carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn handle_ingest(session: &Session, settings: &Settings, args: IngestArgs) -> Result<(), AppError> {
    let start = args.start.unwrap_or(settings.start_date);
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let window = IngestWindow::new(start, end)?;
    info!(%start, %end, data_dir = %session.store().data_dir().display(), "ingestion window");

    let provider = pipeline::fred_provider(settings.require_api_key()?)?;
    let report = session.ingest(&provider, window, &args.series, args.parallel)?;

    print!("{}", crate::report::format_ingest_report(&report));
    Ok(())
}

fn handle_curve(session: &Session, args: DateArgs) -> Result<(), AppError> {
    let date = session.resolve_date(args.date)?;
    let curve = session.curve(date)?;
    emit(&curve, &args, crate::report::format_curve)
}

fn handle_credit(session: &Session, args: DateArgs) -> Result<(), AppError> {
    let date = session.resolve_date(args.date)?;
    let cmp = session.credit(date)?;
    emit(&cmp, &args, crate::report::format_credit)
}

fn handle_trend(session: &Session, args: TrendArgs) -> Result<(), AppError> {
    let spreads = args
        .spreads
        .iter()
        .map(|raw| parse_spread_pair(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::new(2, e))?;

    let trends = session.trends(&args.series, &spreads)?;

    if let Some(path) = &args.export {
        crate::io::write_trends_csv(path, &trends)?;
        info!(path = %path.display(), n_series = trends.len(), "trends exported");
    }

    if args.json {
        crate::io::print_json(&trends)
    } else {
        print!("{}", crate::report::format_trends(&trends));
        Ok(())
    }
}

fn handle_portfolio(session: &Session, args: PortfolioArgs) -> Result<(), AppError> {
    let portfolio = match &args.file {
        Some(path) => crate::io::read_portfolio_json(path)?,
        None => Portfolio::sample(),
    };
    let date = session.resolve_date(args.date.date)?;
    let report = session.portfolio(&portfolio, date, args.investment)?;
    emit(&report, &args.date, crate::report::format_portfolio)
}

fn handle_status(session: &Session) -> Result<(), AppError> {
    let rows = session.status()?;
    print!("{}", crate::report::format_status(&rows));
    if let Ok(latest) = session.resolve_date(None) {
        let window = crate::analytics::date_window(latest, SELECTABLE_DAYS);
        if let Some(oldest) = window.last() {
            println!("Selectable analysis dates: {oldest} .. {latest} ({} days)", window.len());
        }
    }
    Ok(())
}

/// Print `value` as JSON or as a table, and optionally save it as JSON.
fn emit<T: Serialize>(value: &T, args: &DateArgs, table: impl FnOnce(&T) -> String) -> Result<(), AppError> {
    if let Some(path) = &args.out {
        crate::io::write_json(path, value)?;
        info!(path = %path.display(), "result written");
    }
    if args.json {
        crate::io::print_json(value)
    } else {
        print!("{}", table(value));
        Ok(())
    }
}
