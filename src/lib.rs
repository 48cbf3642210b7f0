//! `bond-analytics` library crate.
//!
//! The binary (`bonds`) is a thin wrapper around this library so that:
//!
//! - ingestion, storage and analytics are testable without spawning processes
//! - a presentation layer can consume the analytics results directly
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
