//! Shared types for the flat-file reports.
//!
//! Holds the error type, CLI settings and config file, the domain models for
//! ranking tables and FIX execution reports, and small formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{ReportError, Result};
