//! Data ingestion layer for the flat-file reports.
//!
//! Discovers input files, extracts ranking tables from HTML pages and
//! execution reports from FIX logs, aggregates them, and caches scraped
//! name ranks between runs.

pub mod aggregator;
pub mod baby_names;
pub mod discovery;
pub mod fix_log;
pub mod rank_cache;

pub use reports_core as core;
