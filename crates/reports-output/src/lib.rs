//! Output layer for the flat-file reports.
//!
//! Models reports as stacked titled tables and renders them to the console,
//! to `.xlsx` workbooks, or to `.csv` files.

pub mod console;
pub mod delimited;
pub mod destination;
pub mod table;
pub mod xlsx;

pub use destination::{emit_to, Destination};
pub use table::{Cell, Report, ReportTable};
