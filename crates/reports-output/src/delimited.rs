//! CSV output, laid out like the worksheet: title, header, rows, and two
//! empty records between tables.

use std::path::Path;

use reports_core::error::Result;

use crate::table::Report;
use crate::xlsx::TABLE_GAP;

/// Write `report` to `path` as CSV.
pub fn save(report: &Report, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    for (i, table) in report.tables.iter().enumerate() {
        if i > 0 {
            for _ in 0..TABLE_GAP {
                writer.write_record([""])?;
            }
        }
        writer.write_record([table.title.as_str()])?;
        writer.write_record(&table.header)?;
        for row in table.body() {
            writer.write_record(row.iter().map(|c| c.plain()))?;
        }
    }

    writer.flush()?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
