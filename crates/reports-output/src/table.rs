//! Output-agnostic report tables.
//!
//! A [`Report`] is a stack of titled tables sharing one worksheet. The
//! console, xlsx and CSV writers all lay it out top to bottom.

use reports_core::formatting;

/// Placeholder shown for a value that does not exist (e.g. an unranked name).
pub const MISSING: &str = "N/A";

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Integer(u64),
    Missing,
}

impl Cell {
    /// Plain text for delimited output: integers without separators.
    pub fn plain(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Missing => MISSING.to_string(),
        }
    }

    /// Text for the console: integers grouped by thousands.
    pub fn display(&self) -> String {
        match self {
            Cell::Integer(n) => formatting::format_count(*n),
            other => other.plain(),
        }
    }

    /// Numbers are right-aligned on the console.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Integer(_) | Cell::Missing)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Integer(value)
    }
}

impl From<Option<u32>> for Cell {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Cell::Missing, |v| Cell::Integer(u64::from(v)))
    }
}

/// A titled table with one header row, data rows, and an optional totals row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub totals: Option<Vec<Cell>>,
}

impl ReportTable {
    pub fn new<S: Into<String>>(title: impl Into<String>, header: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            totals: None,
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn with_totals(mut self, totals: Vec<Cell>) -> Self {
        self.totals = Some(totals);
        self
    }

    /// Data rows followed by the totals row, if any.
    pub fn body(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.rows.iter().chain(self.totals.iter())
    }

    /// Widest row, header included.
    pub fn column_count(&self) -> usize {
        self.body()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// A complete report destined for one worksheet or one console run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sheet_name: String,
    pub tables: Vec<ReportTable>,
}

impl Report {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            tables: Vec::new(),
        }
    }

    pub fn push_table(&mut self, table: ReportTable) {
        self.tables.push(table);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_plain_and_display() {
        assert_eq!(Cell::Integer(12_345).plain(), "12345");
        assert_eq!(Cell::Integer(12_345).display(), "12,345");
        assert_eq!(Cell::Missing.display(), "N/A");
        assert_eq!(Cell::from("Ryan").display(), "Ryan");
    }

    #[test]
    fn test_cell_from_option_rank() {
        assert_eq!(Cell::from(Some(3u32)), Cell::Integer(3));
        assert_eq!(Cell::from(None::<u32>), Cell::Missing);
    }

    #[test]
    fn test_table_body_includes_totals() {
        let mut table = ReportTable::new("Fills", ["Order Id", "Qty"]);
        table.push_row(vec![Cell::from("A1"), Cell::from(5u64)]);
        let table = table.with_totals(vec![Cell::from("TOTAL"), Cell::from(5u64)]);

        assert_eq!(table.body().count(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_column_count_uses_widest_row() {
        let mut table = ReportTable::new("Top", ["Year"]);
        table.push_row(vec![Cell::from("1990"), Cell::from("Michael"), Cell::from("Ryan")]);
        assert_eq!(table.column_count(), 3);
    }
}
