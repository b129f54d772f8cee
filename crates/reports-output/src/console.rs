//! Plain-text rendering of reports for the terminal.

use unicode_width::UnicodeWidthStr;

use crate::table::{Cell, Report, ReportTable};

const COLUMN_GAP: &str = "  ";

/// Render every table of `report`, separated by a blank line.
pub fn render(report: &Report) -> String {
    report
        .tables
        .iter()
        .map(render_table)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one table: title, header, rule, rows, and a ruled-off totals row.
///
/// Text columns are left-aligned and numbers right-aligned; widths are
/// measured in terminal columns so non-ASCII names line up.
pub fn render_table(table: &ReportTable) -> String {
    let columns = table.column_count();
    let mut widths = vec![0usize; columns];
    for (i, h) in table.header.iter().enumerate() {
        widths[i] = widths[i].max(h.width());
    }
    for row in table.body() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.display().width());
        }
    }

    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);

    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');

    let header: Vec<Cell> = table.header.iter().map(|h| Cell::from(h.as_str())).collect();
    out.push_str(&render_row(&header, &widths));
    out.push_str(&rule);
    out.push('\n');

    for row in &table.rows {
        out.push_str(&render_row(row, &widths));
    }
    if let Some(totals) = &table.totals {
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&render_row(totals, &widths));
    }
    out
}

fn render_row(cells: &[Cell], widths: &[usize]) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| match cells.get(i) {
            Some(cell) => pad(&cell.display(), width, cell.is_numeric()),
            None => " ".repeat(width),
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    format!("{}\n", line.trim_end())
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right_align {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
