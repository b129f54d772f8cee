//! Spreadsheet (`.xlsx`) output.

use std::path::Path;

use reports_core::error::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::table::{Cell, Report, ReportTable};

/// Blank rows left between stacked tables.
pub const TABLE_GAP: u32 = 2;

/// A value as it lands in the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Number(f64),
    Text(String),
}

/// One cell write: position, value and whether it is bold.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub row: u32,
    pub col: u16,
    pub value: SheetValue,
    pub bold: bool,
}

/// Write `report` to a single worksheet at `path`, tables stacked top to
/// bottom.
pub fn save(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&report.sheet_name)?;

    for cell in plan(report) {
        write_cell(worksheet, &cell, &bold)?;
    }
    worksheet.autofit();

    workbook.save(path)?;
    Ok(())
}

/// Every cell write for `report`, in row order.
///
/// Titles and headers are bold text, integers are numbers, missing values are
/// the text `N/A`, and the totals row is bold.
pub fn plan(report: &Report) -> Vec<PlannedCell> {
    let mut cells = Vec::new();
    for (table, start) in report.tables.iter().zip(start_rows(report)) {
        plan_table(&mut cells, table, start);
    }
    cells
}

/// First row (title row) of every table in the worksheet.
pub fn start_rows(report: &Report) -> Vec<u32> {
    let mut row = 0u32;
    report
        .tables
        .iter()
        .map(|table| {
            let start = row;
            row += table_height(table) + TABLE_GAP;
            start
        })
        .collect()
}

/// Rows a table occupies: title, header, body.
fn table_height(table: &ReportTable) -> u32 {
    2 + table.body().count() as u32
}

fn plan_table(cells: &mut Vec<PlannedCell>, table: &ReportTable, start: u32) {
    cells.push(PlannedCell {
        row: start,
        col: 0,
        value: SheetValue::Text(table.title.clone()),
        bold: true,
    });
    for (col, heading) in table.header.iter().enumerate() {
        cells.push(PlannedCell {
            row: start + 1,
            col: col as u16,
            value: SheetValue::Text(heading.clone()),
            bold: true,
        });
    }

    let mut row = start + 2;
    for values in &table.rows {
        plan_row(cells, row, values, false);
        row += 1;
    }
    if let Some(totals) = &table.totals {
        plan_row(cells, row, totals, true);
    }
}

fn plan_row(cells: &mut Vec<PlannedCell>, row: u32, values: &[Cell], bold: bool) {
    for (col, cell) in values.iter().enumerate() {
        let value = match cell {
            Cell::Integer(n) => SheetValue::Number(*n as f64),
            other => SheetValue::Text(other.plain()),
        };
        cells.push(PlannedCell {
            row,
            col: col as u16,
            value,
            bold,
        });
    }
}

fn write_cell(worksheet: &mut Worksheet, cell: &PlannedCell, bold: &Format) -> Result<()> {
    match (&cell.value, cell.bold) {
        (SheetValue::Number(n), true) => {
            worksheet.write_number_with_format(cell.row, cell.col, *n, bold)?;
        }
        (SheetValue::Number(n), false) => {
            worksheet.write_number(cell.row, cell.col, *n)?;
        }
        (SheetValue::Text(s), true) => {
            worksheet.write_string_with_format(cell.row, cell.col, s, bold)?;
        }
        (SheetValue::Text(s), false) => {
            worksheet.write_string(cell.row, cell.col, s)?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
