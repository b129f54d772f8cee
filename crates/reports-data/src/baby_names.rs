//! Extraction of yearly baby-name ranking tables from HTML pages.
//!
//! Each page carries a header such as `Popularity in 1990` and, as its third
//! `<table>`, a `Rank | Male name | Female name` table. Most pages omit the
//! closing `</tr>` tags; the HTML5 parser closes the implied rows, so the
//! structural path needs no repair logic of its own.

use std::sync::OnceLock;

use regex::Regex;
use reports_core::error::{ReportError, Result};
use reports_core::models::{ExtractMethod, RankRow, YearTable};
use reports_core::settings::BabyNamesConfig;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::discovery::{discover_yearly_files, read_input, YearFile};

// ── Public API ────────────────────────────────────────────────────────────────

/// Discover every ranking page under the configured directory and extract its
/// table with `method`. Results are sorted by year.
pub fn load_year_tables(config: &BabyNamesConfig, method: ExtractMethod) -> Result<Vec<YearTable>> {
    let pages = discover_yearly_files(&config.data_dir, &config.filename_prefix, &config.file_type)?;
    info!(
        "Scraping {} ranking pages from {} ({} method)",
        pages.len(),
        config.data_dir.display(),
        method
    );

    pages
        .iter()
        .map(|page| load_year_table(page, config, method))
        .collect()
}

/// Extract the ranking table of a single page.
pub fn load_year_table(
    page: &YearFile,
    config: &BabyNamesConfig,
    method: ExtractMethod,
) -> Result<YearTable> {
    let html = read_input(&page.path)?;
    let rows = match method {
        ExtractMethod::Parse => parse_page(&html, page.year, &page.file_name(), config)?,
        ExtractMethod::Regex => scan_page(&html),
    };
    debug!("{}: {} ranking rows", page.file_name(), rows.len());
    Ok(YearTable {
        year: page.year,
        rows,
    })
}

/// Structurally parse a ranking page.
///
/// Validates that the page's header year equals `expected_year` and that the
/// ranking table's columns are in the configured order (case-insensitive)
/// before reading rows.
pub fn parse_page(
    html: &str,
    expected_year: u16,
    file_name: &str,
    config: &BabyNamesConfig,
) -> Result<Vec<RankRow>> {
    let doc = Html::parse_document(html);

    validate_year(&doc, expected_year, file_name, &config.header_tags)?;

    let table_sel = selector("table")?;
    let table = doc
        .select(&table_sel)
        .nth(config.table_index)
        .ok_or_else(|| ReportError::TableNotFound {
            file: file_name.to_string(),
            index: config.table_index,
        })?;

    let tr_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;

    let mut table_rows = table.select(&tr_sel);

    let header: Vec<String> = table_rows
        .next()
        .map(|tr| {
            tr.select(&th_sel)
                .map(|th| cell_text(th).to_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let expected: Vec<String> = config
        .expected_columns
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();
    if header != expected {
        return Err(ReportError::UnexpectedColumns {
            file: file_name.to_string(),
            expected,
            found: header,
        });
    }

    let rows = table_rows
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
            if cells.len() < 3 {
                return None;
            }
            let rank = cells[0].parse::<u32>().ok()?;
            Some(RankRow {
                rank,
                male: cells[1].clone(),
                female: cells[2].clone(),
            })
        })
        .collect();

    Ok(rows)
}

/// Scan a ranking page's raw text for `<td>rank</td><td>male</td><td>female</td>`
/// runs without building a document tree.
pub fn scan_page(html: &str) -> Vec<RankRow> {
    static ROW_RE: OnceLock<Regex> = OnceLock::new();
    let re = ROW_RE.get_or_init(|| {
        Regex::new(r"<td>(\d+)</td><td>(\w+)</td><td>(\w+)</td>").expect("regex is valid")
    });

    re.captures_iter(html)
        .filter_map(|caps| {
            Some(RankRow {
                rank: caps[1].parse().ok()?,
                male: caps[2].to_string(),
                female: caps[3].to_string(),
            })
        })
        .collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Find the page year in the first header element (by tag priority) whose
/// text ends in four digits and compare it with the file-name year.
fn validate_year(doc: &Html, expected: u16, file_name: &str, header_tags: &[String]) -> Result<()> {
    for tag in header_tags {
        let sel = selector(tag)?;
        for el in doc.select(&sel) {
            let text = cell_text(el);
            let Some(found) = trailing_year(&text) else {
                continue;
            };
            if found != expected.to_string() {
                return Err(ReportError::YearMismatch {
                    file: file_name.to_string(),
                    expected,
                    found: found.to_string(),
                });
            }
            return Ok(());
        }
    }
    Err(ReportError::MissingYear {
        file: file_name.to_string(),
    })
}

/// The last four characters of `text` when they are all ASCII digits.
fn trailing_year(text: &str) -> Option<&str> {
    let start = text.len().checked_sub(4)?;
    let tail = text.get(start..)?;
    tail.bytes().all(|b| b.is_ascii_digit()).then_some(tail)
}

fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ReportError::Config(format!("invalid selector {css:?}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
