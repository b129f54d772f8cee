//! Where a report goes: the console, or a spreadsheet or CSV file.

use std::io::Write;
use std::path::{Path, PathBuf};

use reports_core::error::{ReportError, Result};
use tracing::info;

use crate::table::Report;
use crate::{console, delimited, xlsx};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console,
    Xlsx(PathBuf),
    Csv(PathBuf),
}

impl Destination {
    /// Pick the destination for a run.
    ///
    /// * An explicit `output` path must end in `.xlsx` or `.csv`.
    /// * `excel` without a path writes `<output_dir>/<default_stem>_report.xlsx`.
    /// * Otherwise the report is printed.
    pub fn resolve(
        output: Option<&Path>,
        excel: bool,
        output_dir: &Path,
        default_stem: &str,
    ) -> Result<Self> {
        if let Some(path) = output {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            return match ext.as_deref() {
                Some("xlsx") => Ok(Destination::Xlsx(path.to_path_buf())),
                Some("csv") => Ok(Destination::Csv(path.to_path_buf())),
                _ => Err(ReportError::InvalidOutput(format!(
                    "{} must end with \".xlsx\" or \".csv\"",
                    path.display()
                ))),
            };
        }
        if excel {
            return Ok(Destination::Xlsx(default_output_path(output_dir, default_stem)));
        }
        Ok(Destination::Console)
    }

    /// `true` when the run produces a file.
    pub fn writes_file(&self) -> bool {
        !matches!(self, Destination::Console)
    }
}

/// `<output_dir>/<stem>_report.xlsx`
pub fn default_output_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}_report.xlsx"))
}

/// Send `report` to `destination`, echoing console output or the created
/// file's path to `out`.
pub fn emit_to<W: Write>(report: &Report, destination: &Destination, out: &mut W) -> Result<()> {
    match destination {
        Destination::Console => {
            write!(out, "{}", console::render(report))?;
        }
        Destination::Xlsx(path) => {
            ensure_parent(path)?;
            xlsx::save(report, path)?;
            info!("Created: {}", path.display());
            writeln!(out, "Created: {}", path.display())?;
        }
        Destination::Csv(path) => {
            ensure_parent(path)?;
            delimited::save(report, path)?;
            info!("Created: {}", path.display());
            writeln!(out, "Created: {}", path.display())?;
        }
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
