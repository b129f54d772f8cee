//! Input file discovery.
//!
//! Both report families read every file in one directory whose name starts
//! with a fixed prefix and ends with a fixed suffix. Ranking pages additionally
//! carry a 4-digit year between the two.

use std::path::{Path, PathBuf};

use reports_core::error::{ReportError, Result};
use tracing::debug;

/// A ranking page together with the year encoded in its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: u16,
    pub path: PathBuf,
}

impl YearFile {
    /// The bare file name, used in error messages.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Find the files directly inside `dir` named `<prefix>…<suffix>`, sorted by
/// file name.
///
/// Sub-directories are not searched. An entry named like an input file that
/// cannot be read (a dangling link, a permission error) is an error rather
/// than a silently missing input.
pub fn find_input_files(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReportError::DataPathNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf);
                // Errors on the directory itself, or on an entry named like an
                // input file, abort discovery.
                let relevant = err.depth() == 0
                    || path
                        .as_deref()
                        .and_then(|p| p.file_name())
                        .and_then(|n| n.to_str())
                        .map_or(true, |name| matches_pattern(name, prefix, suffix));
                if !relevant {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
                return Err(ReportError::FileRead {
                    path: path.unwrap_or_else(|| dir.to_path_buf()),
                    source: err.into(),
                });
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non-UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if entry.file_type().is_file() && matches_pattern(name, prefix, suffix) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(ReportError::NoDataFiles {
            dir: dir.to_path_buf(),
            pattern: format!("{prefix}*{suffix}"),
        });
    }

    files.sort();
    debug!("Found {} input files in {}", files.len(), dir.display());
    Ok(files)
}

/// Extract the 4-digit year between `prefix` and `suffix` in `file_name`.
pub fn year_from_file_name(file_name: &str, prefix: &str, suffix: &str) -> Result<u16> {
    let invalid = |reason: &str| ReportError::InvalidFileName {
        file: file_name.to_string(),
        reason: reason.to_string(),
    };

    let middle = file_name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .ok_or_else(|| invalid("missing prefix or suffix"))?;

    if middle.len() != 4 || !middle.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("year must be exactly 4 digits"));
    }

    middle
        .parse::<u16>()
        .map_err(|_| invalid("year must be exactly 4 digits"))
}

/// Discover the yearly ranking pages in `dir`, sorted by year.
pub fn discover_yearly_files(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<YearFile>> {
    let mut pages = find_input_files(dir, prefix, suffix)?
        .into_iter()
        .map(|path| {
            let year = year_from_file_name(&display_name(&path), prefix, suffix)?;
            Ok(YearFile { year, path })
        })
        .collect::<Result<Vec<_>>>()?;

    pages.sort_by_key(|p| p.year);
    Ok(pages)
}

/// Read a whole input file, attaching the path to any I/O error.
pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn matches_pattern(name: &str, prefix: &str, suffix: &str) -> bool {
    name.len() >= prefix.len() + suffix.len() && name.starts_with(prefix) && name.ends_with(suffix)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
