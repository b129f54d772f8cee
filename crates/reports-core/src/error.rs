use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No input file in the directory matched the naming convention.
    #[error("No files matching {pattern} found in {dir}")]
    NoDataFiles { dir: PathBuf, pattern: String },

    /// An input file name does not follow `<prefix><YYYY><suffix>`.
    #[error("File \"{file}\" is not in a valid format: {reason}")]
    InvalidFileName { file: String, reason: String },

    /// No header element carrying a 4-digit year was found in the page.
    #[error("Did not extract a valid year from the HTML in \"{file}\"")]
    MissingYear { file: String },

    /// The year in the page header differs from the year in the file name.
    #[error("Year \"{found}\" != \"{expected}\" in \"{file}\"")]
    YearMismatch {
        file: String,
        expected: u16,
        found: String,
    },

    /// The ranking table is not present at the configured index.
    #[error("File \"{file}\" has no table at index {index}")]
    TableNotFound { file: String, index: usize },

    /// The ranking table's header columns are not in the expected order.
    #[error("File \"{file}\" does not have the expected column order: expected {expected:?}, found {found:?}")]
    UnexpectedColumns {
        file: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A required FIX tag is absent from a matching message.
    #[error("Tag {tag} was not in the message at {file}:{line}")]
    MissingTag { file: String, line: usize, tag: u32 },

    /// A FIX tag carried a value that could not be interpreted.
    #[error("Tag {tag} has invalid value \"{value}\" at {file}:{line}")]
    InvalidTagValue {
        file: String,
        line: usize,
        tag: u32,
        value: String,
    },

    /// An order status name or code is not a FIX 4.2 `OrdStatus`.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// An extraction method name is not recognised.
    #[error("Invalid extraction method: {0}")]
    InvalidMethod(String),

    /// The requested output destination cannot be used.
    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    /// The spreadsheet writer failed.
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// The CSV writer failed.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ReportError::FileRead {
            path: PathBuf::from("/some/baby1990.html"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/baby1990.html"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = ReportError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_data_files() {
        let err = ReportError::NoDataFiles {
            dir: PathBuf::from("/empty/dir"),
            pattern: "baby*.html".to_string(),
        };
        assert_eq!(err.to_string(), "No files matching baby*.html found in /empty/dir");
    }

    #[test]
    fn test_error_display_invalid_file_name() {
        let err = ReportError::InvalidFileName {
            file: "baby19x0.html".to_string(),
            reason: "year must be 4 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "File \"baby19x0.html\" is not in a valid format: year must be 4 digits"
        );
    }

    #[test]
    fn test_error_display_year_mismatch() {
        let err = ReportError::YearMismatch {
            file: "baby1990.html".to_string(),
            expected: 1990,
            found: "1992".to_string(),
        };
        assert_eq!(err.to_string(), "Year \"1992\" != \"1990\" in \"baby1990.html\"");
    }

    #[test]
    fn test_error_display_missing_tag() {
        let err = ReportError::MissingTag {
            file: "FIX.4.2-CME-a.log".to_string(),
            line: 12,
            tag: 11,
        };
        assert_eq!(
            err.to_string(),
            "Tag 11 was not in the message at FIX.4.2-CME-a.log:12"
        );
    }

    #[test]
    fn test_error_display_unexpected_columns() {
        let err = ReportError::UnexpectedColumns {
            file: "baby2000.html".to_string(),
            expected: vec!["rank".to_string()],
            found: vec!["name".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("does not have the expected column order"));
        assert!(msg.contains("\"rank\""));
        assert!(msg.contains("\"name\""));
    }

    #[test]
    fn test_error_display_config() {
        let err = ReportError::Config("start_index must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: start_index must be positive"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
