use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Tabular reports over baby-name ranking pages and FIX session logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flatfile-reports",
    about = "Tabular reports over baby-name ranking pages and FIX session logs",
    version
)]
pub struct Settings {
    /// JSON config file overriding the built-in input conventions
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that default report files are written to
    #[arg(long, default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", global = true, value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One sub-command per report.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Top N male and female names for every available year
    TopNames(TopNamesArgs),
    /// Rank of selected names across the available years
    NameTrends(NameTrendsArgs),
    /// Number of execution reports per order status (tag 39)
    OrderStatus(OrderStatusArgs),
    /// Final cumulative quantity per order for one symbol
    FillQuantities(FillQuantitiesArgs),
    /// Write the default config file
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TopNamesArgs {
    /// Directory containing the yearly HTML pages
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Number of names reported per year and gender
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Extraction method
    #[arg(long, default_value = "parse", value_parser = ["parse", "regex"])]
    pub method: String,

    /// Write the report to this `.xlsx` or `.csv` file instead of the console
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the report to `<output-dir>/top_names_report.xlsx`
    #[arg(long, conflicts_with = "output")]
    pub excel: bool,

    /// Worksheet name
    #[arg(long, default_value = "Top Names")]
    pub sheet: String,
}

#[derive(Args, Debug, Clone)]
pub struct NameTrendsArgs {
    /// Directory containing the yearly HTML pages
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Names to follow (repeatable)
    #[arg(long = "name", default_values_t = vec!["Ryan".to_string(), "Ben".to_string(), "Eugene".to_string()])]
    pub names: Vec<String>,

    /// Extraction method
    #[arg(long, default_value = "parse", value_parser = ["parse", "regex"])]
    pub method: String,

    /// Write the report to this `.xlsx` or `.csv` file instead of the console
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the report to `<output-dir>/name_trends_report.xlsx`
    #[arg(long, conflicts_with = "output")]
    pub excel: bool,

    /// Worksheet name
    #[arg(long, default_value = "Great Report")]
    pub sheet: String,

    /// Re-scrape the HTML pages even when cached ranks exist
    #[arg(long)]
    pub refresh: bool,

    /// Neither read nor write the rank cache
    #[arg(long)]
    pub no_cache: bool,

    /// Directory holding the rank cache (defaults to `~/.flatfile-reports/cache`)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct OrderStatusArgs {
    /// Directory containing the FIX log files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Order statuses to count, by name or code (repeatable)
    #[arg(long = "status", default_values_t = vec!["filled".to_string(), "partially-filled".to_string(), "canceled".to_string()])]
    pub statuses: Vec<String>,

    /// Extraction method
    #[arg(long, default_value = "parse", value_parser = ["parse", "regex"])]
    pub method: String,

    /// Field delimiter, overriding the config file
    #[arg(long, value_parser = ["soh", "pipe"])]
    pub delimiter: Option<String>,

    /// Write the report to this `.xlsx` or `.csv` file instead of the console
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the report to `<output-dir>/order_status_report.xlsx`
    #[arg(long, conflicts_with = "output")]
    pub excel: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FillQuantitiesArgs {
    /// Directory containing the FIX log files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Symbol (tag 55) to report on
    #[arg(long, default_value = "ES")]
    pub symbol: String,

    /// Extraction method
    #[arg(long, default_value = "parse", value_parser = ["parse", "regex"])]
    pub method: String,

    /// Field delimiter, overriding the config file
    #[arg(long, value_parser = ["soh", "pipe"])]
    pub delimiter: Option<String>,

    /// Write the report to this `.xlsx` or `.csv` file instead of the console
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the report to `<output-dir>/fill_quantities_report.xlsx`
    #[arg(long, conflicts_with = "output")]
    pub excel: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Where to write the default config
    #[arg(long)]
    pub write: PathBuf,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

/// Map the `--delimiter` choice onto the field separator character.
pub fn delimiter_from_name(name: &str) -> Result<char> {
    match name {
        "soh" => Ok('\u{1}'),
        "pipe" => Ok('|'),
        other => Err(ReportError::Config(format!("unknown delimiter: {other}"))),
    }
}

// ── ReportConfig ───────────────────────────────────────────────────────────────

/// Input conventions for the baby-name ranking pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BabyNamesConfig {
    pub data_dir: PathBuf,
    pub filename_prefix: String,
    pub file_type: String,
    /// Lowercase header texts of the ranking table, in order.
    pub expected_columns: Vec<String>,
    /// Header elements searched for the page year, highest priority first.
    pub header_tags: Vec<String>,
    /// Zero-based position of the ranking table among the page's tables.
    pub table_index: usize,
}

impl Default for BabyNamesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./python_baby_names"),
            filename_prefix: "baby".to_string(),
            file_type: ".html".to_string(),
            expected_columns: vec![
                "rank".to_string(),
                "male name".to_string(),
                "female name".to_string(),
            ],
            header_tags: vec!["h3".to_string(), "h2".to_string(), "h1".to_string()],
            table_index: 2,
        }
    }
}

/// Input conventions for the FIX session logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixLogConfig {
    pub data_dir: PathBuf,
    pub filename_prefix: String,
    pub file_type: String,
    /// Character offset where the message's useful tags begin.
    pub start_index: usize,
    pub delimiter: char,
    pub execution_report_tag: String,
}

impl Default for FixLogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./python_fix_logs"),
            filename_prefix: "FIX.4.2-CME-".to_string(),
            file_type: ".log".to_string(),
            start_index: 34,
            delimiter: '\u{1}',
            execution_report_tag: "35=8".to_string(),
        }
    }
}

/// File-backed configuration. Every field is optional in the JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub baby_names: BabyNamesConfig,
    pub fix_logs: FixLogConfig,
}

impl ReportConfig {
    /// Load the config from `path`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ReportError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        let config: ReportConfig = serde_json::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::default()),
        }
    }

    /// Atomically write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.fix_logs.start_index == 0 {
            return Err(ReportError::Config(
                "fix_logs.start_index must be greater than zero".to_string(),
            ));
        }
        if self.fix_logs.execution_report_tag.is_empty() {
            return Err(ReportError::Config(
                "fix_logs.execution_report_tag must not be empty".to_string(),
            ));
        }
        if self.baby_names.expected_columns.is_empty() {
            return Err(ReportError::Config(
                "baby_names.expected_columns must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
