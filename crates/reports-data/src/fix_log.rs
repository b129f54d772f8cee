//! Scanning of FIX session logs for execution reports.
//!
//! Every log line is one message of `tag=value` fields separated by a
//! delimiter (SOH by default). Lines start with a fixed-width session prefix,
//! so the message type `35=8` is looked for in a short window right after it.
//! Tags of interest to the reports (39, 55) sit near the end of a message and
//! are searched backwards.

use std::collections::HashMap;
use std::path::PathBuf;

use regex::Regex;
use reports_core::error::{ReportError, Result};
use reports_core::models::{ExtractMethod, OrdStatus, OrderFill, StatusCount};
use reports_core::settings::FixLogConfig;
use tracing::{debug, info};

use crate::aggregator;
use crate::discovery::{display_name, find_input_files, read_input};

const ORD_STATUS_PREFIX: &str = "39=";
const CL_ORD_ID_TAG: u32 = 11;
const CUM_QTY_TAG: u32 = 14;

// ── FixScanner ────────────────────────────────────────────────────────────────

/// Field-level access to FIX log lines.
#[derive(Debug, Clone)]
pub struct FixScanner {
    start_index: usize,
    delimiter: char,
    execution_report_tag: String,
}

impl FixScanner {
    pub fn new(start_index: usize, delimiter: char, execution_report_tag: impl Into<String>) -> Self {
        Self {
            start_index,
            delimiter,
            execution_report_tag: execution_report_tag.into(),
        }
    }

    pub fn from_config(config: &FixLogConfig) -> Self {
        Self::new(
            config.start_index,
            config.delimiter,
            config.execution_report_tag.clone(),
        )
    }

    /// `true` when the execution-report tag occurs within
    /// `line[start_index .. min(2 * start_index, len)]`.
    pub fn is_execution_report(&self, line: &str) -> bool {
        let bytes = line.as_bytes();
        let end = (self.start_index * 2).min(bytes.len());
        if self.start_index >= end {
            return false;
        }
        let needle = self.execution_report_tag.as_bytes();
        bytes[self.start_index..end]
            .windows(needle.len())
            .any(|w| w == needle)
    }

    /// Split a message into its `tag=value` fields.
    pub fn split_tags<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(self.delimiter).collect()
    }

    /// Count execution reports per order status in `contents`.
    ///
    /// Only the last `39=` field of each execution report is considered, and
    /// only statuses listed in `wanted` are counted.
    pub fn count_statuses(&self, contents: &str, wanted: &[OrdStatus]) -> HashMap<OrdStatus, u64> {
        let mut counts: HashMap<OrdStatus, u64> = HashMap::new();
        for line in contents.lines() {
            if !self.is_execution_report(line) {
                continue;
            }
            let tags = self.split_tags(line);
            let Some(status) = tags
                .iter()
                .rev()
                .find_map(|tag| tag.strip_prefix(ORD_STATUS_PREFIX))
                .and_then(single_char)
                .and_then(OrdStatus::from_code)
            else {
                continue;
            };
            if wanted.contains(&status) {
                *counts.entry(status).or_default() += 1;
            }
        }
        counts
    }

    /// Regex variant of [`FixScanner::count_statuses`]: counts every
    /// `39=<code>` field in the file whose code is in `wanted`.
    pub fn count_statuses_regex(
        &self,
        contents: &str,
        wanted: &[OrdStatus],
    ) -> Result<HashMap<OrdStatus, u64>> {
        let mut counts: HashMap<OrdStatus, u64> = HashMap::new();
        if wanted.is_empty() {
            return Ok(counts);
        }

        let delim = regex::escape(&self.delimiter.to_string());
        let codes: String = wanted
            .iter()
            .map(|s| regex::escape(&s.code().to_string()))
            .collect();
        let re = compile(&format!(r"(?m)(?:^|{delim})39=([{codes}])(?:{delim}|$)"))?;

        for caps in re.captures_iter(contents) {
            if let Some(status) = single_char(&caps[1]).and_then(OrdStatus::from_code) {
                *counts.entry(status).or_default() += 1;
            }
        }
        Ok(counts)
    }

    /// Collect `(order id, cumulative quantity)` observations from execution
    /// reports for `symbol_tag` (e.g. `55=ES`).
    ///
    /// A matching message without tag 11 or tag 14 aborts the scan.
    pub fn collect_fills(
        &self,
        contents: &str,
        symbol_tag: &str,
        file: &str,
    ) -> Result<Vec<(String, u64)>> {
        let mut observations = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if !self.is_execution_report(line) {
                continue;
            }
            let tags = self.split_tags(line);
            if !tags.iter().rev().any(|tag| *tag == symbol_tag) {
                continue;
            }

            let line_no = index + 1;
            let order_id = last_value(&tags, CL_ORD_ID_TAG).ok_or_else(|| {
                ReportError::MissingTag {
                    file: file.to_string(),
                    line: line_no,
                    tag: CL_ORD_ID_TAG,
                }
            })?;
            let raw_qty = last_value(&tags, CUM_QTY_TAG).ok_or_else(|| ReportError::MissingTag {
                file: file.to_string(),
                line: line_no,
                tag: CUM_QTY_TAG,
            })?;
            let qty = raw_qty
                .parse::<u64>()
                .map_err(|_| ReportError::InvalidTagValue {
                    file: file.to_string(),
                    line: line_no,
                    tag: CUM_QTY_TAG,
                    value: raw_qty.to_string(),
                })?;

            observations.push((order_id.to_string(), qty));
        }
        Ok(observations)
    }

    /// Regex variant of [`FixScanner::collect_fills`]. Lines for the symbol
    /// that lack a word-like order id or an integer quantity are skipped.
    pub fn collect_fills_regex(&self, contents: &str, symbol_tag: &str) -> Result<Vec<(String, u64)>> {
        let delim = regex::escape(&self.delimiter.to_string());
        let order_re = compile(&format!(r"(?:^|{delim})11=(?P<order_id>\w+)"))?;
        let qty_re = compile(&format!(r"(?:^|{delim})14=(?P<qty>\d+)"))?;
        let symbol_re = compile(&format!(
            r"(?:^|{delim}){}(?:{delim}|$)",
            regex::escape(symbol_tag)
        ))?;

        let mut observations = Vec::new();
        for line in contents.lines() {
            if !self.is_execution_report(line) || !symbol_re.is_match(line) {
                continue;
            }
            let order_id = order_re
                .captures_iter(line)
                .last()
                .map(|c| c["order_id"].to_string());
            let qty = qty_re
                .captures_iter(line)
                .last()
                .and_then(|c| c["qty"].parse::<u64>().ok());
            match (order_id, qty) {
                (Some(id), Some(q)) => observations.push((id, q)),
                _ => debug!("Skipping execution report without order id or quantity"),
            }
        }
        Ok(observations)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Count execution reports per requested order status across every log file.
/// The result keeps the order of `wanted`.
pub fn load_status_counts(
    config: &FixLogConfig,
    wanted: &[OrdStatus],
    method: ExtractMethod,
) -> Result<Vec<StatusCount>> {
    let scanner = FixScanner::from_config(config);
    let mut totals: HashMap<OrdStatus, u64> = HashMap::new();

    for path in log_files(config)? {
        let contents = read_input(&path)?;
        let counts = match method {
            ExtractMethod::Parse => scanner.count_statuses(&contents, wanted),
            ExtractMethod::Regex => scanner.count_statuses_regex(&contents, wanted)?,
        };
        debug!("{}: {:?}", display_name(&path), counts);
        for (status, n) in counts {
            *totals.entry(status).or_default() += n;
        }
    }

    Ok(aggregator::status_counts(wanted, &totals))
}

/// Final cumulative quantity per order for `symbol` across every log file,
/// sorted by order id.
pub fn load_order_fills(
    config: &FixLogConfig,
    symbol: &str,
    method: ExtractMethod,
) -> Result<Vec<OrderFill>> {
    let scanner = FixScanner::from_config(config);
    let symbol_tag = symbol_tag(symbol);
    let mut observations = Vec::new();

    for path in log_files(config)? {
        let contents = read_input(&path)?;
        let found = match method {
            ExtractMethod::Parse => {
                scanner.collect_fills(&contents, &symbol_tag, &display_name(&path))?
            }
            ExtractMethod::Regex => scanner.collect_fills_regex(&contents, &symbol_tag)?,
        };
        debug!("{}: {} execution reports for {}", display_name(&path), found.len(), symbol_tag);
        observations.extend(found);
    }

    Ok(aggregator::finish_fills(observations))
}

/// Normalise a symbol (`ES`) or full tag (`55=ES`) to the full tag.
pub fn symbol_tag(symbol: &str) -> String {
    if symbol.starts_with("55=") {
        symbol.to_string()
    } else {
        format!("55={symbol}")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn log_files(config: &FixLogConfig) -> Result<Vec<PathBuf>> {
    let files = find_input_files(&config.data_dir, &config.filename_prefix, &config.file_type)?;
    info!(
        "Scanning {} FIX logs in {}",
        files.len(),
        config.data_dir.display()
    );
    Ok(files)
}

/// Value of the last field carrying `tag` in a split message.
fn last_value<'a>(tags: &[&'a str], tag: u32) -> Option<&'a str> {
    let prefix = format!("{tag}=");
    tags.iter()
        .rev()
        .copied()
        .find_map(|t| t.strip_prefix(prefix.as_str()))
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ReportError::Config(format!("invalid pattern: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// 34-character session prefix preceding the message fields.
    const PREFIX: &str = "20200101-09:30:00.000 : 8=FIX.4.2";

    /// Build a log line from `fields`, joined with SOH after the prefix.
    fn message(fields: &[&str]) -> String {
        let mut line = String::from(PREFIX);
        for field in fields {
            line.push('\u{1}');
            line.push_str(field);
        }
        line
    }

    fn exec_report(order_id: &str, status: char, cum_qty: u64, symbol: &str) -> String {
        message(&[
            "9=200",
            "35=8",
            "34=12",
            &format!("11={order_id}"),
            &format!("14={cum_qty}"),
            &format!("39={status}"),
            &format!("55={symbol}"),
            "10=123",
        ])
    }

    fn write_log(dir: &Path, name: &str, lines: &[String]) {
        std::fs::write(dir.join(name), lines.join("\n") + "\n").unwrap();
    }

    fn scanner() -> FixScanner {
        FixScanner::from_config(&FixLogConfig::default())
    }

    fn config_for(dir: &Path) -> FixLogConfig {
        FixLogConfig {
            data_dir: dir.to_path_buf(),
            ..FixLogConfig::default()
        }
    }

    #[test]
    fn test_prefix_is_start_index_wide() {
        assert_eq!(PREFIX.len(), FixLogConfig::default().start_index - 1);
    }

    // ── is_execution_report ───────────────────────────────────────────────────

    #[test]
    fn test_is_execution_report() {
        assert!(scanner().is_execution_report(&exec_report("A1", '2', 10, "ES")));
        let heartbeat = message(&["9=60", "35=0", "34=2", "10=001"]);
        assert!(!scanner().is_execution_report(&heartbeat));
    }

    #[test]
    fn test_is_execution_report_ignores_tag_outside_window() {
        let padding = "58=".to_string() + &"x".repeat(60);
        let late = message(&["9=60", &padding, "35=8", "10=001"]);
        assert!(!scanner().is_execution_report(&late));
    }

    #[test]
    fn test_is_execution_report_short_line() {
        assert!(!scanner().is_execution_report("35=8"));
        assert!(!scanner().is_execution_report(""));
    }

    // ── count_statuses ────────────────────────────────────────────────────────

    #[test]
    fn test_count_statuses_only_wanted() {
        let contents = [
            exec_report("A1", '0', 0, "ES"),
            exec_report("A1", '1', 5, "ES"),
            exec_report("A1", '2', 10, "ES"),
            exec_report("B1", '4', 0, "NQ"),
            exec_report("C1", '2', 3, "ES"),
        ]
        .join("\n");
        let wanted = [OrdStatus::Filled, OrdStatus::PartiallyFilled, OrdStatus::Canceled];

        let counts = scanner().count_statuses(&contents, &wanted);
        assert_eq!(counts.get(&OrdStatus::Filled), Some(&2));
        assert_eq!(counts.get(&OrdStatus::PartiallyFilled), Some(&1));
        assert_eq!(counts.get(&OrdStatus::Canceled), Some(&1));
        assert_eq!(counts.get(&OrdStatus::New), None);
    }

    #[test]
    fn test_count_statuses_skips_non_execution_reports() {
        let order_cancel = message(&["9=80", "35=F", "34=3", "11=A1", "39=4", "10=010"]);
        let counts = scanner().count_statuses(&order_cancel, &[OrdStatus::Canceled]);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_count_statuses_regex_agrees_with_scan() {
        let contents = [
            exec_report("A1", '1', 5, "ES"),
            exec_report("A1", '2', 10, "ES"),
            exec_report("B1", '4', 0, "NQ"),
            exec_report("C1", '8', 0, "ES"),
        ]
        .join("\n");
        let wanted = [OrdStatus::Filled, OrdStatus::PartiallyFilled, OrdStatus::Canceled];

        let scanned = scanner().count_statuses(&contents, &wanted);
        let matched = scanner().count_statuses_regex(&contents, &wanted).unwrap();
        assert_eq!(scanned, matched);
    }

    #[test]
    fn test_count_statuses_regex_ignores_longer_tags() {
        let line = message(&["35=8", "139=2", "10=001"]);
        let counts = scanner()
            .count_statuses_regex(&line, &[OrdStatus::Filled])
            .unwrap();
        assert!(counts.is_empty());
    }

    // ── collect_fills ─────────────────────────────────────────────────────────

    #[test]
    fn test_collect_fills_filters_symbol() {
        let contents = [
            exec_report("A1", '1', 5, "ES"),
            exec_report("B1", '2', 7, "NQ"),
            exec_report("A1", '2', 10, "ES"),
        ]
        .join("\n");

        let fills = scanner().collect_fills(&contents, "55=ES", "t.log").unwrap();
        assert_eq!(
            fills,
            vec![("A1".to_string(), 5), ("A1".to_string(), 10)]
        );
    }

    #[test]
    fn test_collect_fills_symbol_must_match_whole_field() {
        let contents = exec_report("A1", '2', 10, "ESZ0");
        let fills = scanner().collect_fills(&contents, "55=ES", "t.log").unwrap();
        assert!(fills.is_empty());
    }

    #[test]
    fn test_collect_fills_missing_order_id() {
        let line = message(&["9=100", "35=8", "14=5", "39=1", "55=ES", "10=1"]);
        let err = scanner().collect_fills(&line, "55=ES", "t.log").unwrap_err();
        match err {
            ReportError::MissingTag { tag, line, file } => {
                assert_eq!(tag, 11);
                assert_eq!(line, 1);
                assert_eq!(file, "t.log");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collect_fills_missing_cum_qty() {
        let line = message(&["9=100", "35=8", "11=A1", "39=1", "55=ES", "10=1"]);
        let err = scanner().collect_fills(&line, "55=ES", "t.log").unwrap_err();
        assert!(matches!(err, ReportError::MissingTag { tag: 14, .. }));
    }

    #[test]
    fn test_collect_fills_invalid_cum_qty() {
        let line = message(&["9=100", "35=8", "11=A1", "14=lots", "55=ES", "10=1"]);
        let err = scanner().collect_fills(&line, "55=ES", "t.log").unwrap_err();
        assert!(matches!(err, ReportError::InvalidTagValue { tag: 14, .. }));
    }

    #[test]
    fn test_collect_fills_regex_agrees_with_scan() {
        let contents = [
            exec_report("A1", '1', 5, "ES"),
            exec_report("B1", '2', 7, "NQ"),
            exec_report("A1", '2', 10, "ES"),
        ]
        .join("\n");

        let scanned = scanner().collect_fills(&contents, "55=ES", "t.log").unwrap();
        let matched = scanner().collect_fills_regex(&contents, "55=ES").unwrap();
        assert_eq!(scanned, matched);
    }

    #[test]
    fn test_pipe_delimiter() {
        let pipe = FixScanner::new(34, '|', "35=8");
        let line = exec_report("A1", '2', 10, "ES").replace('\u{1}', "|");
        let fills = pipe.collect_fills(&line, "55=ES", "t.log").unwrap();
        assert_eq!(fills, vec![("A1".to_string(), 10)]);
    }

    #[test]
    fn test_symbol_tag() {
        assert_eq!(symbol_tag("ES"), "55=ES");
        assert_eq!(symbol_tag("55=NQ"), "55=NQ");
    }

    // ── load_* ────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_status_counts_across_files_in_requested_order() {
        let dir = TempDir::new().unwrap();
        write_log(
            dir.path(),
            "FIX.4.2-CME-1.log",
            &[exec_report("A1", '1', 5, "ES"), exec_report("A1", '2', 10, "ES")],
        );
        write_log(dir.path(), "FIX.4.2-CME-2.log", &[exec_report("B1", '2', 3, "ES")]);

        let wanted = [OrdStatus::Canceled, OrdStatus::Filled, OrdStatus::PartiallyFilled];
        let counts = load_status_counts(&config_for(dir.path()), &wanted, ExtractMethod::Parse).unwrap();
        assert_eq!(
            counts,
            vec![
                StatusCount { status: OrdStatus::Canceled, count: 0 },
                StatusCount { status: OrdStatus::Filled, count: 2 },
                StatusCount { status: OrdStatus::PartiallyFilled, count: 1 },
            ]
        );
    }

    #[test]
    fn test_load_order_fills_keeps_max_sorted() {
        let dir = TempDir::new().unwrap();
        write_log(
            dir.path(),
            "FIX.4.2-CME-1.log",
            &[
                exec_report("B7", '1', 2, "ES"),
                exec_report("A1", '1', 5, "ES"),
                exec_report("A1", '2', 10, "ES"),
            ],
        );
        write_log(dir.path(), "FIX.4.2-CME-2.log", &[exec_report("B7", '2', 4, "ES")]);

        let fills = load_order_fills(&config_for(dir.path()), "ES", ExtractMethod::Parse).unwrap();
        assert_eq!(
            fills,
            vec![
                OrderFill { order_id: "A1".to_string(), cumulative_qty: 10 },
                OrderFill { order_id: "B7".to_string(), cumulative_qty: 4 },
            ]
        );
    }

    #[test]
    fn test_load_order_fills_missing_dir() {
        let config = config_for(Path::new("/tmp/does-not-exist-fix-xyz"));
        let err = load_order_fills(&config, "ES", ExtractMethod::Parse).unwrap_err();
        assert!(matches!(err, ReportError::DataPathNotFound(_)));
    }
}
