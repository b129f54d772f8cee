//! On-disk cache of scraped name ranks.
//!
//! Scraping every ranking page is the slow part of the name-trends report, so
//! the flattened `(gender, year, name, rank)` records are kept as JSON and
//! reused on later runs against the same directory with the same extraction
//! method. Regex-scanned records skip page validation, so a parse run never
//! reads them.

use std::path::{Path, PathBuf};

use reports_core::error::Result;
use reports_core::models::{ExtractMethod, NameRankRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// File name of the cache inside the cache directory.
pub const CACHE_FILE_NAME: &str = "name_trends_data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankCache {
    /// Directory the records were scraped from.
    pub source_dir: PathBuf,
    /// Extraction the records were produced with.
    pub method: ExtractMethod,
    pub records: Vec<NameRankRecord>,
}

impl RankCache {
    pub fn new(source_dir: &Path, method: ExtractMethod, records: Vec<NameRankRecord>) -> Self {
        Self {
            source_dir: normalise(source_dir),
            method,
            records,
        }
    }

    /// Default cache directory: `~/.flatfile-reports/cache`.
    pub fn default_dir() -> PathBuf {
        Self::dir_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Cache directory rooted at `base_dir` (used for testing).
    pub fn dir_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".flatfile-reports").join("cache")
    }

    /// Path of the cache file inside `cache_dir`.
    pub fn path_in(cache_dir: &Path) -> PathBuf {
        cache_dir.join(CACHE_FILE_NAME)
    }

    /// Load the cache from `path`.
    ///
    /// Returns `None` when the file is absent or cannot be parsed; the caller
    /// then re-scrapes and overwrites it.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("No rank cache at {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Ignoring unreadable rank cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Atomically write the cache to `path`, creating parent directories.
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

    /// `true` when the records were scraped from `dir` with `method`.
    pub fn matches(&self, dir: &Path, method: ExtractMethod) -> bool {
        self.method == method && self.source_dir == normalise(dir)
    }
}

fn normalise(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use reports_core::models::Gender;
    use tempfile::TempDir;

    fn sample_records() -> Vec<NameRankRecord> {
        vec![
            NameRankRecord {
                gender: Gender::Male,
                year: 1990,
                name: "Ryan".to_string(),
                rank: 14,
            },
            NameRankRecord {
                gender: Gender::Female,
                year: 1990,
                name: "Jessica".to_string(),
                rank: 1,
            },
        ]
    }

    #[test]
    fn test_rank_cache_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = RankCache::path_in(&RankCache::dir_in(tmp.path()));

        let cache = RankCache::new(tmp.path(), ExtractMethod::Parse, sample_records());
        cache.save_to(&path).unwrap();

        assert!(path.ends_with(".flatfile-reports/cache/name_trends_data.json"));
        let loaded = RankCache::load_from(&path).expect("cache present");
        assert_eq!(loaded, cache);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_rank_cache_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(RankCache::load_from(&tmp.path().join(CACHE_FILE_NAME)).is_none());
    }

    #[test]
    fn test_rank_cache_corrupt_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(RankCache::load_from(&path).is_none());
    }

    #[test]
    fn test_rank_cache_matches_source_dir() {
        let tmp = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let cache = RankCache::new(tmp.path(), ExtractMethod::Parse, sample_records());

        assert!(cache.matches(tmp.path(), ExtractMethod::Parse));
        assert!(!cache.matches(other.path(), ExtractMethod::Parse));
    }

    #[test]
    fn test_rank_cache_matches_extraction_method() {
        let tmp = TempDir::new().unwrap();
        let cache = RankCache::new(tmp.path(), ExtractMethod::Regex, sample_records());

        assert!(cache.matches(tmp.path(), ExtractMethod::Regex));
        assert!(!cache.matches(tmp.path(), ExtractMethod::Parse));
    }

    #[test]
    fn test_rank_cache_without_method_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, r#"{"source_dir": "/data", "records": []}"#).unwrap();
        assert!(RankCache::load_from(&path).is_none());
    }
}
