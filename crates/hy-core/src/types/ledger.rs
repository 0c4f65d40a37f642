//! Persisted bookkeeping: cache entries, run options, and run records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cache record for one file, keyed by path in the cache map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Lowercase hex content digest at the time the file was cached.
    pub hash: String,

    /// Whether the run that cached the file changed it.
    pub changed: bool,

    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
}

/// Options for one consolidation run.
///
/// The defaults are the safe ones: dry run, insertion-order names, cache on,
/// no include filter, and the configured default excludes.
///
/// # Examples
///
/// ```
/// use hy_core::RunOptions;
///
/// let options = RunOptions {
///     dry_run: false,
///     ..RunOptions::default()
/// };
/// assert!(options.use_cache);
/// assert!(options.exclude_patterns.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Compute results without touching any file.
    pub dry_run: bool,

    /// Sort the consolidated names instead of keeping first-seen order.
    pub sort_imports: bool,

    /// Skip files whose content hash matches the cache.
    pub use_cache: bool,

    /// Only files matching one of these patterns are processed (empty = all).
    pub include_patterns: Vec<String>,

    /// Files matching one of these are skipped; `None` uses the config defaults.
    pub exclude_patterns: Option<Vec<String>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            sort_imports: false,
            use_cache: true,
            include_patterns: Vec::new(),
            exclude_patterns: None,
        }
    }
}

/// Outcome recorded for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The batch completed; individual files may still have been skipped.
    Success,
    /// The run aborted before producing results.
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// One entry in the run history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,

    /// Paths the run was invoked with.
    pub paths: Vec<String>,

    /// Options the run was invoked with.
    pub options: RunOptions,

    /// Final status.
    pub status: RunStatus,

    /// Number of results with `changed == true`.
    pub files_changed: usize,

    /// Number of results returned.
    pub files_processed: usize,
}

impl RunRecord {
    /// Flags that differ from the defaults, rendered as CLI-style switches.
    ///
    /// ```
    /// use hy_core::{RunOptions, RunRecord, RunStatus};
    ///
    /// let record = RunRecord {
    ///     timestamp: chrono::Utc::now(),
    ///     paths: vec!["src".to_owned()],
    ///     options: RunOptions { dry_run: false, sort_imports: true, ..RunOptions::default() },
    ///     status: RunStatus::Success,
    ///     files_changed: 1,
    ///     files_processed: 3,
    /// };
    /// assert_eq!(record.active_flags(), vec!["--fix", "--sort"]);
    /// ```
    #[must_use]
    pub fn active_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if !self.options.dry_run {
            flags.push("--fix");
        }
        if self.options.sort_imports {
            flags.push("--sort");
        }
        if !self.options.use_cache {
            flags.push("--no-cache");
        }
        if !self.options.include_patterns.is_empty() {
            flags.push("--include");
        }
        if self.options.exclude_patterns.is_some() {
            flags.push("--except");
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Success).expect("serialize"),
            r#""success""#
        );
        assert_eq!(RunStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_run_options_defaults_are_safe() {
        let options = RunOptions::default();
        assert!(options.dry_run);
        assert!(!options.sort_imports);
        assert!(options.include_patterns.is_empty());
    }

    #[test]
    fn test_run_record_round_trips_through_json() {
        let record = RunRecord {
            timestamp: Utc::now(),
            paths: vec!["src".to_owned()],
            options: RunOptions::default(),
            status: RunStatus::Success,
            files_changed: 0,
            files_processed: 2,
        };
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: RunRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
        assert!(parsed.active_flags().is_empty());
    }

    #[test]
    fn test_cache_entry_timestamp_is_rfc3339() {
        let entry = CacheEntry {
            hash: "ab".to_owned(),
            changed: true,
            timestamp: DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
                .expect("valid timestamp")
                .with_timezone(&Utc),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("2026-01-02T03:04:05Z"));
    }
}
