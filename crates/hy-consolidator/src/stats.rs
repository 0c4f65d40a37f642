//! Run statistics.
//!
//! This module provides [`RunSummary`], the per-run counters returned with
//! the results and written into reports.
//!
//! # Examples
//!
//! ```
//! use hy_consolidator::RunSummary;
//!
//! let mut summary = RunSummary::default();
//! summary.record_processed(true);
//! summary.record_processed(false);
//! summary.record_skipped();
//!
//! assert_eq!(summary.files_processed, 2);
//! assert_eq!(summary.files_changed, 1);
//! assert!(summary.has_changes());
//! ```

use serde::{Deserialize, Serialize};

/// Counters for one consolidation run.
///
/// Every discovered file lands in exactly one of `files_processed`,
/// `files_skipped` (cache hit) or `files_failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files that were scanned and produced a result.
    pub files_processed: usize,
    /// Processed files whose content changed (or would change in a dry run).
    pub files_changed: usize,
    /// Files skipped because the cache showed them unchanged.
    pub files_skipped: usize,
    /// Files that could not be read, parsed, backed up, or written.
    pub files_failed: usize,
}

impl RunSummary {
    /// Records a processed file.
    #[inline]
    pub const fn record_processed(&mut self, changed: bool) {
        self.files_processed += 1;
        if changed {
            self.files_changed += 1;
        }
    }

    /// Records a cache hit.
    #[inline]
    pub const fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Records a per-file failure.
    #[inline]
    pub const fn record_failed(&mut self) {
        self.files_failed += 1;
    }

    /// Total files discovered for the run.
    #[inline]
    #[must_use]
    pub const fn files_discovered(&self) -> usize {
        self.files_processed + self.files_skipped + self.files_failed
    }

    /// Returns `true` if at least one file changed.
    #[inline]
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.files_changed > 0
    }

    /// Returns `true` if at least one file failed.
    #[inline]
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.files_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let summary = RunSummary::default();
        assert_eq!(summary.files_discovered(), 0);
        assert!(!summary.has_changes());
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_each_file_counted_once() {
        let mut summary = RunSummary::default();
        summary.record_processed(true);
        summary.record_skipped();
        summary.record_failed();
        assert_eq!(summary.files_discovered(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_serialization() {
        let mut summary = RunSummary::default();
        summary.record_processed(true);
        let json = serde_json::to_string(&summary).expect("serialize");
        assert_eq!(
            json,
            r#"{"files_processed":1,"files_changed":1,"files_skipped":0,"files_failed":0}"#
        );
    }
}
