//! Per-file consolidation outcome.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// What happened to one processed file.
///
/// Returned to the caller for every file that was scanned successfully, and
/// written verbatim into JSON reports.
///
/// # Examples
///
/// ```
/// use hy_core::ConsolidationResult;
///
/// let result = ConsolidationResult::unchanged("src/app.tsx");
/// assert!(!result.changed);
/// assert!(result.original_imports.is_empty());
/// assert!(result.consolidated_import.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationResult {
    /// The processed file.
    pub file_path: Utf8PathBuf,

    /// Each qualifying statement rendered with sorted names.
    pub original_imports: Vec<String>,

    /// The merged statement, or empty if nothing qualified.
    pub consolidated_import: String,

    /// Whether the rewritten text differs from the original.
    pub changed: bool,

    /// Snapshot of the original bytes, set only when the file was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<Utf8PathBuf>,
}

impl ConsolidationResult {
    /// Result for a file with no qualifying imports.
    #[must_use]
    pub fn unchanged(file_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            original_imports: Vec::new(),
            consolidated_import: String::new(),
            changed: false,
            backup_path: None,
        }
    }
}
