//! File discovery for a consolidation run.
//!
//! [`FileWalker`] turns the paths given on the command line into the batch
//! of files to process:
//!
//! - An existing file is taken as-is, without extension or pattern checks.
//! - A directory is walked recursively with the `ignore` crate, keeping
//!   files whose name ends with one of the configured extensions and which
//!   pass the [`PathFilter`].
//! - A missing path is logged and skipped.
//!
//! Files under each directory are sorted, and a file reached through two
//! arguments is only returned once.
//!
//! # Examples
//!
//! ```ignore
//! use hy_consolidator::{FileWalker, PathFilter};
//! use camino::Utf8PathBuf;
//!
//! let walker = FileWalker::new(&[".tsx".to_owned()], PathFilter::accept_all());
//! let files = walker.collect(&[Utf8PathBuf::from("src")]);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use hy_core::{FxHashSet, fx_hash_set};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::filter::PathFilter;

/// Discovers the files to process.
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// Accepted name suffixes, each starting with a dot.
    extensions: Vec<String>,
    /// Include/exclude patterns for files found in directories.
    filter: PathFilter,
}

impl FileWalker {
    /// Creates a walker for the given extensions and filter.
    ///
    /// Extensions may be written with or without the leading dot.
    #[must_use]
    pub fn new(extensions: &[String], filter: PathFilter) -> Self {
        let extensions = extensions
            .iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext.clone()
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        Self { extensions, filter }
    }

    /// Expands `paths` into the list of files to process, in discovery order.
    ///
    /// Never fails: unreadable entries and missing paths are logged and skipped.
    pub fn collect(&self, paths: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
        let mut seen: FxHashSet<Utf8PathBuf> = fx_hash_set();
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                if seen.insert(path.clone()) {
                    files.push(path.clone());
                }
            } else if path.is_dir() {
                for file in self.walk_dir(path) {
                    if seen.insert(file.clone()) {
                        files.push(file);
                    }
                }
            } else {
                debug!(path = %path, "Path not found, skipping");
            }
        }

        files
    }

    fn walk_dir(&self, root: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut found = Vec::new();
        let walker = WalkBuilder::new(root)
            .standard_filters(true)
            .require_git(false)
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root, error = %e, "Failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                warn!(path = %entry.path().display(), "Skipping non-UTF-8 path");
                continue;
            };
            if self.has_extension(path) && self.filter.accepts(path) {
                found.push(path.to_owned());
            }
        }

        found.sort();
        found
    }

    /// Checks the file name against the configured suffixes.
    fn has_extension(&self, path: &Utf8Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.extensions.iter().any(|ext| name.ends_with(ext.as_str())))
    }
}
