//! Content-hash cache that lets repeated runs skip untouched files.
//!
//! The cache maps each processed file path to a [`CacheEntry`] holding the
//! SHA-256 digest of the file as it was left by the last run. A file is a
//! cache hit only while its current digest still equals the stored one, so
//! any edit, even a single byte, forces it to be processed again.
//!
//! The map is loaded once at the start of a run and persisted once at the
//! end. A missing or corrupt cache file simply starts empty.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8PathBuf;
//! use hy_consolidator::ContentCache;
//!
//! let dir = tempfile::tempdir()?;
//! let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
//! let cache = ContentCache::load(root.join("cache.json"), true);
//! assert!(cache.is_empty());
//! assert!(!cache.is_file_cached(&root.join("missing.tsx")));
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use hy_core::fs::{ensure_dir, write_atomic};
use hy_core::{CacheEntry, ConsolidationResult, FxHashMap, fx_hash_map};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::ConsolidateError;

/// Persistent map from file path to last-seen content digest.
#[derive(Debug, Clone)]
pub struct ContentCache {
    /// Where the map is persisted.
    path: Utf8PathBuf,
    /// When `false`, lookups miss and nothing is recorded or saved.
    enabled: bool,
    /// Entries keyed by the file path as it was given to the run.
    entries: FxHashMap<String, CacheEntry>,
}

impl ContentCache {
    /// Loads the cache from `path`.
    ///
    /// Never fails: a missing file and a malformed file both yield an empty
    /// cache.
    #[must_use]
    pub fn load(path: impl Into<Utf8PathBuf>, enabled: bool) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path, error = %e, "Cache file is corrupt, starting empty");
                    fx_hash_map()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => fx_hash_map(),
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read cache file, starting empty");
                fx_hash_map()
            }
        };

        Self {
            path,
            enabled,
            entries,
        }
    }

    /// Returns `true` if `file` is unchanged since it was last cached.
    ///
    /// Unreadable files never hit.
    #[must_use]
    pub fn is_file_cached(&self, file: &Utf8Path) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(entry) = self.entries.get(file.as_str()) else {
            return false;
        };
        let current = hash_file(file);
        !current.is_empty() && current == entry.hash
    }

    /// Records the current content digest of `file` with the outcome of
    /// processing it, replacing any earlier entry.
    pub fn cache_file(&mut self, file: &Utf8Path, result: &ConsolidationResult) {
        if !self.enabled {
            return;
        }
        let entry = CacheEntry {
            hash: hash_file(file),
            changed: result.changed,
            timestamp: Utc::now(),
        };
        self.entries.insert(file.as_str().to_owned(), entry);
    }

    /// Persists the map.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::State`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ConsolidateError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).map_err(|e| ConsolidateError::state(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ConsolidateError::json(&self.path, e))?;
        write_atomic(&self.path, json.as_bytes()).map_err(|e| ConsolidateError::state(&self.path, e))?;
        debug!(path = %self.path, entries = self.entries.len(), "Saved cache");
        Ok(())
    }

    /// Returns the entry stored for `file`.
    #[must_use]
    pub fn get(&self, file: &Utf8Path) -> Option<&CacheEntry> {
        self.entries.get(file.as_str())
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

/// Lowercase hex SHA-256 of the file's content, or an empty string if it
/// cannot be read.
#[must_use]
pub fn hash_file(path: &Utf8Path) -> String {
    fs::read(path).map_or_else(|_| String::new(), |bytes| hash_bytes(&bytes))
}
