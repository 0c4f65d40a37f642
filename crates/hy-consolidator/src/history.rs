//! Append-only ledger of consolidation runs.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use hy_core::RunRecord;
use hy_core::fs::{ensure_dir, write_atomic};
use tracing::{debug, warn};

use crate::error::ConsolidateError;

/// Recorded runs, oldest first, persisted on every change.
#[derive(Debug, Clone)]
pub struct History {
    path: Utf8PathBuf,
    runs: Vec<RunRecord>,
}

impl History {
    /// Loads the ledger from `path`. A missing or corrupt file starts empty.
    #[must_use]
    pub fn load(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let runs = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path, error = %e, "History file is corrupt, starting empty");
                Vec::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read history file, starting empty");
                Vec::new()
            }
        };
        Self { path, runs }
    }

    /// Appends a run and persists the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub fn add_run(&mut self, record: RunRecord) -> Result<(), ConsolidateError> {
        self.runs.push(record);
        self.save()
    }

    /// Removes every run and persists the empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub fn clear(&mut self) -> Result<(), ConsolidateError> {
        self.runs.clear();
        self.save()
    }

    /// All runs, oldest first.
    #[must_use]
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// The `n` most recent runs, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &RunRecord> {
        self.runs.iter().rev().take(n)
    }

    /// Returns the ledger file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn save(&self) -> Result<(), ConsolidateError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).map_err(|e| ConsolidateError::state(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.runs)
            .map_err(|e| ConsolidateError::json(&self.path, e))?;
        write_atomic(&self.path, json.as_bytes()).map_err(|e| ConsolidateError::state(&self.path, e))?;
        debug!(path = %self.path, runs = self.runs.len(), "Saved history");
        Ok(())
    }
}
