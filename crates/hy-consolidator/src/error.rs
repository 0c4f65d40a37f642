//! Error types for the hy-consolidator crate.
//!
//! This module provides the [`ConsolidateError`] type for everything that can
//! go wrong between discovering files and writing them back.

use camino::Utf8PathBuf;

/// Errors that can occur during a consolidation run.
///
/// # Error Recovery Strategy
///
/// - **Per-file errors** ([`Read`](Self::Read), [`Parse`](Self::Parse),
///   [`Write`](Self::Write), [`Backup`](Self::Backup)): log, omit the file
///   from the results, continue with the next file
/// - **Barrel errors** while building the registry: same variants, the
///   barrel contributes no names
/// - **Everything else**: the run cannot proceed and the error propagates
///
/// # Examples
///
/// ```
/// use hy_consolidator::ConsolidateError;
///
/// let err = ConsolidateError::read(
///     "src/app.tsx",
///     std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
/// );
/// assert!(err.is_recoverable());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("src/app.tsx"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConsolidateError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid TypeScript/TSX.
    #[error("could not parse {path} as valid TypeScript: {source}")]
    Parse {
        /// The file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: hy_ts_parser::ParseError,
    },

    /// Failed to write the rewritten file. Any backup taken beforehand stays.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to snapshot a file before writing it.
    #[error("failed to back up {path}: {source}")]
    Backup {
        /// The file being backed up.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or write persisted state (cache, history, manifest).
    #[error("failed to persist state to {path}: {source}")]
    State {
        /// The state file or directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Persisted JSON could not be encoded or decoded.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// The state file.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An include or exclude pattern is not a valid glob.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// Failed to initialise the parser.
    #[error("failed to initialise parser: {0}")]
    Parser(#[source] hy_ts_parser::ParseError),

    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] hy_core::ConfigError),

    /// There is no backup batch to restore for a project.
    #[error("no backups found for project '{project}'")]
    NoBackup {
        /// The project name.
        project: String,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ConsolidateError {
    /// Creates a new [`ConsolidateError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConsolidateError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: hy_ts_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConsolidateError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConsolidateError::Backup`] error.
    #[inline]
    pub fn backup(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Backup {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConsolidateError::State`] error.
    #[inline]
    pub fn state(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::State {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConsolidateError::Json`] error.
    #[inline]
    pub fn json(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error only concerns a single file and the batch
    /// can continue.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Parse { .. } | Self::Write { .. } | Self::Backup { .. }
        )
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Write { path, .. }
            | Self::Backup { path, .. }
            | Self::State { path, .. }
            | Self::Json { path, .. } => Some(path),
            Self::Pattern { .. }
            | Self::Parser(_)
            | Self::Config(_)
            | Self::NoBackup { .. }
            | Self::NonUtf8Path(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_parse_error_is_recoverable() {
        let err = ConsolidateError::parse(
            "src/broken.tsx",
            hy_ts_parser::ParseError::Syntax { line: 1, column: 0 },
        );
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("could not parse src/broken.tsx"));
    }

    #[test]
    fn test_write_error_keeps_path() {
        let err = ConsolidateError::write(
            "src/app.tsx",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("src/app.tsx"));
    }

    #[test]
    fn test_no_backup_is_fatal() {
        let err = ConsolidateError::NoBackup {
            project: "web".to_owned(),
        };
        assert!(!err.is_recoverable());
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "no backups found for project 'web'");
    }

    #[test]
    fn test_state_error_display() {
        let err = ConsolidateError::state(
            "/state/history.json",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("/state/history.json"));
    }
}
