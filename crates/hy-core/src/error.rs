//! Error types for the hy-core crate.
//!
//! This module provides the [`ConfigError`] type for failures while resolving
//! state paths and reading or writing the configuration file.

use camino::Utf8PathBuf;

/// Errors that can occur while loading, saving, or locating configuration.
///
/// # Examples
///
/// ```
/// use hy_core::ConfigError;
///
/// let error = ConfigError::MissingHome;
/// assert!(error.to_string().contains("home directory"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No home directory could be determined for the default state location.
    #[error("could not determine home directory (HOME is not set)")]
    MissingHome,

    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading or writing configuration state.
    #[error("configuration I/O failed for {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConfigError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
