//! Configuration and state locations for the hygienic tool.
//!
//! This module provides two types:
//!
//! - [`Config`] - the persisted settings read by the consolidation engine
//! - [`StatePaths`] - where the configuration, cache, history, backups, and
//!   reports live on disk
//!
//! Nothing in the engine looks up the home directory on its own. A
//! [`StatePaths`] value is built once at startup (usually with
//! [`StatePaths::from_home`]) and handed to every component that persists
//! something.

use std::env;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::fs::{ensure_dir, write_atomic};

/// Module specifier of the UI barrel that consolidated imports point at.
pub const DEFAULT_BARREL_ROOT: &str = "@/shared/components/ui";

/// Name of the state directory under the user's configuration directory.
const APP_DIR_NAME: &str = "import-consolidator";

/// Settings consumed by the consolidation engine.
///
/// Every field has a default, so a partial `config.json` is merged over
/// [`Config::default`].
///
/// # Examples
///
/// ```
/// use hy_core::Config;
///
/// let config = Config::default();
/// assert_eq!(config.extensions, vec![".tsx"]);
/// assert!(config.cache_enabled);
/// assert!(!config.sort_imports);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Barrel modules whose exports make up the component registry.
    pub barrel_paths: Vec<Utf8PathBuf>,

    /// Import specifier of the barrel, e.g. `@/shared/components/ui`.
    pub barrel_root: String,

    /// File name suffixes to scan when expanding directories.
    pub extensions: Vec<String>,

    /// Exclude patterns used when the caller supplies none.
    pub default_excludes: Vec<String>,

    /// Whether consolidated names are sorted by default.
    pub sort_imports: bool,

    /// Whether the content-hash cache is read and written.
    pub cache_enabled: bool,

    /// Component names that are always treated as registered.
    pub ui_components: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            barrel_paths: vec![Utf8PathBuf::from("src/shared/components/ui/index.ts")],
            barrel_root: DEFAULT_BARREL_ROOT.to_owned(),
            extensions: vec![".tsx".to_owned()],
            default_excludes: vec![
                "node_modules".to_owned(),
                ".git".to_owned(),
                "dist".to_owned(),
                "build".to_owned(),
            ],
            sort_imports: false,
            cache_enabled: true,
            ui_components: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from `paths.config_file()`.
    ///
    /// A missing file yields the defaults, which are written back so the
    /// user has something to edit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read (or
    /// the defaults cannot be written), and [`ConfigError::Parse`] if it is
    /// not valid JSON.
    pub fn load(paths: &StatePaths) -> Result<Self, ConfigError> {
        let path = paths.config_file();
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let config =
                    serde_json::from_str(&contents).map_err(|e| ConfigError::parse(&path, e))?;
                debug!(path = %path, "Loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save(paths)?;
                info!(path = %path, "Wrote default configuration");
                Ok(config)
            }
            Err(e) => Err(ConfigError::io(path, e)),
        }
    }

    /// Persists the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the state directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self, paths: &StatePaths) -> Result<(), ConfigError> {
        let path = paths.config_file();
        ensure_dir(paths.root()).map_err(|e| ConfigError::io(paths.root(), e))?;
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::parse(&path, e))?;
        write_atomic(&path, json.as_bytes()).map_err(|e| ConfigError::io(path, e))
    }

    /// Appends barrel paths that are not configured yet.
    ///
    /// Returns `true` if anything was added.
    pub fn add_barrel_paths<I>(&mut self, extra: I) -> bool
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        let before = self.barrel_paths.len();
        for path in extra {
            if !self.barrel_paths.contains(&path) {
                self.barrel_paths.push(path);
            }
        }
        self.barrel_paths.len() != before
    }
}

/// On-disk locations of everything the tool persists.
///
/// # Layout
///
/// ```text
/// <root>/
/// ├── config.json
/// ├── cache.json
/// ├── history.json
/// ├── backups/<project>/<timestamp>/files/...
/// └── reports/<timestamp>.json
/// ```
///
/// # Examples
///
/// ```
/// use hy_core::StatePaths;
///
/// let paths = StatePaths::new("/tmp/state");
/// assert_eq!(paths.cache_file(), "/tmp/state/cache.json");
/// assert_eq!(paths.backups_dir(), "/tmp/state/backups");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: Utf8PathBuf,
}

impl StatePaths {
    /// Creates state paths rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the default state directory.
    ///
    /// This is `~/.config/import-consolidator` on Unix-like systems and
    /// `%APPDATA%\import-consolidator` on Windows.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if the environment variable is not
    /// set, or [`ConfigError::InvalidPath`] if it is not valid UTF-8.
    pub fn from_home() -> Result<Self, ConfigError> {
        #[cfg(windows)]
        let base = env::var_os("APPDATA").map(std::path::PathBuf::from);

        #[cfg(not(windows))]
        let base = env::var_os("HOME").map(|home| std::path::PathBuf::from(home).join(".config"));

        let base = base.ok_or(ConfigError::MissingHome)?;
        let base = Utf8PathBuf::from_path_buf(base).map_err(|p| ConfigError::InvalidPath {
            path: Utf8PathBuf::from(p.to_string_lossy().into_owned()),
            reason: "not valid UTF-8".to_owned(),
        })?;

        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    /// The state directory itself.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// `config.json`.
    #[must_use]
    pub fn config_file(&self) -> Utf8PathBuf {
        self.root.join("config.json")
    }

    /// `cache.json`.
    #[must_use]
    pub fn cache_file(&self) -> Utf8PathBuf {
        self.root.join("cache.json")
    }

    /// `history.json`.
    #[must_use]
    pub fn history_file(&self) -> Utf8PathBuf {
        self.root.join("history.json")
    }

    /// Root of the backup tree.
    #[must_use]
    pub fn backups_dir(&self) -> Utf8PathBuf {
        self.root.join("backups")
    }

    /// Directory for JSON run reports.
    #[must_use]
    pub fn reports_dir(&self) -> Utf8PathBuf {
        self.root.join("reports")
    }

    /// Creates the state, backups, and reports directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] naming the directory that could not be
    /// created.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [self.root.clone(), self.backups_dir(), self.reports_dir()] {
            ensure_dir(&dir).map_err(|e| ConfigError::io(dir.clone(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_paths() -> (TempDir, StatePaths) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("state"))
            .expect("temp dir should be UTF-8");
        (temp, StatePaths::new(root))
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(
            config.barrel_paths,
            vec![Utf8PathBuf::from("src/shared/components/ui/index.ts")]
        );
        assert_eq!(config.barrel_root, "@/shared/components/ui");
        assert_eq!(config.default_excludes, vec!["node_modules", ".git", "dist", "build"]);
        assert!(config.ui_components.is_empty());
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"sort_imports": true, "ui_components": ["Dialog"]}"#;
        let config: Config = serde_json::from_str(json).expect("partial config should parse");
        assert!(config.sort_imports);
        assert_eq!(config.ui_components, vec!["Dialog"]);
        assert_eq!(config.extensions, vec![".tsx"]);
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let (_temp, paths) = temp_paths();

        let config = Config::load(&paths).expect("load should succeed");
        assert_eq!(config, Config::default());
        assert!(paths.config_file().exists());
    }

    #[test]
    fn test_save_then_load() {
        let (_temp, paths) = temp_paths();
        let mut config = Config::default();
        config.sort_imports = true;
        config.extensions.push(".jsx".to_owned());

        config.save(&paths).expect("save should succeed");
        let loaded = Config::load(&paths).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let (_temp, paths) = temp_paths();
        paths.ensure_dirs().expect("dirs");
        fs::write(paths.config_file(), "{ not json").expect("write config");

        let err = Config::load(&paths).expect_err("malformed config should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_add_barrel_paths_dedups() {
        let mut config = Config::default();
        let added = config.add_barrel_paths([
            Utf8PathBuf::from("src/shared/components/ui/index.ts"),
            Utf8PathBuf::from("packages/ui/index.ts"),
        ]);
        assert!(added);
        assert_eq!(config.barrel_paths.len(), 2);
        assert!(!config.add_barrel_paths([Utf8PathBuf::from("packages/ui/index.ts")]));
    }

    #[test]
    fn test_state_paths_layout() {
        let paths = StatePaths::new("/state");
        assert_eq!(paths.config_file(), "/state/config.json");
        assert_eq!(paths.history_file(), "/state/history.json");
        assert_eq!(paths.reports_dir(), "/state/reports");
    }

    #[test]
    fn test_ensure_dirs_creates_tree() {
        let (_temp, paths) = temp_paths();
        paths.ensure_dirs().expect("ensure_dirs should succeed");
        assert!(paths.backups_dir().is_dir());
        assert!(paths.reports_dir().is_dir());
    }
}
