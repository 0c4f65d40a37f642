//! Consolidation engine for per-component UI imports.
//!
//! This crate rewrites files that import UI components one sub-module at a
//! time into a single import from the barrel module. It discovers files,
//! scans them with `hy-ts-parser`, rewrites the qualifying lines, and keeps
//! the content cache, backups, and run history that make repeated runs safe
//! and cheap.
//!
//! # Overview
//!
//! The main entry point is [`Consolidator`], which combines:
//!
//! - [`FileWalker`] and [`PathFilter`]: discovery by extension and pattern
//! - [`RegistryBuilder`]: the set of component names, from barrel exports
//! - [`rewrite()`]: the line-based rewrite of one file
//! - [`ContentCache`]: skips files whose bytes did not change since last run
//! - [`BackupStore`]: snapshots files before they are overwritten
//! - [`History`]: the ledger of past runs
//!
//! # Example
//!
//! ```ignore
//! use camino::Utf8PathBuf;
//! use hy_consolidator::Consolidator;
//! use hy_core::{Config, RunOptions, StatePaths};
//!
//! let paths = StatePaths::from_home()?;
//! let mut consolidator = Consolidator::new(Config::load(&paths)?, paths)?;
//! consolidator.initialize_registry();
//!
//! let outcome = consolidator.process_files(&[Utf8PathBuf::from("src")], &RunOptions::default())?;
//! println!("{} of {} files would change", outcome.summary.files_changed, outcome.summary.files_processed);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Consolidator
//!     │
//!     ├── RegistryBuilder (barrels parsed in parallel with rayon)
//!     │
//!     ├── FileWalker (ignore crate) + PathFilter (globset)
//!     │
//!     └── per file, in discovery order
//!             ├── ContentCache::is_file_cached
//!             ├── hy_ts_parser::scan
//!             ├── rewrite
//!             ├── BackupStore::snapshot + write_atomic (unless dry run)
//!             └── ContentCache::cache_file
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod backup;
mod cache;
mod error;
mod filter;
mod git;
mod history;
mod registry;
mod rewrite;
mod stats;
mod walker;

pub use backup::{BACKUP_RETENTION_DAYS, BATCH_FORMAT, BackupStore, parse_batch_name, project_name};
pub use cache::{ContentCache, hash_bytes, hash_file};
pub use error::ConsolidateError;
pub use filter::PathFilter;
pub use git::{WorkingTree, check_preconditions, working_tree};
pub use history::History;
pub use registry::{RegistryBuildResult, RegistryBuilder, is_missing_barrel, load_barrel};
pub use rewrite::{Rewrite, consolidated_names, render_consolidated, rewrite};
pub use stats::RunSummary;
pub use walker::FileWalker;

use std::env;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use hy_core::fs::write_atomic;
use hy_core::{ComponentRegistry, Config, ConsolidationResult, RunOptions, StatePaths};
use hy_ts_parser::{SourceKind, TsParser, scan};
use tracing::{debug, info, warn};

/// Results of [`Consolidator::process_files`].
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// One result per processed file, in discovery order.
    pub results: Vec<ConsolidationResult>,
    /// Counters for the run.
    pub summary: RunSummary,
}

/// The consolidation engine.
///
/// Holds the configuration, the state locations, the working directory
/// that relative paths and backups are resolved against, and the component
/// registry. The registry is empty until
/// [`initialize_registry`](Self::initialize_registry) is called.
#[derive(Debug, Clone)]
pub struct Consolidator {
    config: Config,
    paths: StatePaths,
    cwd: Utf8PathBuf,
    registry: ComponentRegistry,
}

impl Consolidator {
    /// Creates an engine working in the process's current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::State`] if the current directory cannot
    /// be determined and [`ConsolidateError::NonUtf8Path`] if it is not
    /// valid UTF-8.
    pub fn new(config: Config, paths: StatePaths) -> Result<Self, ConsolidateError> {
        let cwd = env::current_dir().map_err(|e| ConsolidateError::state(".", e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(ConsolidateError::NonUtf8Path)?;
        Ok(Self::with_working_dir(config, paths, cwd))
    }

    /// Creates an engine working in `cwd`.
    #[must_use]
    pub fn with_working_dir(config: Config, paths: StatePaths, cwd: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config,
            paths,
            cwd: cwd.into(),
            registry: ComponentRegistry::new(),
        }
    }

    /// Builds the registry from the configured barrels and extra names.
    ///
    /// Relative barrel paths are resolved against the working directory.
    /// Barrels that cannot be loaded contribute nothing; the failure is
    /// logged.
    pub fn initialize_registry(&mut self) -> &ComponentRegistry {
        let barrels = self
            .config
            .barrel_paths
            .iter()
            .map(|path| self.resolve(path))
            .collect();
        let built = RegistryBuilder::new(barrels)
            .with_extra_names(self.config.ui_components.iter().cloned())
            .build();

        for failure in built.failures {
            if is_missing_barrel(&failure) {
                debug!(error = %failure, "Barrel file not found, skipping");
            } else {
                warn!(error = %failure, "Failed to load barrel file");
            }
        }

        self.registry = built.registry;
        &self.registry
    }

    /// Replaces the registry.
    pub fn set_registry(&mut self, registry: ComponentRegistry) {
        self.registry = registry;
    }

    /// Returns the component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the state locations.
    #[must_use]
    pub fn state_paths(&self) -> &StatePaths {
        &self.paths
    }

    /// Returns the working directory.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Returns `false` if the working tree has uncommitted changes and
    /// `force` is not set. See [`check_preconditions`].
    #[must_use]
    pub fn check_preconditions(&self, force: bool) -> bool {
        check_preconditions(&self.cwd, force)
    }

    /// Removes backup batches older than [`BACKUP_RETENTION_DAYS`].
    ///
    /// Failures are logged and otherwise ignored.
    pub fn cleanup_old_backups(&self) {
        let now = Utc::now();
        let store = BackupStore::new(self.paths.backups_dir(), &self.cwd, now);
        for failure in store.sweep_expired(now) {
            debug!(error = %failure, "Failed to remove expired backup");
        }
    }

    /// Restores the files from this project's newest backup batch.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::NoBackup`] if there is nothing to restore,
    /// or the first error hit while restoring.
    pub fn revert_latest(&self) -> Result<Vec<Utf8PathBuf>, ConsolidateError> {
        BackupStore::new(self.paths.backups_dir(), &self.cwd, Utc::now()).revert_latest()
    }

    /// Discovers the files under `paths` and consolidates each of them.
    ///
    /// Files are processed sequentially in discovery order. A file that
    /// fails with a [recoverable](ConsolidateError::is_recoverable) error is
    /// logged, counted in [`RunSummary::files_failed`], and left out of the
    /// results; the batch continues. Any other error ends the run.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::Pattern`] if an include or exclude pattern
    /// is invalid and [`ConsolidateError::Parser`] if no parser can be
    /// created.
    pub fn process_files(
        &self,
        paths: &[Utf8PathBuf],
        options: &RunOptions,
    ) -> Result<RunOutcome, ConsolidateError> {
        let excludes = options
            .exclude_patterns
            .as_deref()
            .unwrap_or(self.config.default_excludes.as_slice());
        let filter = PathFilter::new(&options.include_patterns, excludes)?;
        let files = FileWalker::new(&self.config.extensions, filter).collect(paths);
        info!(count = files.len(), "Found files to process");

        let mut cache = ContentCache::load(self.paths.cache_file(), self.config.cache_enabled);
        let backups = BackupStore::new(self.paths.backups_dir(), &self.cwd, Utc::now());
        let mut parsers = Parsers::default();
        let mut outcome = RunOutcome::default();

        for file in &files {
            debug!(path = %file, "Processing file");

            if options.use_cache && cache.is_file_cached(file) {
                info!(path = %file, "Skipped, cached and unchanged");
                outcome.summary.record_skipped();
                continue;
            }

            let parser = parsers.for_path(file)?;
            match self.consolidate_file(file, options, parser, &backups) {
                Ok(result) => {
                    log_result(&result, options.dry_run);
                    cache.cache_file(file, &result);
                    outcome.summary.record_processed(result.changed);
                    outcome.results.push(result);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(path = %file, error = %e, "Failed to process file");
                    outcome.summary.record_failed();
                }
                Err(e) => return Err(e),
            }
        }

        if let Err(e) = cache.save() {
            warn!(error = %e, "Failed to save cache");
        }

        info!(
            processed = outcome.summary.files_processed,
            changed = outcome.summary.files_changed,
            skipped = outcome.summary.files_skipped,
            failed = outcome.summary.files_failed,
            "Run completed"
        );

        Ok(outcome)
    }

    fn consolidate_file(
        &self,
        file: &Utf8Path,
        options: &RunOptions,
        parser: &mut TsParser,
        backups: &BackupStore,
    ) -> Result<ConsolidationResult, ConsolidateError> {
        let original = fs::read_to_string(file).map_err(|e| ConsolidateError::read(file, e))?;
        let scanned = scan(&original, &self.registry, &self.config.barrel_root, parser)
            .map_err(|e| ConsolidateError::parse(file, e))?;

        if scanned.matches.is_empty() {
            return Ok(ConsolidationResult::unchanged(file));
        }

        let out = rewrite(
            &scanned.matches,
            &original,
            options.sort_imports,
            &self.config.barrel_root,
        );

        let mut backup_path = None;
        if out.changed && !options.dry_run {
            backup_path = Some(backups.snapshot(file, original.as_bytes())?);
            write_atomic(file, out.new_content.as_bytes())
                .map_err(|e| ConsolidateError::write(file, e))?;
        }

        Ok(ConsolidationResult {
            file_path: file.to_owned(),
            original_imports: out.original_imports,
            consolidated_import: out.consolidated_import,
            changed: out.changed,
            backup_path,
        })
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.cwd.join(path)
        }
    }
}

/// One lazily created parser per grammar.
#[derive(Default)]
struct Parsers {
    typescript: Option<TsParser>,
    tsx: Option<TsParser>,
}

impl Parsers {
    fn for_path(&mut self, path: &Utf8Path) -> Result<&mut TsParser, ConsolidateError> {
        let kind = SourceKind::from_path(path);
        let slot = match kind {
            SourceKind::TypeScript => &mut self.typescript,
            SourceKind::Tsx => &mut self.tsx,
        };
        if slot.is_none() {
            *slot = Some(TsParser::for_kind(kind).map_err(ConsolidateError::Parser)?);
        }
        slot.as_mut()
            .ok_or(ConsolidateError::Parser(hy_ts_parser::ParseError::LanguageInit))
    }
}

fn log_result(result: &ConsolidationResult, dry_run: bool) {
    let path = &result.file_path;
    if !result.changed {
        debug!(path = %path, "No UI imports to consolidate");
        return;
    }

    match (&result.backup_path, dry_run) {
        (_, true) => info!(path = %path, "Would consolidate imports"),
        (Some(backup), false) => info!(path = %path, backup = %backup, "Consolidated imports"),
        (None, false) => info!(path = %path, "Consolidated imports"),
    }
    for original in &result.original_imports {
        debug!(path = %path, import = %original, "Original import");
    }
    debug!(path = %path, import = %result.consolidated_import, "Consolidated to");
}
