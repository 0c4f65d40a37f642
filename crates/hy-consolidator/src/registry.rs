//! Component registry loading from barrel modules.
//!
//! This module provides [`RegistryBuilder`], which parses each configured
//! barrel file (e.g. `src/shared/components/ui/index.ts`), collects the
//! public names it exports, and unions them with the configured allow-list.
//!
//! # Usage
//!
//! ```ignore
//! use hy_consolidator::RegistryBuilder;
//! use camino::Utf8PathBuf;
//!
//! let built = RegistryBuilder::new(vec![Utf8PathBuf::from("src/shared/components/ui/index.ts")])
//!     .with_extra_names(["Dialog".to_owned()])
//!     .build();
//!
//! for failure in built.failures {
//!     eprintln!("barrel skipped: {failure}");
//! }
//! assert!(built.registry.contains("Dialog"));
//! ```
//!
//! # Failures
//!
//! A barrel that cannot be read or parsed contributes no names. Its error is
//! returned in [`RegistryBuildResult::failures`] rather than aborting the
//! build; the caller decides how loudly to report it.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use hy_core::ComponentRegistry;
use hy_ts_parser::{SourceKind, parse_exported_names};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::ConsolidateError;

/// Outcome of building a registry.
#[derive(Debug)]
pub struct RegistryBuildResult {
    /// Every name found, plus the extra names.
    pub registry: ComponentRegistry,
    /// One entry per barrel that contributed nothing because it failed.
    pub failures: Vec<ConsolidateError>,
}

/// Builder for a [`ComponentRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    /// Barrel modules to parse.
    barrel_paths: Vec<Utf8PathBuf>,
    /// Names registered regardless of what the barrels export.
    extra_names: Vec<String>,
}

impl RegistryBuilder {
    /// Creates a builder for the given barrel files.
    #[must_use]
    pub fn new(barrel_paths: Vec<Utf8PathBuf>) -> Self {
        Self {
            barrel_paths,
            extra_names: Vec::new(),
        }
    }

    /// Adds names that are always treated as components.
    #[must_use]
    pub fn with_extra_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.extra_names.extend(names);
        self
    }

    /// Parses every barrel in parallel and returns the union of their exports.
    ///
    /// Never fails as a whole; see [`RegistryBuildResult::failures`].
    #[must_use]
    pub fn build(&self) -> RegistryBuildResult {
        let per_barrel: Vec<Result<Vec<String>, ConsolidateError>> = self
            .barrel_paths
            .par_iter()
            .map(|path| load_barrel(path))
            .collect();

        let mut registry = ComponentRegistry::new();
        let mut failures = Vec::new();
        for (path, outcome) in self.barrel_paths.iter().zip(per_barrel) {
            match outcome {
                Ok(names) => {
                    debug!(path = %path, exports = names.len(), "Registered barrel exports");
                    registry.extend(names);
                }
                Err(e) => failures.push(e),
            }
        }
        registry.extend(self.extra_names.iter().cloned());

        info!(
            barrels = self.barrel_paths.len(),
            failed = failures.len(),
            components = registry.len(),
            "Component registry built"
        );

        RegistryBuildResult { registry, failures }
    }
}

/// Reads one barrel file and returns the names it exports.
///
/// The grammar is chosen from the file extension: `.ts`, `.mts` and `.cts`
/// parse as TypeScript, anything else as TSX.
///
/// # Errors
///
/// Returns [`ConsolidateError::Read`] if the file cannot be read and
/// [`ConsolidateError::Parse`] if it is not valid source.
pub fn load_barrel(path: &Utf8Path) -> Result<Vec<String>, ConsolidateError> {
    let source = fs::read_to_string(path).map_err(|e| ConsolidateError::read(path, e))?;
    parse_exported_names(&source, SourceKind::from_path(path))
        .map_err(|e| ConsolidateError::parse(path, e))
}

/// Returns `true` if the failure only means the barrel does not exist.
#[must_use]
pub fn is_missing_barrel(error: &ConsolidateError) -> bool {
    matches!(error, ConsolidateError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
}
