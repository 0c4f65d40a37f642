//! Include/exclude filtering for discovered files.
//!
//! Patterns come from the command line or the configured default excludes,
//! and come in two flavours:
//!
//! - A plain pattern (`node_modules`, `legacy/`) matches any path that
//!   contains it as a substring.
//! - A pattern with glob metacharacters (`*`, `?`, `[`, `{`) is compiled
//!   with `globset` and matched against the path and each of its trailing
//!   component suffixes, so `*.stories.tsx` and `pages/**` work on relative
//!   and absolute paths alike.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use hy_consolidator::PathFilter;
//!
//! let filter = PathFilter::new(&[], &["node_modules".to_owned(), "*.stories.tsx".to_owned()])?;
//! assert!(filter.accepts(Utf8Path::new("src/pages/Home.tsx")));
//! assert!(!filter.accepts(Utf8Path::new("src/node_modules/x/Button.tsx")));
//! assert!(!filter.accepts(Utf8Path::new("src/Button.stories.tsx")));
//! # Ok::<(), hy_consolidator::ConsolidateError>(())
//! ```

use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ConsolidateError;

const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', '{'];

/// A compiled list of patterns.
#[derive(Debug, Clone)]
struct PatternSet {
    substrings: Vec<String>,
    globs: GlobSet,
}

impl PatternSet {
    fn new(patterns: &[String]) -> Result<Self, ConsolidateError> {
        let mut substrings = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns.iter().filter(|p| !p.is_empty()) {
            if pattern.contains(GLOB_METACHARACTERS) {
                let glob = Glob::new(pattern).map_err(|source| ConsolidateError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            } else {
                substrings.push(pattern.clone());
            }
        }
        let globs = builder.build().map_err(|source| ConsolidateError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { substrings, globs })
    }

    fn is_empty(&self) -> bool {
        self.substrings.is_empty() && self.globs.is_empty()
    }

    fn matches(&self, path: &Utf8Path) -> bool {
        let text = path.as_str();
        if self.substrings.iter().any(|s| text.contains(s.as_str())) {
            return true;
        }
        if self.globs.is_empty() {
            return false;
        }
        if self.globs.is_match(text) {
            return true;
        }
        // Try every suffix: `a/b/c.tsx`, then `b/c.tsx`, then `c.tsx`.
        text.match_indices('/')
            .any(|(i, _)| self.globs.is_match(&text[i + 1..]))
    }
}

/// Decides which discovered files are processed.
///
/// A path is accepted when it matches no exclude pattern and, if any include
/// patterns are given, at least one include pattern.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: PatternSet,
    exclude: PatternSet,
}

impl PathFilter {
    /// Compiles the include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::Pattern`] if a glob pattern is invalid.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConsolidateError> {
        Ok(Self {
            include: PatternSet::new(include)?,
            exclude: PatternSet::new(exclude)?,
        })
    }

    /// A filter that accepts every path.
    #[must_use]
    pub fn accept_all() -> Self {
        Self {
            include: PatternSet {
                substrings: Vec::new(),
                globs: GlobSet::empty(),
            },
            exclude: PatternSet {
                substrings: Vec::new(),
                globs: GlobSet::empty(),
            },
        }
    }

    /// Returns `true` if `path` should be processed.
    #[must_use]
    pub fn accepts(&self, path: &Utf8Path) -> bool {
        if self.exclude.matches(path) {
            return false;
        }
        self.include.is_empty() || self.include.matches(path)
    }
}
