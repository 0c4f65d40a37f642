//! Domain types for the hygienic import consolidator.
//!
//! # Module Organization
//!
//! - [`registry`] - The set of known UI component names
//! - [`matches`] - Qualifying import statements found in one file
//! - [`result`] - Per-file outcome of a consolidation
//! - [`ledger`] - Persisted cache entries and run records
//! - [`location`] - Source code positions
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use hy_core::{ComponentRegistry, ImportMatch, ConsolidationResult};
//! ```

pub mod ledger;
pub mod location;
pub mod matches;
pub mod registry;
pub mod result;

pub use ledger::{CacheEntry, RunOptions, RunRecord, RunStatus};
pub use location::SourceLocation;
pub use matches::ImportMatch;
pub use registry::ComponentRegistry;
pub use result::ConsolidationResult;
