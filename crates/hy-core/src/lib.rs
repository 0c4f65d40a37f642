//! Core types, errors, and configuration for the hygienic import consolidator.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`Config`] and [`StatePaths`] for the persisted configuration and the
//!   on-disk locations of the cache, history, backups, and reports
//! - [`ConfigError`] for configuration failures
//! - Domain types ([`ComponentRegistry`], [`ImportMatch`],
//!   [`ConsolidationResult`], [`CacheEntry`], [`RunRecord`])
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fs;
pub mod hash;
pub mod types;

pub use config::{Config, StatePaths, DEFAULT_BARREL_ROOT};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{
    CacheEntry, ComponentRegistry, ConsolidationResult, ImportMatch, RunOptions, RunRecord,
    RunStatus, SourceLocation,
};
