//! TypeScript/TSX parsing with tree-sitter for the hygienic consolidator.
//!
//! This crate turns source text into a small typed view of its top-level
//! imports and exports, then answers the two questions the consolidator asks:
//!
//! - Which names does a barrel module export? ([`parse_exported_names`])
//! - Which imports in a file pull registered components from barrel
//!   sub-modules? ([`scan`])
//!
//! # Overview
//!
//! ```
//! use hy_core::ComponentRegistry;
//! use hy_ts_parser::{SourceKind, TsParser, parse_exported_names, scan};
//!
//! let barrel = "export { Button } from './button';\nexport { Input } from './input';";
//! let registry: ComponentRegistry =
//!     parse_exported_names(barrel, SourceKind::TypeScript)?.into_iter().collect();
//!
//! let page = r"import { Button } from '@/shared/components/ui/button';
//! import { Input } from '@/shared/components/ui/input';
//! ";
//! let mut parser = TsParser::new_tsx()?;
//! let file = scan(page, &registry, "@/shared/components/ui", &mut parser)?;
//! assert_eq!(file.matches.len(), 2);
//! # Ok::<(), hy_ts_parser::ParseError>(())
//! ```
//!
//! # Syntax Errors
//!
//! tree-sitter always produces a tree, inserting `ERROR` and missing nodes
//! where the input is broken. [`TsParser::parse`] rejects any tree that
//! contains one with [`ParseError::Syntax`], so a broken file is never
//! rewritten based on a partial reading.
//!
//! # Thread Safety
//!
//! [`TsParser`] is `Send` but not `Sync`; create one per thread. The compiled
//! query is shared globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod exports;
mod import;
mod parser;
pub mod queries;

pub use ast::{
    ExportDecl, ExportOrigin, ExportedName, ImportBinding, ImportDecl, ModuleItem, ModuleVisitor,
};
pub use error::ParseError;
pub use exports::{ExportCollector, exported_names, parse_exported_names};
pub use import::{FileScan, ImportScanner, scan, scan_imports};
pub use parser::{ParsedModule, SourceKind, TsParser};
