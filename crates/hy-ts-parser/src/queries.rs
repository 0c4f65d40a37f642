//! Pre-compiled tree-sitter query for top-level module items.
//!
//! Only statements that are direct children of `program` are captured, so
//! imports inside `declare module` blocks or namespaces are never seen.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;
use crate::parser::SourceKind;

/// Captures every top-level import and export statement.
///
/// # Capture Names
///
/// - `item.import` - An `import_statement` node
/// - `item.export` - An `export_statement` node
pub const MODULE_ITEM_QUERY: &str = r"
(program (import_statement) @item.import)
(program (export_statement) @item.export)
";

/// Capture index for `item.import`.
pub const CAPTURE_ITEM_IMPORT: u32 = 0;

/// Capture index for `item.export`.
pub const CAPTURE_ITEM_EXPORT: u32 = 1;

static COMPILED_QUERY_TS: OnceLock<Query> = OnceLock::new();
static COMPILED_QUERY_TSX: OnceLock<Query> = OnceLock::new();

/// Returns the compiled module item query for `kind`.
///
/// The query is compiled once per grammar and cached for the life of the
/// process. This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn module_item_query(kind: SourceKind) -> Result<&'static Query, ParseError> {
    let cell = match kind {
        SourceKind::TypeScript => &COMPILED_QUERY_TS,
        SourceKind::Tsx => &COMPILED_QUERY_TSX,
    };
    if let Some(query) = cell.get() {
        return Ok(query);
    }

    let query = compile_query(&kind.language())?;
    Ok(cell.get_or_init(|| query))
}

fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, MODULE_ITEM_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_compiles_for_both_grammars() {
        assert!(module_item_query(SourceKind::TypeScript).is_ok());
        assert!(module_item_query(SourceKind::Tsx).is_ok());
    }

    #[test]
    fn test_capture_indices() {
        let query = module_item_query(SourceKind::Tsx).expect("Query should compile");
        assert_eq!(query.capture_index_for_name("item.import"), Some(CAPTURE_ITEM_IMPORT));
        assert_eq!(query.capture_index_for_name("item.export"), Some(CAPTURE_ITEM_EXPORT));
        assert_eq!(query.pattern_count(), 2);
    }
}
