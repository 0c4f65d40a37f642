//! Error types for the hy-ts-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while parsing TypeScript or TSX source.

/// Errors that can occur during parsing.
///
/// # Examples
///
/// ```
/// use hy_ts_parser::ParseError;
///
/// fn describe(err: &ParseError) -> String {
///     match err {
///         ParseError::LanguageInit => "grammar could not be loaded".to_owned(),
///         ParseError::QueryCompile { offset, .. } => format!("bad query at {offset}"),
///         ParseError::Parse => "parser gave up".to_owned(),
///         ParseError::Syntax { line, column } => format!("syntax error at {line}:{column}"),
///     }
/// }
///
/// assert_eq!(describe(&ParseError::Syntax { line: 2, column: 7 }), "syntax error at 2:7");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the TypeScript or TSX language on the parser.
    #[error("failed to set TypeScript language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryErrorKind,
    },

    /// The parser returned no tree (cancelled or timed out).
    #[error("failed to parse source code")]
    Parse,

    /// The source is not syntactically valid.
    ///
    /// Points at the first error or missing node in the tree.
    #[error("invalid syntax at line {line}, column {column}")]
    Syntax {
        /// 1-based line of the first error.
        line: u32,
        /// 0-based column of the first error.
        column: u32,
    },
}
