//! TypeScript parser management using tree-sitter.
//!
//! This module provides [`TsParser`], which parses a source file, rejects it
//! if the tree contains syntax errors, and lowers its top-level imports and
//! exports into a [`ParsedModule`].

use camino::Utf8Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, QueryCursor};

use crate::ast::{self, ModuleItem, ModuleVisitor, node_to_location};
use crate::error::ParseError;
use crate::queries::{CAPTURE_ITEM_EXPORT, CAPTURE_ITEM_IMPORT, module_item_query};

/// Which tree-sitter grammar to parse with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`).
    TypeScript,
    /// TypeScript with JSX. Also used for `.js`/`.jsx`.
    Tsx,
}

impl SourceKind {
    /// Picks the grammar from a file extension.
    ///
    /// `.ts`, `.mts`, and `.cts` use the TypeScript grammar, where `<T>expr`
    /// casts are legal. Everything else uses TSX.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use hy_ts_parser::SourceKind;
    ///
    /// assert_eq!(SourceKind::from_path(Utf8Path::new("ui/index.ts")), SourceKind::TypeScript);
    /// assert_eq!(SourceKind::from_path(Utf8Path::new("pages/Home.tsx")), SourceKind::Tsx);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }

    pub(crate) fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// The top-level imports and exports of one source file, in source order.
///
/// Borrows from the source text; the syntax tree itself is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule<'src> {
    /// Lowered statements, ordered by start position.
    pub items: Vec<ModuleItem<'src>>,
}

impl<'src> ParsedModule<'src> {
    /// Walks the items with `visitor`.
    pub fn walk<V>(&self, visitor: &mut V)
    where
        V: ModuleVisitor<'src> + ?Sized,
    {
        ast::walk(&self.items, visitor);
    }
}

/// Parser for TypeScript and TSX source files.
///
/// Reuse one parser for many files of the same [`SourceKind`] to avoid
/// re-initialising the grammar.
///
/// # Thread Safety
///
/// `TsParser` is `Send` but not `Sync`. The compiled query is shared
/// globally.
///
/// # Examples
///
/// ```
/// use hy_ts_parser::{ModuleItem, TsParser};
///
/// let mut parser = TsParser::new_tsx()?;
/// let source = "import { Button } from '@/shared/components/ui/button';\n";
/// let module = parser.parse(source)?;
///
/// assert!(matches!(&module.items[0], ModuleItem::Import(decl) if decl.source.ends_with("/button")));
/// # Ok::<(), hy_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    parser: Parser,
    kind: SourceKind,
}

impl TsParser {
    /// Creates a parser for plain TypeScript.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be loaded.
    pub fn new() -> Result<Self, ParseError> {
        Self::for_kind(SourceKind::TypeScript)
    }

    /// Creates a parser for TSX.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be loaded.
    pub fn new_tsx() -> Result<Self, ParseError> {
        Self::for_kind(SourceKind::Tsx)
    }

    /// Creates a parser for the given grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be loaded.
    pub fn for_kind(kind: SourceKind) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&kind.language())
            .map_err(|_| ParseError::LanguageInit)?;
        Ok(Self { parser, kind })
    }

    /// The grammar this parser uses.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Parses `source` and lowers its top-level imports and exports.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] if the tree contains an error or missing node
    /// - [`ParseError::Parse`] if tree-sitter produced no tree
    /// - [`ParseError::QueryCompile`] if the module item query fails to compile
    pub fn parse<'src>(&mut self, source: &'src str) -> Result<ParsedModule<'src>, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::Parse)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(first_syntax_error(root));
        }

        let query = module_item_query(self.kind)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, root, source.as_bytes());

        let mut items: Vec<(usize, ModuleItem<'src>)> = Vec::new();
        while let Some(match_) = matches.next() {
            for capture in match_.captures {
                let item = match capture.index {
                    CAPTURE_ITEM_IMPORT => ast::lower_import(capture.node, source),
                    CAPTURE_ITEM_EXPORT => ast::lower_export(capture.node, source),
                    _ => continue,
                };
                items.push((capture.node.start_byte(), item));
            }
        }
        items.sort_by_key(|(start, _)| *start);

        Ok(ParsedModule {
            items: items.into_iter().map(|(_, item)| item).collect(),
        })
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Finds the first error or missing node in document order.
///
/// Only subtrees that report `has_error()` are descended into.
fn first_syntax_error(root: Node<'_>) -> ParseError {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return syntax_error_at(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return syntax_error_at(root);
            }
        }
    }
}

fn syntax_error_at(node: Node<'_>) -> ParseError {
    let location = node_to_location(node);
    ParseError::Syntax {
        line: location.line,
        column: location.column,
    }
}
