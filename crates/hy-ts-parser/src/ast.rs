//! Typed view of a module's top-level import and export statements.
//!
//! tree-sitter hands back untyped [`Node`]s. This module lowers the few node
//! shapes the consolidator cares about into a small sum type,
//! [`ModuleItem`], and offers [`ModuleVisitor`] for walking the result. The
//! lowering dispatches explicitly on `node.kind()`; statement shapes that are
//! not modelled become [`ModuleItem::Unsupported`].
//!
//! All strings borrow from the source text, so a [`ModuleItem`] outlives the
//! syntax tree it was lowered from.

use hy_core::SourceLocation;
use smallvec::SmallVec;
use tree_sitter::Node;

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleItem<'src> {
    /// `import ... from '...'`
    Import(ImportDecl<'src>),
    /// `export ...`
    Export(ExportDecl<'src>),
    /// An import or export whose shape is not modelled, e.g. `import x = require('y')`.
    Unsupported {
        /// The tree-sitter node kind.
        kind: &'static str,
        /// Where the statement starts.
        location: SourceLocation,
    },
}

impl ModuleItem<'_> {
    /// Where the statement starts.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        match self {
            Self::Import(decl) => decl.location,
            Self::Export(decl) => decl.location,
            Self::Unsupported { location, .. } => *location,
        }
    }
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl<'src> {
    /// Module specifier without quotes.
    pub source: &'src str,
    /// Bindings in source order. Empty for side-effect imports.
    pub bindings: SmallVec<[ImportBinding<'src>; 4]>,
    /// `import type { ... }`
    pub type_only: bool,
    /// Where the statement starts.
    pub location: SourceLocation,
}

/// One binding introduced by an import declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportBinding<'src> {
    /// `import Local from '...'`
    Default {
        /// The local name.
        local: &'src str,
    },
    /// `import { Imported as Local } from '...'`; `local == imported` without `as`.
    Named {
        /// The name exported by the target module.
        imported: &'src str,
        /// The local name.
        local: &'src str,
    },
    /// `import * as Local from '...'`
    Namespace {
        /// The local name.
        local: &'src str,
    },
}

impl<'src> ImportBinding<'src> {
    /// The name the binding introduces in this module.
    #[must_use]
    pub const fn local(&self) -> &'src str {
        match self {
            Self::Default { local } | Self::Named { local, .. } | Self::Namespace { local } => {
                *local
            }
        }
    }
}

/// An export statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDecl<'src> {
    /// Publicly visible names this statement contributes.
    pub names: SmallVec<[ExportedName<'src>; 4]>,
    /// Module specifier for `export ... from '...'`.
    pub source: Option<&'src str>,
    /// `export default ...`
    pub is_default: bool,
    /// Where the statement starts.
    pub location: SourceLocation,
}

/// A name made public by an export statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportedName<'src> {
    /// The public name, e.g. `TextInput` in `export { Input as TextInput }`.
    pub exported: &'src str,
    /// How the name was introduced.
    pub origin: ExportOrigin,
}

/// Which export form introduced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportOrigin {
    /// `export { A, B as C }`, with or without `from`.
    Clause,
    /// `export const A`, `export function A`, `export class A`, ...
    Declaration,
    /// `export * as Ns from '...'`
    Namespace,
}

/// Callbacks for walking lowered module items.
///
/// Every method has an empty default, so implementors only override the
/// item kinds they care about.
pub trait ModuleVisitor<'src> {
    /// Called for each import declaration.
    fn visit_import(&mut self, _decl: &ImportDecl<'src>) {}

    /// Called for each export statement.
    fn visit_export(&mut self, _decl: &ExportDecl<'src>) {}

    /// Called for statements that were not lowered.
    fn visit_unsupported(&mut self, _kind: &'static str, _location: SourceLocation) {}
}

/// Dispatches each item to the matching visitor method, in order.
pub fn walk<'src, V>(items: &[ModuleItem<'src>], visitor: &mut V)
where
    V: ModuleVisitor<'src> + ?Sized,
{
    for item in items {
        match item {
            ModuleItem::Import(decl) => visitor.visit_import(decl),
            ModuleItem::Export(decl) => visitor.visit_export(decl),
            ModuleItem::Unsupported { kind, location } => {
                visitor.visit_unsupported(kind, *location);
            }
        }
    }
}

// =============================================================================
// LOWERING
// =============================================================================

/// Lowers an `import_statement` node.
pub(crate) fn lower_import<'src>(node: Node<'_>, source: &'src str) -> ModuleItem<'src> {
    let location = node_to_location(node);
    let Some(specifier) = node
        .child_by_field_name("source")
        .and_then(|n| node_text(n, source))
    else {
        return ModuleItem::Unsupported {
            kind: "import_statement",
            location,
        };
    };

    let mut bindings = SmallVec::new();
    let mut type_only = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type" => type_only = true,
            "import_clause" => lower_import_clause(child, source, &mut bindings),
            _ => {}
        }
    }

    ModuleItem::Import(ImportDecl {
        source: unquote(specifier),
        bindings,
        type_only,
        location,
    })
}

fn lower_import_clause<'src>(
    clause: Node<'_>,
    source: &'src str,
    bindings: &mut SmallVec<[ImportBinding<'src>; 4]>,
) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                if let Some(local) = node_text(child, source) {
                    bindings.push(ImportBinding::Default { local });
                }
            }
            "namespace_import" => {
                let mut inner = child.walk();
                let local = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "identifier")
                    .and_then(|n| node_text(n, source));
                if let Some(local) = local {
                    bindings.push(ImportBinding::Namespace { local });
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for specifier in child.named_children(&mut inner) {
                    if specifier.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(imported) = specifier
                        .child_by_field_name("name")
                        .and_then(|n| node_text(n, source))
                    else {
                        continue;
                    };
                    let local = specifier
                        .child_by_field_name("alias")
                        .and_then(|n| node_text(n, source))
                        .unwrap_or(imported);
                    bindings.push(ImportBinding::Named {
                        imported: unquote(imported),
                        local,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Lowers an `export_statement` node.
pub(crate) fn lower_export<'src>(node: Node<'_>, source: &'src str) -> ModuleItem<'src> {
    let location = node_to_location(node);
    let mut decl = ExportDecl {
        names: SmallVec::new(),
        source: node
            .child_by_field_name("source")
            .and_then(|n| node_text(n, source))
            .map(unquote),
        is_default: false,
        location,
    };

    let mut cursor = node.walk();
    let children: SmallVec<[Node<'_>; 8]> = node.children(&mut cursor).collect();
    decl.is_default = children.iter().any(|child| child.kind() == "default");

    // `export default class Foo {}` exports `default`, not `Foo`.
    if !decl.is_default {
        if let Some(declaration) = node.child_by_field_name("declaration") {
            push_declaration_names(declaration, source, &mut decl.names);
        }
    }

    for child in children {
        match child.kind() {
            "export_clause" => {
                let mut inner = child.walk();
                for specifier in child.named_children(&mut inner) {
                    if specifier.kind() != "export_specifier" {
                        continue;
                    }
                    let exported = specifier
                        .child_by_field_name("alias")
                        .or_else(|| specifier.child_by_field_name("name"))
                        .and_then(|n| node_text(n, source))
                        .map(unquote);
                    if let Some(exported) = exported.filter(|name| *name != "default") {
                        decl.names.push(ExportedName {
                            exported,
                            origin: ExportOrigin::Clause,
                        });
                    }
                }
            }
            "namespace_export" => {
                let mut inner = child.walk();
                let exported = child
                    .named_children(&mut inner)
                    .find(|n| matches!(n.kind(), "identifier" | "string"))
                    .and_then(|n| node_text(n, source))
                    .map(unquote);
                if let Some(exported) = exported {
                    decl.names.push(ExportedName {
                        exported,
                        origin: ExportOrigin::Namespace,
                    });
                }
            }
            _ => {}
        }
    }

    ModuleItem::Export(decl)
}

/// Collects the names a declaration after `export` introduces.
fn push_declaration_names<'src>(
    declaration: Node<'_>,
    source: &'src str,
    names: &mut SmallVec<[ExportedName<'src>; 4]>,
) {
    match declaration.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration"
        | "internal_module"
        | "module" => push_declared(declaration.child_by_field_name("name"), source, names),
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            for declarator in declaration.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                // Destructuring patterns are skipped; only plain identifiers are kept.
                let name = declarator
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier");
                push_declared(name, source, names);
            }
        }
        "ambient_declaration" => {
            let mut cursor = declaration.walk();
            for child in declaration.named_children(&mut cursor) {
                push_declaration_names(child, source, names);
            }
        }
        _ => {}
    }
}

fn push_declared<'src>(
    name: Option<Node<'_>>,
    source: &'src str,
    names: &mut SmallVec<[ExportedName<'src>; 4]>,
) {
    if let Some(exported) = name.and_then(|n| node_text(n, source)) {
        names.push(ExportedName {
            exported,
            origin: ExportOrigin::Declaration,
        });
    }
}

/// Strips one pair of matching quotes from a string literal.
fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'\''), Some(b'\'')) | (Some(b'"'), Some(b'"')) if text.len() >= 2 => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Extracts text from a node.
pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Converts a node's start position to a 1-based [`SourceLocation`].
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn node_to_location(node: Node<'_>) -> SourceLocation {
    let start = node.start_position();
    SourceLocation::new(start.row as u32 + 1, start.column as u32)
}
