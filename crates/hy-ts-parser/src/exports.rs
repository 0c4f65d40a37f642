//! Export extraction for barrel modules.
//!
//! A barrel such as `src/shared/components/ui/index.ts` re-exports every UI
//! component under its public name. [`exported_names`] collects those names
//! from a [`ParsedModule`]:
//!
//! | Form | Contributes |
//! |------|-------------|
//! | `export { Button }` | `Button` |
//! | `export { Input as TextInput } from './input'` | `TextInput` |
//! | `export { default as Card } from './card'` | `Card` |
//! | `export const Badge = ...` | `Badge` |
//! | `export * as Icons from './icons'` | `Icons` |
//! | `export * from './dialog'` | nothing |
//! | `export default ...` | nothing |
//!
//! # Examples
//!
//! ```
//! use hy_ts_parser::{SourceKind, parse_exported_names};
//!
//! let barrel = "export { Button } from './button';\nexport { Input as TextInput } from './input';";
//! let names = parse_exported_names(barrel, SourceKind::TypeScript)?;
//! assert_eq!(names, vec!["Button", "TextInput"]);
//! # Ok::<(), hy_ts_parser::ParseError>(())
//! ```

use crate::ast::{ExportDecl, ModuleVisitor};
use crate::error::ParseError;
use crate::parser::{ParsedModule, SourceKind, TsParser};

/// Visitor that gathers exported names in source order, without duplicates.
#[derive(Debug, Default)]
pub struct ExportCollector<'src> {
    names: Vec<&'src str>,
}

impl<'src> ExportCollector<'src> {
    /// Consumes the collector and returns the names.
    #[must_use]
    pub fn into_names(self) -> Vec<&'src str> {
        self.names
    }
}

impl<'src> ModuleVisitor<'src> for ExportCollector<'src> {
    fn visit_export(&mut self, decl: &ExportDecl<'src>) {
        for name in &decl.names {
            if !self.names.contains(&name.exported) {
                self.names.push(name.exported);
            }
        }
    }
}

/// Returns every public name a module exports.
#[must_use]
pub fn exported_names<'src>(module: &ParsedModule<'src>) -> Vec<&'src str> {
    let mut collector = ExportCollector::default();
    module.walk(&mut collector);
    collector.into_names()
}

/// Parses `source` and returns its exported names as owned strings.
///
/// # Errors
///
/// Returns [`ParseError`] if the parser cannot be created or the source is
/// not valid.
pub fn parse_exported_names(source: &str, kind: SourceKind) -> Result<Vec<String>, ParseError> {
    let mut parser = TsParser::for_kind(kind)?;
    let module = parser.parse(source)?;
    Ok(exported_names(&module)
        .into_iter()
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(source: &str) -> Vec<String> {
        parse_exported_names(source, SourceKind::TypeScript).expect("barrel should parse")
    }

    #[test]
    fn test_clause_exports_use_public_name() {
        let source = r"export { Input as TextInput } from './input';
export { default as Card } from './card';
export { Button, ButtonGroup } from './button';
";
        assert_eq!(names(source), vec!["TextInput", "Card", "Button", "ButtonGroup"]);
    }

    #[test]
    fn test_local_clause_exports() {
        let source = r"import { Tooltip as Tip } from './tooltip';
const Spinner = () => null;
export { Tip, Spinner as Loader };
";
        assert_eq!(names(source), vec!["Tip", "Loader"]);
    }

    #[test]
    fn test_declaration_exports() {
        let source = r"export const Badge = () => null, Chip = () => null;
export function Avatar() { return null; }
export class Table {}
export interface TableProps { rows: number }
export type Size = 'sm' | 'lg';
export enum Variant { Primary, Secondary }
";
        assert_eq!(
            names(source),
            vec!["Badge", "Chip", "Avatar", "Table", "TableProps", "Size", "Variant"]
        );
    }

    #[test]
    fn test_star_and_default_exports_contribute_nothing() {
        let source = r"export * from './dialog';
export default function Root() { return null; }
export { Button as default } from './button';
";
        assert!(names(source).is_empty());
    }

    #[test]
    fn test_namespace_reexport() {
        assert_eq!(names("export * as Icons from './icons';"), vec!["Icons"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let source = "export { Button } from './button';\nexport { Button } from './button-v2';";
        assert_eq!(names(source), vec!["Button"]);
    }

    #[test]
    fn test_invalid_barrel_is_error() {
        assert!(parse_exported_names("export { Button from", SourceKind::TypeScript).is_err());
    }
}
