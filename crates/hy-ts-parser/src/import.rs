//! Detection of per-component imports that can be consolidated.
//!
//! An import declaration qualifies when its specifier is a sub-path of the
//! barrel root (`@/shared/components/ui/button`, not `@/shared/components/ui`
//! itself) and at least one of its bindings names a registered component.

use hy_core::{ComponentRegistry, ImportMatch};

use crate::ast::{ImportBinding, ImportDecl, ModuleVisitor};
use crate::error::ParseError;
use crate::parser::{ParsedModule, TsParser};

/// Outcome of scanning one file: the qualifying imports and the text they
/// were found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScan<'a> {
    /// Qualifying imports in declaration order.
    pub matches: Vec<ImportMatch>,
    /// The scanned text.
    pub original: &'a str,
}

/// Visitor that turns qualifying import declarations into [`ImportMatch`]es.
///
/// Named bindings are looked up by the name the barrel exports (`Input` in
/// `import { Input as TextInput }`); default bindings by their local name.
/// Either way the local name is what gets recorded, since that is what the
/// rest of the file refers to. Namespace bindings never qualify.
#[derive(Debug)]
pub struct ImportScanner<'r> {
    registry: &'r ComponentRegistry,
    prefix: String,
    matches: Vec<ImportMatch>,
}

impl<'r> ImportScanner<'r> {
    /// Creates a scanner for imports under `barrel_root`.
    #[must_use]
    pub fn new(registry: &'r ComponentRegistry, barrel_root: &str) -> Self {
        Self {
            registry,
            prefix: format!("{}/", barrel_root.trim_end_matches('/')),
            matches: Vec::new(),
        }
    }

    /// Returns `true` if `specifier` points below the barrel root.
    #[must_use]
    pub fn targets_sub_module(&self, specifier: &str) -> bool {
        specifier.len() > self.prefix.len() && specifier.starts_with(&self.prefix)
    }

    /// Consumes the scanner and returns the matches found.
    #[must_use]
    pub fn into_matches(self) -> Vec<ImportMatch> {
        self.matches
    }
}

impl<'src> ModuleVisitor<'src> for ImportScanner<'_> {
    fn visit_import(&mut self, decl: &ImportDecl<'src>) {
        if !self.targets_sub_module(decl.source) {
            return;
        }

        let line = decl.location.line;
        let mut found = ImportMatch::new(decl.source);
        for binding in &decl.bindings {
            let qualifies = match binding {
                ImportBinding::Named { imported, .. } => self.registry.contains(imported),
                ImportBinding::Default { local } => self.registry.contains(local),
                ImportBinding::Namespace { .. } => false,
            };
            if qualifies {
                found.push(binding.local(), line);
            }
        }

        if !found.is_empty() {
            self.matches.push(found);
        }
    }
}

/// Collects the qualifying imports of an already parsed module.
#[must_use]
pub fn scan_imports(
    module: &ParsedModule<'_>,
    registry: &ComponentRegistry,
    barrel_root: &str,
) -> Vec<ImportMatch> {
    let mut scanner = ImportScanner::new(registry, barrel_root);
    module.walk(&mut scanner);
    scanner.into_matches()
}

/// Parses `content` with `parser` and collects its qualifying imports.
///
/// # Errors
///
/// Returns [`ParseError`] if `content` is not valid for the parser's grammar.
///
/// # Examples
///
/// ```
/// use hy_core::ComponentRegistry;
/// use hy_ts_parser::{TsParser, scan};
///
/// let registry: ComponentRegistry = ["Button"].into_iter().collect();
/// let mut parser = TsParser::new_tsx()?;
/// let content = "import { Button } from '@/shared/components/ui/button';\n";
///
/// let file = scan(content, &registry, "@/shared/components/ui", &mut parser)?;
/// assert_eq!(file.matches.len(), 1);
/// assert_eq!(file.matches[0].line_numbers.as_slice(), [1]);
/// # Ok::<(), hy_ts_parser::ParseError>(())
/// ```
pub fn scan<'a>(
    content: &'a str,
    registry: &ComponentRegistry,
    barrel_root: &str,
    parser: &mut TsParser,
) -> Result<FileScan<'a>, ParseError> {
    let module = parser.parse(content)?;
    Ok(FileScan {
        matches: scan_imports(&module, registry, barrel_root),
        original: content,
    })
}
