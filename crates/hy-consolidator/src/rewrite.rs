//! Line-based rewrite of qualifying imports into one barrel import.
//!
//! Every line on which a qualifying declaration starts is a target. The
//! first target line becomes the consolidated statement and the remaining
//! target lines are dropped. All other lines, including their line endings,
//! are emitted byte for byte.
//!
//! A qualifying declaration must sit alone on a single physical line. Code
//! sharing that line is dropped together with it, and a declaration spread
//! over several lines keeps its continuation lines.
//!
//! # Examples
//!
//! ```
//! use hy_core::ImportMatch;
//! use hy_consolidator::rewrite;
//!
//! let mut button = ImportMatch::new("@/shared/components/ui/button");
//! button.push("Button", 2);
//! let mut input = ImportMatch::new("@/shared/components/ui/input");
//! input.push("Input", 3);
//!
//! let original = "import React from 'react';\nimport { Button } from '@/shared/components/ui/button';\nimport { Input } from '@/shared/components/ui/input';\n";
//! let out = rewrite(&[button, input], original, false, "@/shared/components/ui");
//!
//! assert!(out.changed);
//! assert_eq!(
//!     out.new_content,
//!     "import React from 'react';\nimport { Button, Input } from '@/shared/components/ui';\n"
//! );
//! ```

use hy_core::{FxHashSet, ImportMatch, fx_hash_set};

/// Output of [`rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten file text.
    pub new_content: String,
    /// Whether `new_content` differs from the original.
    pub changed: bool,
    /// The statement that replaced the qualifying imports, or empty.
    pub consolidated_import: String,
    /// Each qualifying import rendered with sorted names, for display.
    pub original_imports: Vec<String>,
}

/// Returns the union of every matched name, first-seen order unless `sort`.
#[must_use]
pub fn consolidated_names(matches: &[ImportMatch], sort: bool) -> Vec<&str> {
    let mut seen: FxHashSet<&str> = fx_hash_set();
    let mut names: Vec<&str> = matches
        .iter()
        .flat_map(|m| m.names.iter().map(String::as_str))
        .filter(|name| seen.insert(*name))
        .collect();
    if sort {
        names.sort_unstable();
    }
    names
}

/// Renders `import { A, B } from '<barrel_root>';`.
#[must_use]
pub fn render_consolidated(names: &[&str], barrel_root: &str) -> String {
    format!(
        "import {{ {} }} from '{}';",
        names.join(", "),
        barrel_root.trim_end_matches('/')
    )
}

/// Replaces the lines of `matches` in `original` with one consolidated import.
#[must_use]
pub fn rewrite(matches: &[ImportMatch], original: &str, sort: bool, barrel_root: &str) -> Rewrite {
    if matches.is_empty() {
        return Rewrite {
            new_content: original.to_owned(),
            changed: false,
            consolidated_import: String::new(),
            original_imports: Vec::new(),
        };
    }

    let consolidated_import = render_consolidated(&consolidated_names(matches, sort), barrel_root);

    let targets: FxHashSet<u32> = matches
        .iter()
        .flat_map(|m| m.line_numbers.iter().copied())
        .collect();

    let mut lines: Vec<&str> = Vec::new();
    let mut emitted = false;
    for (line_number, line) in (1u32..).zip(original.split('\n')) {
        if !targets.contains(&line_number) {
            lines.push(line);
        } else if !emitted {
            lines.push(&consolidated_import);
            emitted = true;
        }
    }
    let new_content = lines.join("\n");

    Rewrite {
        changed: new_content != original,
        new_content,
        original_imports: matches.iter().map(ImportMatch::render).collect(),
        consolidated_import,
    }
}
