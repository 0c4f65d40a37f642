//! Qualifying import statements found while scanning a file.

use smallvec::SmallVec;

/// One import statement that pulls registered components from a barrel
/// sub-module, e.g. `import { Button } from '@/shared/components/ui/button'`.
///
/// `names` holds the local binding names in the order they were first seen,
/// without duplicates. `line_numbers` holds the 1-based line the statement
/// starts on, pushed once per matching binding, so it may repeat.
///
/// # Examples
///
/// ```
/// use hy_core::ImportMatch;
///
/// let mut m = ImportMatch::new("@/shared/components/ui/card");
/// m.push("CardHeader", 4);
/// m.push("Card", 4);
/// m.push("Card", 4);
///
/// assert_eq!(m.names.as_slice(), ["CardHeader", "Card"]);
/// assert_eq!(m.line_numbers.as_slice(), [4, 4, 4]);
/// assert_eq!(m.render(), "import { Card, CardHeader } from '@/shared/components/ui/card';");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    /// Module specifier without quotes.
    pub module_path: String,

    /// Local binding names, deduplicated, in first-seen order.
    pub names: SmallVec<[String; 4]>,

    /// 1-based start line of the statement, once per matching binding.
    pub line_numbers: SmallVec<[u32; 4]>,
}

impl ImportMatch {
    /// Creates an empty match for `module_path`.
    #[must_use]
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            names: SmallVec::new(),
            line_numbers: SmallVec::new(),
        }
    }

    /// Records a matching binding that starts on `line`.
    pub fn push(&mut self, name: impl Into<String>, line: u32) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self.line_numbers.push(line);
    }

    /// Returns `true` if no binding matched.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names sorted lexicographically.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Renders the statement with sorted names, for audit output.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "import {{ {} }} from '{}';",
            self.sorted_names().join(", "),
            self.module_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let m = ImportMatch::new("@/shared/components/ui/button");
        assert!(m.is_empty());
        assert!(m.line_numbers.is_empty());
    }

    #[test]
    fn test_push_keeps_first_seen_order() {
        let mut m = ImportMatch::new("@/shared/components/ui/select");
        m.push("SelectTrigger", 2);
        m.push("Select", 2);
        assert_eq!(m.names.as_slice(), ["SelectTrigger", "Select"]);
        assert_eq!(m.sorted_names(), vec!["Select", "SelectTrigger"]);
    }

    #[test]
    fn test_render_single_name() {
        let mut m = ImportMatch::new("@/shared/components/ui/button");
        m.push("Button", 1);
        assert_eq!(
            m.render(),
            "import { Button } from '@/shared/components/ui/button';"
        );
    }
}
