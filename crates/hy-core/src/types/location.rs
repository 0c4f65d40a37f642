//! Source positions attached to parsed module items.

use serde::{Deserialize, Serialize};

/// A position within a source file.
///
/// `line` is 1-indexed, matching the numbering editors show and the line
/// numbers recorded in [`ImportMatch`](crate::ImportMatch). `column` is a
/// 0-indexed byte offset within the line.
///
/// # Examples
///
/// ```
/// use hy_core::SourceLocation;
///
/// let loc = SourceLocation::new(3, 0);
/// assert_eq!(loc.line, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: u32,

    /// Column (0-indexed, in bytes).
    pub column: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_default_is_zero() {
        let loc = SourceLocation::default();
        assert_eq!(loc, SourceLocation::new(0, 0));
    }

    #[test]
    fn test_source_location_ordering_fields() {
        let loc = SourceLocation::new(12, 4);
        assert_eq!(loc.line, 12);
        assert_eq!(loc.column, 4);
    }
}
