//! The set of UI component names eligible for consolidation.
//!
//! A [`ComponentRegistry`] is assembled once per run from the barrel modules'
//! exports plus the configured allow-list. After that it is only ever passed
//! by shared reference into each file scan.
//!
//! ```
//! use hy_core::ComponentRegistry;
//!
//! let registry: ComponentRegistry = ["Button", "Input"].into_iter().collect();
//! assert!(registry.contains("Button"));
//! assert!(!registry.contains("Dialog"));
//! ```

use serde::{Deserialize, Serialize};

use crate::FxHashSet;

/// A set of unique component names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    names: FxHashSet<String>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` is a known component.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of distinct names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the names in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns all names sorted, for display and deterministic output.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ComponentRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dedups() {
        let registry: ComponentRegistry = ["Button", "Button", "Card"].into_iter().collect();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Card"));
    }

    #[test]
    fn test_registry_extend_unions() {
        let mut registry: ComponentRegistry = ["Button"].into_iter().collect();
        registry.extend(vec!["Input".to_owned(), "Button".to_owned()]);
        assert_eq!(registry.sorted_names(), vec!["Button", "Input"]);
    }

    #[test]
    fn test_registry_empty() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains(""));
    }
}
