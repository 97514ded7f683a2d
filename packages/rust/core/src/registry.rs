//! Section registry: the fixed, ordered set of documentation categories.

use docsgen_shared::{CategoryDef, default_categories};

/// Ordered, immutable collection of categories.
///
/// Insertion order is processing order and status-table column order.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    categories: Vec<CategoryDef>,
}

impl SectionRegistry {
    /// Build a registry from configured categories.
    ///
    /// Uniqueness and naming are checked by `AppConfig::validate`.
    pub fn new(categories: Vec<CategoryDef>) -> Self {
        Self { categories }
    }

    /// Category names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Look up a category by its stable name.
    pub fn get(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryDef> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl<'a> IntoIterator for &'a SectionRegistry {
    type Item = &'a CategoryDef;
    type IntoIter = std::slice::Iter<'a, CategoryDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order() {
        let registry = SectionRegistry::default();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["tutorials", "howtos", "explanations", "references"]);
    }

    #[test]
    fn lookup_by_name() {
        let registry = SectionRegistry::default();
        assert_eq!(registry.get("howtos").unwrap().marker, "How To");
        assert!(registry.get("missing").is_none());
    }
}
