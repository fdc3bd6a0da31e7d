// src/resolver/index.rs

//! Reverse dependency index built during the closure walk

use std::collections::HashMap;

/// Package names interned into a flat table; the walker works on indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PackageTable {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl PackageTable {
    pub(crate) fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub(crate) fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// Which walked packages require a given package.
///
/// A name is a key only once some visited package declared it as a
/// dependency. Entries are append-only; dependents are kept in the order
/// they were recorded, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependsOnIndex {
    table: PackageTable,
    dependents: Vec<Vec<usize>>,
    keys: Vec<usize>,
}

impl DependsOnIndex {
    pub(crate) fn intern(&mut self, name: &str) -> usize {
        let id = self.table.intern(name);
        if id == self.dependents.len() {
            self.dependents.push(Vec::new());
        }
        id
    }

    pub(crate) fn name(&self, id: usize) -> &str {
        self.table.name(id)
    }

    pub(crate) fn interned(&self) -> usize {
        self.table.len()
    }

    /// Record that `dependent` requires `dependency`
    pub(crate) fn record(&mut self, dependency: usize, dependent: usize) {
        let entry = &mut self.dependents[dependency];
        if entry.is_empty() {
            self.keys.push(dependency);
        }
        entry.push(dependent);
    }

    /// Whether anything walked declared `name` as a dependency
    pub fn contains(&self, name: &str) -> bool {
        self.table
            .get(name)
            .is_some_and(|id| !self.dependents[id].is_empty())
    }

    /// Packages that require `name`, in the order they were recorded
    pub fn dependents(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.table.get(name)?;
        let entry = &self.dependents[id];
        if entry.is_empty() {
            return None;
        }
        Some(entry.iter().map(|&d| self.table.name(d)).collect())
    }

    /// Keys in the order they were first recorded
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|&id| self.table.name(id))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = PackageTable::default();
        let a = table.intern("a");
        let b = table.intern("b");
        assert_eq!(table.intern("a"), a);
        assert_ne!(a, b);
        assert_eq!(table.name(b), "b");
        assert_eq!(table.get("c"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_interned_names_are_not_keys() {
        let mut index = DependsOnIndex::default();
        let root = index.intern("root");
        let dep = index.intern("dep");
        assert!(!index.contains("root"));
        assert!(!index.contains("dep"));

        index.record(dep, root);
        assert!(index.contains("dep"));
        assert!(!index.contains("root"));
        assert_eq!(index.dependents("dep"), Some(vec!["root"]));
        assert_eq!(index.dependents("root"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_keys_in_first_recorded_order() {
        let mut index = DependsOnIndex::default();
        let a = index.intern("a");
        let b = index.intern("b");
        let c = index.intern("c");
        index.record(c, a);
        index.record(b, a);
        index.record(c, b);

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["c", "b"]);
        assert_eq!(index.dependents("c"), Some(vec!["a", "b"]));
    }
}
