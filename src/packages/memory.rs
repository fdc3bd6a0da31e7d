// src/packages/memory.rs

//! In-memory dependency graph

use super::traits::{DependencyProvider, DependencySlot, LookupError, Package};
use std::collections::HashMap;

/// Dependency graph held in a name-keyed table
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    packages: HashMap<String, Vec<DependencySlot>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package, replacing any previous entry with the same name
    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.name, package.depends);
    }

    /// Register `name` with slots given as alternative lists
    pub fn add(&mut self, name: &str, slots: &[&[&str]]) -> &mut Self {
        let depends = slots
            .iter()
            .map(|alts| DependencySlot::new(alts.iter().copied()))
            .collect();
        self.packages.insert(name.to_string(), depends);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<Package> for MemoryProvider {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut provider = Self::new();
        for package in iter {
            provider.insert(package);
        }
        provider
    }
}

impl DependencyProvider for MemoryProvider {
    fn lookup(&self, name: &str) -> Result<Vec<DependencySlot>, LookupError> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}
