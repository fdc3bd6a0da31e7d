// src/packages/mod.rs

//! Package lists and dependency graph providers

pub mod deb;
pub mod memory;
pub mod traits;

pub use deb::DpkgStatusProvider;
pub use memory::MemoryProvider;
pub use traits::{DependencyProvider, DependencySlot, LookupError, Package};

use std::collections::HashSet;

/// Case-sensitive package identifier
pub type PackageName = String;

/// Ordered package names, in the order of their source
pub type PackageList = Vec<PackageName>;

/// Elements of `a` that do not appear in `b`, in `a`'s order.
///
/// Duplicates in `a` are kept.
pub fn diff(a: &[PackageName], b: &[PackageName]) -> PackageList {
    let exclude: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.iter()
        .filter(|name| !exclude.contains(name.as_str()))
        .cloned()
        .collect()
}
