// src/packages/deb.rs

//! Dependency graph backed by the dpkg status database
//!
//! The status file (`/var/lib/dpkg/status`) is a sequence of RFC 822-like
//! stanzas, one per package known to dpkg. Only packages whose status is
//! `installed` take part in the graph, and dependency alternatives that are
//! not installed are dropped, so every slot names packages actually present.

use super::traits::{DependencyProvider, DependencySlot, LookupError};
use super::PackageList;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the dpkg status database
pub const DEFAULT_STATUS_PATH: &str = "/var/lib/dpkg/status";

/// Dpkg status stanza, restricted to the fields the graph needs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatusEntry {
    package: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "Pre-Depends", default)]
    pre_depends: Option<String>,
    #[serde(default)]
    depends: Option<String>,
}

impl StatusEntry {
    /// `Status: install ok installed` -> the last word is the current state
    fn is_installed(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|s| s.split_whitespace().last())
            .is_some_and(|state| state == "installed")
    }
}

/// Installed-package dependency graph read from dpkg
#[derive(Debug, Clone, Default)]
pub struct DpkgStatusProvider {
    packages: HashMap<String, Vec<DependencySlot>>,
}

impl DpkgStatusProvider {
    /// Load the status database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading dpkg status database from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let provider = Self::parse(&content)?;
        info!(
            "Loaded {} installed packages from {}",
            provider.packages.len(),
            path.display()
        );
        Ok(provider)
    }

    /// Build the graph from status file content
    pub fn parse(content: &str) -> Result<Self> {
        let entries: Vec<StatusEntry> = rfc822_like::from_str(content)
            .map_err(|e| Error::Parse(format!("Failed to parse dpkg status: {}", e)))?;

        debug!("Parsed {} status entries", entries.len());

        let installed: Vec<StatusEntry> = entries.into_iter().filter(|e| e.is_installed()).collect();

        // Multi-arch packages can appear once per architecture
        let mut raw: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for entry in &installed {
            if raw.contains_key(&entry.package) {
                debug!("Ignoring duplicate status entry for {}", entry.package);
                continue;
            }
            let mut slots = Vec::new();
            for field in [&entry.pre_depends, &entry.depends].into_iter().flatten() {
                slots.extend(parse_depends(field));
            }
            raw.insert(entry.package.clone(), slots);
        }

        let packages = raw
            .iter()
            .map(|(name, slots)| {
                let slots = slots
                    .iter()
                    .map(|alts| {
                        DependencySlot::new(
                            alts.iter().filter(|alt| raw.contains_key(alt.as_str())).cloned(),
                        )
                    })
                    .filter(|slot| !slot.is_empty())
                    .collect();
                (name.clone(), slots)
            })
            .collect();

        Ok(Self { packages })
    }

    /// Names of all installed packages, sorted
    pub fn installed_packages(&self) -> PackageList {
        let mut names: PackageList = self.packages.keys().cloned().collect();
        names.sort();
        names
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

impl DependencyProvider for DpkgStatusProvider {
    fn lookup(&self, name: &str) -> std::result::Result<Vec<DependencySlot>, LookupError> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// Parse a Depends-style field into alternative lists
/// Format: "libc6 (>= 2.34), perl:any, default-mta | mail-transport-agent"
fn parse_depends(field: &str) -> Vec<Vec<String>> {
    field
        .split(',')
        .map(|group| {
            group
                .split('|')
                .filter_map(parse_dependency_name)
                .collect::<Vec<_>>()
        })
        .filter(|alts| !alts.is_empty())
        .collect()
}

/// Strip version constraint, architecture restriction, build profiles and
/// arch qualifier from a single alternative
/// Format: "package:any (>= 1.0) [amd64] <!nocheck>"
fn parse_dependency_name(dep: &str) -> Option<String> {
    let end = dep.find(['(', '[', '<']).unwrap_or(dep.len());
    let name = dep[..end].trim();
    let name = name.split(':').next().unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "\
Package: vim
Status: install ok installed
Priority: optional
Version: 2:9.1.0016-1ubuntu7
Depends: vim-common (= 2:9.1.0016-1ubuntu7), vim-runtime | vim-tiny, libc6 (>= 2.34)

Package: vim-common
Status: install ok installed
Version: 2:9.1.0016-1ubuntu7

Package: vim-runtime
Status: deinstall ok config-files
Version: 2:9.1.0016-1ubuntu7

Package: vim-tiny
Status: install ok installed
Depends: vim-common

Package: libc6
Status: install ok installed
Pre-Depends: libgcc-s1:amd64

Package: libgcc-s1
Status: install ok installed
";

    #[test]
    fn test_parse_dependency_name() {
        assert_eq!(parse_dependency_name(" libc6 (>= 2.34) "), Some("libc6".to_string()));
        assert_eq!(parse_dependency_name("perl:any"), Some("perl".to_string()));
        assert_eq!(
            parse_dependency_name("debhelper [amd64] <!nocheck>"),
            Some("debhelper".to_string())
        );
        assert_eq!(parse_dependency_name("  "), None);
    }

    #[test]
    fn test_parse_depends_keeps_slot_structure() {
        let slots = parse_depends("a (>= 1), b | c:any, d");
        assert_eq!(
            slots,
            vec![
                vec!["a".to_string()],
                vec!["b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ]
        );
    }

    #[test]
    fn test_only_installed_packages_are_known() {
        let provider = DpkgStatusProvider::parse(STATUS).unwrap();
        assert_eq!(provider.len(), 5);
        assert!(!provider.contains("vim-runtime"));
        assert_eq!(
            provider.installed_packages(),
            vec!["libc6", "libgcc-s1", "vim", "vim-common", "vim-tiny"]
        );
        assert_eq!(
            provider.lookup("vim-runtime"),
            Err(LookupError::NotFound("vim-runtime".to_string()))
        );
    }

    #[test]
    fn test_uninstalled_alternatives_are_dropped() {
        let provider = DpkgStatusProvider::parse(STATUS).unwrap();
        let slots = provider.lookup("vim").unwrap();
        assert_eq!(
            slots,
            vec![
                DependencySlot::single("vim-common"),
                DependencySlot::single("vim-tiny"),
                DependencySlot::single("libc6"),
            ]
        );
    }

    #[test]
    fn test_pre_depends_are_included() {
        let provider = DpkgStatusProvider::parse(STATUS).unwrap();
        assert_eq!(
            provider.lookup("libc6").unwrap(),
            vec![DependencySlot::single("libgcc-s1")]
        );
        assert!(provider.lookup("libgcc-s1").unwrap().is_empty());
    }
}
