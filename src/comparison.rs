// src/comparison.rs

//! Package set comparison record

use crate::packages::{self, DependencyProvider, PackageList, PackageName};
use crate::resolver;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// One of the five package lists held by a [`Comparison`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Minimal,
    AlsoInstalled,
    Uninstalled,
    Manifest,
    Installed,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Manifest,
        Category::Installed,
        Category::Minimal,
        Category::AlsoInstalled,
        Category::Uninstalled,
    ];

    /// Stem used for the category's output files
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Minimal => "minimal",
            Category::AlsoInstalled => "also_installed",
            Category::Uninstalled => "uninstalled",
            Category::Manifest => "manifest",
            Category::Installed => "installed",
        }
    }

    /// Short tag used when printing the report
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Minimal => "min",
            Category::AlsoInstalled => "als",
            Category::Uninstalled => "uni",
            Category::Manifest => "manifest",
            Category::Installed => "installed",
        }
    }

    /// Directive applied to every package of this category
    pub fn action(&self) -> Action {
        match self {
            Category::Uninstalled => Action::Remove,
            _ => Action::Install,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Category::Minimal),
            "also_installed" | "also-installed" => Ok(Category::AlsoInstalled),
            "uninstalled" => Ok(Category::Uninstalled),
            "manifest" => Ok(Category::Manifest),
            "installed" => Ok(Category::Installed),
            _ => Err(format!("Unknown package category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Install => f.write_str("install"),
            Action::Remove => f.write_str("remove"),
        }
    }
}

/// An installer instruction for a single package, displayed as
/// `install <name>` or `remove <name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub action: Action,
    pub package: PackageName,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.package)
    }
}

/// Result of comparing a manifest with the installed package set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    minimal: PackageList,
    also_installed: PackageList,
    uninstalled: PackageList,
    manifest: PackageList,
    installed: PackageList,
}

impl Comparison {
    pub fn new(
        minimal: PackageList,
        also_installed: PackageList,
        uninstalled: PackageList,
        manifest: PackageList,
        installed: PackageList,
    ) -> Self {
        Self {
            minimal,
            also_installed,
            uninstalled,
            manifest,
            installed,
        }
    }

    /// Installed packages nothing else in the walk depends on
    pub fn minimal(&self) -> &[PackageName] {
        &self.minimal
    }

    /// Installed packages missing from the manifest
    pub fn also_installed(&self) -> &[PackageName] {
        &self.also_installed
    }

    /// Manifest packages that are not installed
    pub fn uninstalled(&self) -> &[PackageName] {
        &self.uninstalled
    }

    pub fn manifest(&self) -> &[PackageName] {
        &self.manifest
    }

    pub fn installed(&self) -> &[PackageName] {
        &self.installed
    }

    pub fn get(&self, category: Category) -> &[PackageName] {
        match category {
            Category::Minimal => &self.minimal,
            Category::AlsoInstalled => &self.also_installed,
            Category::Uninstalled => &self.uninstalled,
            Category::Manifest => &self.manifest,
            Category::Installed => &self.installed,
        }
    }

    /// Report lines for the minimal, also-installed and uninstalled lists
    pub fn render(&self) -> Vec<String> {
        [Category::Minimal, Category::AlsoInstalled, Category::Uninstalled]
            .into_iter()
            .flat_map(|category| {
                self.get(category)
                    .iter()
                    .map(move |name| format!("{}: {}", category.tag(), name))
            })
            .collect()
    }

    /// Installer directives for every package of `category`
    pub fn install_plan(&self, category: Category) -> Vec<Directive> {
        let action = category.action();
        self.get(category)
            .iter()
            .map(|name| Directive {
                action,
                package: name.clone(),
            })
            .collect()
    }
}

/// Compare `manifest` against `installed`, using `provider` to reduce the
/// extra installed packages to a minimal set
pub fn compare<P: DependencyProvider + ?Sized>(
    manifest: PackageList,
    installed: PackageList,
    provider: &P,
) -> Comparison {
    let uninstalled = packages::diff(&manifest, &installed);
    let also_installed = packages::diff(&installed, &manifest);

    let index = resolver::walk(&also_installed, provider);
    let minimal = resolver::reduce(&also_installed, &index);

    info!(
        "Compared {} manifest and {} installed packages: {} uninstalled, {} also installed, {} minimal",
        manifest.len(),
        installed.len(),
        uninstalled.len(),
        also_installed.len(),
        minimal.len()
    );

    Comparison::new(minimal, also_installed, uninstalled, manifest, installed)
}
