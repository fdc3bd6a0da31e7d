// src/packages/traits.rs

//! Dependency graph lookup interface

use thiserror::Error;

/// One requirement of a package, satisfied by any one of its alternatives
/// (`a | b` in Debian control syntax)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencySlot {
    pub alternatives: Vec<String>,
}

impl DependencySlot {
    /// Create a slot from its alternatives, in preference order
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    /// A slot with exactly one acceptable package
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            alternatives: vec![name.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

/// A package together with its direct installed dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub depends: Vec<DependencySlot>,
}

/// Failure to look a package up in a dependency graph.
///
/// Always recoverable: the walker treats the package as a leaf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("package not found: {0}")]
    NotFound(String),
}

/// Source of direct dependency information for packages
pub trait DependencyProvider {
    /// Return the dependency slots of `name`, in declaration order
    fn lookup(&self, name: &str) -> Result<Vec<DependencySlot>, LookupError>;
}

impl<P: DependencyProvider + ?Sized> DependencyProvider for &P {
    fn lookup(&self, name: &str) -> Result<Vec<DependencySlot>, LookupError> {
        (**self).lookup(name)
    }
}

impl<P: DependencyProvider + ?Sized> DependencyProvider for Box<P> {
    fn lookup(&self, name: &str) -> Result<Vec<DependencySlot>, LookupError> {
        (**self).lookup(name)
    }
}
