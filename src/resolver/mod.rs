// src/resolver/mod.rs

//! Minimal install set resolution
//!
//! Starting from the packages that are installed but absent from the
//! manifest, [`walk`] performs a depth-first reachability walk over the
//! dependency graph and records, for every dependency it encounters, which
//! package required it. [`reduce`] then keeps only the roots that nothing
//! walked depends on.
//!
//! This is a closure heuristic, not a minimum set cover: a package that is
//! redundant only through a combination of others is kept.

mod index;

pub use index::DependsOnIndex;

use crate::packages::{DependencyProvider, LookupError, PackageList, PackageName};
use std::collections::HashSet;
use tracing::debug;

/// A package being expanded: its flattened dependency alternatives and how
/// far through them the walk has progressed
struct Frame {
    package: usize,
    deps: Vec<usize>,
    cursor: usize,
}

/// Depth-first closure walker over a dependency provider
pub struct Walker<'a, P: DependencyProvider + ?Sized> {
    provider: &'a P,
    index: DependsOnIndex,
    visited: HashSet<usize>,
    stack: Vec<Frame>,
    missing: usize,
}

impl<'a, P: DependencyProvider + ?Sized> Walker<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            index: DependsOnIndex::default(),
            visited: HashSet::new(),
            stack: Vec::new(),
            missing: 0,
        }
    }

    /// Walk everything reachable from `root`.
    ///
    /// A root already reached from an earlier root is not expanded again.
    pub fn visit(&mut self, root: &str) {
        let id = self.index.intern(root);
        if !self.visited.insert(id) {
            debug!("Skipping already visited root: {}", root);
            return;
        }
        self.expand(id);

        // Each dependency is recorded against the package currently being
        // expanded and, if new, fully expanded before the next sibling.
        while let Some(frame) = self.stack.last_mut() {
            let Some(&dep) = frame.deps.get(frame.cursor) else {
                self.stack.pop();
                continue;
            };
            frame.cursor += 1;
            let parent = frame.package;

            self.index.record(dep, parent);
            if self.visited.insert(dep) {
                self.expand(dep);
            }
        }
    }

    /// Look `id` up and push its frame; unknown packages are leaves
    fn expand(&mut self, id: usize) {
        let slots = match self.provider.lookup(self.index.name(id)) {
            Ok(slots) => slots,
            Err(LookupError::NotFound(name)) => {
                debug!("No dependency information for {}, treating as leaf", name);
                self.missing += 1;
                return;
            }
        };

        let deps = slots
            .iter()
            .flat_map(|slot| slot.alternatives.iter())
            .map(|alt| self.index.intern(alt))
            .collect();

        self.stack.push(Frame {
            package: id,
            deps,
            cursor: 0,
        });
    }

    /// Finish the walk and return the reverse dependency index
    pub fn finish(self) -> DependsOnIndex {
        debug!(
            "Closure walk visited {} of {} packages seen ({} without dependency information), {} dependency targets",
            self.visited.len(),
            self.index.interned(),
            self.missing,
            self.index.len()
        );
        self.index
    }
}

/// Walk the dependency closure of `roots`, in list order
pub fn walk<P: DependencyProvider + ?Sized>(roots: &[PackageName], provider: &P) -> DependsOnIndex {
    let mut walker = Walker::new(provider);
    for root in roots {
        walker.visit(root);
    }
    walker.finish()
}

/// Members of `also_installed` that nothing walked depends on, in order
pub fn reduce(also_installed: &[PackageName], index: &DependsOnIndex) -> PackageList {
    also_installed
        .iter()
        .filter(|name| !index.contains(name))
        .cloned()
        .collect()
}
