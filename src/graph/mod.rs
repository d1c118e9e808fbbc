//! Class reference graph
//!
//! Nodes are classes, edges are references found in class files. Classes that
//! are only referenced (platform classes, classes outside the scanned
//! artifacts) are leaf nodes.

mod class;
pub mod reference;
mod index;
mod builder;
mod parallel_builder;

pub use class::{ArtifactId, ClassName};
pub use reference::{ClassReference, ReferenceKind};
pub use index::{ClassIndex, DuplicateClassPolicy, IndexError};
pub use builder::{ClassGraphBuilder, GraphError};
pub use parallel_builder::ParallelClassGraphBuilder;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Directed graph of class references
#[derive(Debug, Default)]
pub struct ClassGraph {
    /// The underlying directed graph
    /// Nodes are ClassNames, edges are reference kinds
    inner: DiGraph<ClassName, ReferenceKind>,

    /// Map from ClassName to node index
    node_map: HashMap<ClassName, NodeIndex>,

    /// Classes whose own class file was read
    defined: HashSet<ClassName>,
}

impl ClassGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, class: &ClassName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(class) {
            return idx;
        }
        let idx = self.inner.add_node(class.clone());
        self.node_map.insert(class.clone(), idx);
        idx
    }

    /// Add a class and its outgoing references.
    ///
    /// The first definition of a class wins; later ones are ignored.
    pub fn add_class(&mut self, class: ClassName, references: impl IntoIterator<Item = ClassReference>) {
        if self.defined.contains(&class) {
            debug!("Ignoring second definition of {}", class);
            return;
        }
        let from = self.ensure_node(&class);
        for reference in references {
            if reference.target == class {
                continue;
            }
            let to = self.ensure_node(&reference.target);
            self.inner.add_edge(from, to, reference.kind);
        }
        self.defined.insert(class);
    }

    /// Outgoing references of a class, empty for leaf or unknown classes
    pub fn references_from(&self, class: &ClassName) -> Vec<(&ClassName, ReferenceKind)> {
        let Some(&node_idx) = self.node_map.get(class) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .filter_map(|edge| {
                let target = self.inner.node_weight(edge.target())?;
                Some((target, *edge.weight()))
            })
            .collect()
    }

    /// Distinct classes referenced by a class, of any kind
    pub fn referenced_classes(&self, class: &ClassName) -> BTreeSet<&ClassName> {
        self.references_from(class)
            .into_iter()
            .map(|(target, _)| target)
            .collect()
    }

    /// Incoming references of a class
    pub fn references_to(&self, class: &ClassName) -> Vec<(&ClassName, ReferenceKind)> {
        let Some(&node_idx) = self.node_map.get(class) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Incoming)
            .filter_map(|edge| {
                let source = self.inner.node_weight(edge.source())?;
                Some((source, *edge.weight()))
            })
            .collect()
    }

    /// Whether the class file of this class was read
    pub fn is_defined(&self, class: &ClassName) -> bool {
        self.defined.contains(class)
    }

    pub fn contains(&self, class: &ClassName) -> bool {
        self.node_map.contains_key(class)
    }

    /// Number of nodes, including referenced-only classes
    pub fn class_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of classes whose class file was read
    pub fn defined_count(&self) -> usize {
        self.defined.len()
    }

    /// Number of reference edges
    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Get the underlying petgraph for advanced operations
    pub fn inner(&self) -> &DiGraph<ClassName, ReferenceKind> {
        &self.inner
    }

    /// Get node index for a class
    pub fn node_index(&self, class: &ClassName) -> Option<NodeIndex> {
        self.node_map.get(class).copied()
    }
}
