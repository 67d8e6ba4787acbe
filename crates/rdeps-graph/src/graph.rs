use rdeps_index::Index;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Record fields whose values list required packages.
pub const DEPENDENCY_FIELDS: [&str; 2] = ["Depends", "Imports"];

/// Bare package names from a comma-separated dependency list.
///
/// Only the first word of each entry is kept, so any leftover version or
/// operator text is dropped: `"pkgA (>= 1.0), pkgB"` yields `pkgA`, `pkgB`.
pub fn dependency_names(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
}

/// Directed graph: package → set of directly required package names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph in a single pass over the index.
    ///
    /// Every record becomes a node, including records with no dependency
    /// fields at all.
    pub fn from_index(index: &Index) -> Self {
        let mut graph = Self::default();

        for record in index {
            graph.add_node(record.name());
            for field in DEPENDENCY_FIELDS {
                let Some(value) = record.get(field) else {
                    continue;
                };
                for dep in dependency_names(value) {
                    graph.add_edge(record.name(), dep);
                }
            }
        }

        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        graph
    }

    /// Ensure a node exists.
    pub fn add_node(&mut self, name: &str) {
        if !self.edges.contains_key(name) {
            self.edges.insert(name.to_string(), BTreeSet::new());
        }
    }

    /// Add `from → to`, creating `from` if needed. `to` is not added as a
    /// node.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    /// Direct dependencies of `name`, or `None` if it isn't a node.
    pub fn dependencies(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Node names in order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<(S, Vec<S>)> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (S, Vec<S>)>>(iter: I) -> Self {
        let mut graph = Self::default();
        for (node, deps) in iter {
            graph.add_node(node.as_ref());
            for dep in deps {
                graph.add_edge(node.as_ref(), dep.as_ref());
            }
        }
        graph
    }
}
