use crate::DependencyGraph;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// A set of resolved package names, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    packages: BTreeSet<String>,
}

impl Resolution {
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    /// Set union, consuming both sides.
    pub fn union(mut self, other: Resolution) -> Resolution {
        if self.packages.len() < other.packages.len() {
            return other.union(self);
        }
        self.packages.extend(other.packages);
        self
    }
}

impl<S: Into<String>> FromIterator<S> for Resolution {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for Resolution {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

/// Every package reachable from `start`, including `start` itself.
///
/// Breadth-first; a node is enqueued at most once, so cycles terminate.
/// Names that aren't nodes of the graph contribute no edges.
pub fn closure(graph: &DependencyGraph, start: &str) -> Resolution {
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut queue: VecDeque<&str> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let Some(deps) = graph.dependencies(current) else {
            continue;
        };
        for dep in deps {
            if visited.insert(dep.as_str()) {
                queue.push_back(dep.as_str());
            }
        }
    }

    debug!(seed = start, packages = visited.len(), "resolved closure");
    visited.into_iter().collect()
}

/// Union of the closures of all `seeds`. No seeds, empty resolution.
///
/// Empty names are not packages and are skipped. Seeds are resolved in
/// parallel; the graph is only read.
pub fn resolve<S: AsRef<str> + Sync>(graph: &DependencyGraph, seeds: &[S]) -> Resolution {
    seeds
        .par_iter()
        .map(|seed| seed.as_ref())
        .filter(|seed: &&str| !seed.is_empty())
        .map(|seed| closure(graph, seed))
        .reduce(Resolution::default, Resolution::union)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> DependencyGraph {
        [("A", vec!["B"]), ("B", vec!["C"]), ("C", vec![])]
            .into_iter()
            .collect()
    }

    fn names(resolution: &Resolution) -> Vec<&str> {
        resolution.iter().collect()
    }

    #[test]
    fn test_chain_from_root() {
        assert_eq!(names(&closure(&chain(), "A")), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_chain_from_leaf() {
        assert_eq!(names(&closure(&chain(), "C")), vec!["C"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let graph: DependencyGraph = [("A", vec!["B"]), ("B", vec!["A"])].into_iter().collect();
        assert_eq!(names(&closure(&graph, "A")), vec!["A", "B"]);
    }

    #[test]
    fn test_self_loop() {
        let graph: DependencyGraph = [("A", vec!["A"])].into_iter().collect();
        assert_eq!(names(&closure(&graph, "A")), vec!["A"]);
    }

    #[test]
    fn test_unknown_seed() {
        assert_eq!(names(&closure(&chain(), "Z")), vec!["Z"]);
    }

    #[test]
    fn test_unknown_dependency_is_leaf() {
        let graph: DependencyGraph = [("A", vec!["R", "B"]), ("B", vec![])].into_iter().collect();
        assert_eq!(names(&closure(&graph, "A")), vec!["A", "B", "R"]);
    }

    #[test]
    fn test_diamond() {
        let graph: DependencyGraph = [
            ("A", vec!["B", "C"]),
            ("B", vec!["D"]),
            ("C", vec!["D"]),
            ("D", vec![]),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&closure(&graph, "A")), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_resolve_unions_seeds() {
        let graph: DependencyGraph = [
            ("A", vec!["B"]),
            ("B", vec![]),
            ("X", vec!["Y"]),
            ("Y", vec![]),
        ]
        .into_iter()
        .collect();
        let resolution = resolve(&graph, &["A", "X"]);
        assert_eq!(names(&resolution), vec!["A", "B", "X", "Y"]);
        assert_eq!(resolution.len(), 4);
    }

    #[test]
    fn test_resolve_overlapping_seeds() {
        let resolution = resolve(&chain(), &["A", "B"]);
        assert_eq!(names(&resolution), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_resolve_skips_empty_seeds() {
        let resolution = resolve(&chain(), &["", "B"]);
        assert_eq!(names(&resolution), vec!["B", "C"]);
        assert!(!resolution.contains(""));
        assert!(resolve(&chain(), &[""]).is_empty());
    }

    #[test]
    fn test_resolve_no_seeds() {
        let seeds: [&str; 0] = [];
        assert!(resolve(&chain(), &seeds).is_empty());
    }

    #[test]
    fn test_end_to_end() {
        let index = rdeps_index::load(
            "Package: A\nVersion: 1.0\nDepends: B (>= 2.0)\n\nPackage: B\nVersion: 2.0\n",
        )
        .unwrap();
        let graph = DependencyGraph::from_index(&index);
        let resolution = resolve(&graph, &["A"]);
        assert_eq!(names(&resolution), vec!["A", "B"]);
        assert_eq!(resolution.len(), 2);
        assert!(resolution.contains("B"));
        assert!(!resolution.contains("R"));
    }
}
