//! Component dependency graph
//!
//! Nodes are registry keys; edges point from a component to each of its
//! declared dependencies. Edges to names that are not registry keys are
//! dead ends and never become nodes.

use super::types::Registry;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    InProgress,
    /// Fully explored
    Done,
}

/// Borrowed adjacency view over a [`Registry`]
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    edges: IndexMap<&'a str, &'a [String]>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        let edges = registry
            .components
            .iter()
            .map(|(name, c)| (name.as_str(), c.metadata.dependencies.as_slice()))
            .collect();
        Self { edges }
    }

    /// Resolve a name to its node, if it is a registry key
    fn node(&self, name: &str) -> Option<&'a str> {
        self.edges.get_key_value(name).map(|(key, _)| *key)
    }

    /// Declared dependencies of `node` that exist in the graph
    fn neighbours(&self, node: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.edges
            .get(node)
            .copied()
            .unwrap_or_default()
            .iter()
            .filter_map(move |dep| self.node(dep))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Every node reachable from `root`, in depth-first discovery order.
    /// `root` itself is never included, even when a cycle leads back to it.
    pub fn transitive_dependencies(&self, root: &str) -> Vec<&'a str> {
        let mut order = Vec::new();
        if let Some(root) = self.node(root) {
            let mut visited = HashSet::from([root]);
            self.collect(root, &mut visited, &mut order);
        }
        order
    }

    fn collect(&self, node: &'a str, visited: &mut HashSet<&'a str>, order: &mut Vec<&'a str>) {
        for dep in self.neighbours(node) {
            if visited.insert(dep) {
                order.push(dep);
                self.collect(dep, visited, order);
            }
        }
    }

    /// True if a DFS from `root` reaches a node still on its own path
    pub fn has_cycle_from(&self, root: &str) -> bool {
        match self.node(root) {
            Some(root) => self.finds_back_edge(root, &mut HashMap::new()),
            None => false,
        }
    }

    fn finds_back_edge(&self, node: &'a str, marks: &mut HashMap<&'a str, Mark>) -> bool {
        marks.insert(node, Mark::InProgress);
        for dep in self.neighbours(node) {
            match marks.get(dep) {
                Some(Mark::InProgress) => return true,
                Some(Mark::Done) => {}
                None => {
                    if self.finds_back_edge(dep, marks) {
                        return true;
                    }
                }
            }
        }
        marks.insert(node, Mark::Done);
        false
    }

    /// Nodes that list `name` as a direct dependency, in registry order
    pub fn dependents(&self, name: &str) -> Vec<&'a str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == name))
            .map(|(node, _)| *node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::{ComponentMetadata, PrimaryFile, RegistryComponent};

    fn registry(edges: &[(&str, &[&str])]) -> Registry {
        let mut registry = Registry::default();
        for (name, deps) in edges {
            registry.components.insert(
                name.to_string(),
                RegistryComponent {
                    metadata: ComponentMetadata {
                        name: name.to_string(),
                        description: format!("{} component", name),
                        dependencies: deps.iter().map(|d| d.to_string()).collect(),
                        files: vec![],
                        npm_dependencies: vec![],
                    },
                    component: PrimaryFile {
                        path: format!("components/ui/{}.tsx", name),
                        content: "export {}".to_string(),
                    },
                    utils: vec![],
                    types: vec![],
                    examples: vec![],
                },
            );
        }
        registry
    }

    #[test]
    fn test_discovery_order_is_depth_first() {
        let r = registry(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &[]), ("d", &[])]);
        let graph = DependencyGraph::new(&r);
        assert_eq!(graph.transitive_dependencies("a"), vec!["b", "d", "c"]);
    }

    #[test]
    fn test_diamond_visits_shared_node_once() {
        let r = registry(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        let graph = DependencyGraph::new(&r);
        assert_eq!(graph.transitive_dependencies("a"), vec!["b", "d", "c"]);
        // Reaching a finished node twice is not a cycle
        assert!(!graph.has_cycle_from("a"));
    }

    #[test]
    fn test_missing_dependency_is_dead_end() {
        let r = registry(&[("a", &["ghost", "b"]), ("b", &[])]);
        let graph = DependencyGraph::new(&r);
        assert_eq!(graph.transitive_dependencies("a"), vec!["b"]);
        assert!(!graph.has_cycle_from("a"));
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let r = registry(&[("a", &["a"])]);
        let graph = DependencyGraph::new(&r);
        assert!(graph.transitive_dependencies("a").is_empty());
        assert!(graph.has_cycle_from("a"));
    }

    #[test]
    fn test_cycle_further_down_is_detected() {
        let r = registry(&[("a", &["b"]), ("b", &["c"]), ("c", &["b"])]);
        let graph = DependencyGraph::new(&r);
        assert!(graph.has_cycle_from("a"));
        assert_eq!(graph.transitive_dependencies("a"), vec!["b", "c"]);
    }

    #[test]
    fn test_unknown_root() {
        let r = registry(&[("a", &[])]);
        let graph = DependencyGraph::new(&r);
        assert!(graph.transitive_dependencies("zzz").is_empty());
        assert!(!graph.has_cycle_from("zzz"));
        assert!(!graph.contains("zzz"));
    }

    #[test]
    fn test_dependents_are_direct_only() {
        let r = registry(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let graph = DependencyGraph::new(&r);
        assert_eq!(graph.dependents("c"), vec!["b"]);
        assert!(graph.dependents("a").is_empty());
    }
}
