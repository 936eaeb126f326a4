//! Root-to-node path resolution.
//!
//! A tree has exactly one path between two connected nodes, so a single
//! breadth-first walk from the root discovers every path. Nodes the walk
//! never reaches (disconnected subgraphs, cycles, dangling parents) get no
//! path and stay at [`Level::Unassigned`](crate::Level::Unassigned).

use std::collections::{HashMap, VecDeque};

use crate::value::NodeKey;

/// Mapping from node key to its path `[root, .., node]`.
pub type PathMap = HashMap<NodeKey, Vec<NodeKey>>;

/// Resolves root-to-node paths over a parent → children adjacency.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use hierarchy_tree::{NodeKey, PathResolver};
///
/// let mut children: HashMap<NodeKey, Vec<NodeKey>> = HashMap::new();
/// children.insert(NodeKey::from(0), vec![NodeKey::from(1)]);
/// children.insert(NodeKey::from(1), vec![NodeKey::from(12)]);
///
/// let paths = PathResolver::new(&children).resolve(&NodeKey::from(0));
/// assert_eq!(
///     paths[&NodeKey::from(12)],
///     vec![NodeKey::from(0), NodeKey::from(1), NodeKey::from(12)]
/// );
/// ```
pub struct PathResolver<'a> {
    children: &'a HashMap<NodeKey, Vec<NodeKey>>,
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver over the given adjacency. Child lists are walked
    /// in order, which keeps the traversal deterministic.
    pub fn new(children: &'a HashMap<NodeKey, Vec<NodeKey>>) -> Self {
        Self { children }
    }

    /// Computes the path of every node reachable from `root`.
    ///
    /// The root itself gets no entry. Each path starts with the root and
    /// ends with the node, so `path.len() - 1` is the node's level.
    pub fn resolve(&self, root: &NodeKey) -> PathMap {
        let mut paths = PathMap::with_capacity(self.children.len());
        let mut queue = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(current) = queue.pop_front() {
            let Some(children) = self.children.get(&current) else {
                continue;
            };

            let base = paths
                .get(&current)
                .cloned()
                .unwrap_or_else(|| vec![root.clone()]);

            for child in children {
                // Reaching the root again or a node twice means a cycle
                if child == root || paths.contains_key(child) {
                    continue;
                }
                let mut path = Vec::with_capacity(base.len() + 1);
                path.extend_from_slice(&base);
                path.push(child.clone());
                paths.insert(child.clone(), path);
                queue.push_back(child.clone());
            }
        }

        paths
    }

    /// Collects every node below `key` in breadth-first order, excluding
    /// `key` itself.
    pub fn descendants(&self, key: &NodeKey) -> Vec<NodeKey> {
        let mut result = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(key.clone());
        queue.push_back(key.clone());

        while let Some(current) = queue.pop_front() {
            if let Some(children) = self.children.get(&current) {
                for child in children {
                    if seen.insert(child.clone()) {
                        result.push(child.clone());
                        queue.push_back(child.clone());
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(i64, i64)]) -> HashMap<NodeKey, Vec<NodeKey>> {
        let mut children: HashMap<NodeKey, Vec<NodeKey>> = HashMap::new();
        for &(child, parent) in edges {
            children
                .entry(NodeKey::Int(parent))
                .or_default()
                .push(NodeKey::Int(child));
        }
        children
    }

    /// Creates a test hierarchy:
    /// ```text
    /// 0 (root)
    ///  |-- 1
    ///  |    |-- 12
    ///  |    |    |-- 120
    ///  |    |    |-- 121
    ///  |    |-- 13
    ///  |-- 2
    /// ```
    fn sample() -> HashMap<NodeKey, Vec<NodeKey>> {
        adjacency(&[(1, 0), (12, 1), (120, 12), (121, 12), (13, 1), (2, 0)])
    }

    #[test]
    fn test_resolve_paths() {
        let children = sample();
        let paths = PathResolver::new(&children).resolve(&NodeKey::Int(0));

        assert_eq!(paths.len(), 6);
        assert_eq!(
            paths[&NodeKey::Int(121)],
            vec![NodeKey::Int(0), NodeKey::Int(1), NodeKey::Int(12), NodeKey::Int(121)]
        );
        assert_eq!(paths[&NodeKey::Int(2)], vec![NodeKey::Int(0), NodeKey::Int(2)]);
        assert!(!paths.contains_key(&NodeKey::Int(0)));
    }

    #[test]
    fn test_disconnected_nodes_get_no_path() {
        // 7 -> 8 hangs off a parent that is never reached
        let children = adjacency(&[(1, 0), (8, 7)]);
        let paths = PathResolver::new(&children).resolve(&NodeKey::Int(0));

        assert!(paths.contains_key(&NodeKey::Int(1)));
        assert!(!paths.contains_key(&NodeKey::Int(8)));
    }

    #[test]
    fn test_cycle_is_not_followed() {
        // 5 and 6 are each other's parent
        let children = adjacency(&[(1, 0), (5, 6), (6, 5)]);
        let paths = PathResolver::new(&children).resolve(&NodeKey::Int(0));

        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_edge_back_to_root_is_ignored() {
        let children = adjacency(&[(1, 0), (0, 1)]);
        let paths = PathResolver::new(&children).resolve(&NodeKey::Int(0));

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[&NodeKey::Int(1)], vec![NodeKey::Int(0), NodeKey::Int(1)]);
    }

    #[test]
    fn test_descendants() {
        let children = sample();
        let resolver = PathResolver::new(&children);

        let below_one = resolver.descendants(&NodeKey::Int(1));
        assert_eq!(
            below_one,
            vec![NodeKey::Int(12), NodeKey::Int(13), NodeKey::Int(120), NodeKey::Int(121)]
        );
        assert!(resolver.descendants(&NodeKey::Int(121)).is_empty());
    }
}
