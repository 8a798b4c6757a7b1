//! Core tree trait for scenario hierarchies

use log::warn;
use std::collections::HashSet;

use crate::NodeId;

/// A rooted hierarchy addressed by string ids
///
/// Implementations provide the basic lookups; the provided methods walk
/// parent links. Tree documents come from outside the program, so every
/// walk is bounded by `node_count` and stops at the first id it has already
/// seen or cannot resolve.
pub trait Tree {
    /// Node payload type
    type Node;

    /// Get the root node ID
    fn root(&self) -> &NodeId;

    /// Get a node by its ID
    ///
    /// Returns `None` if the ID is unknown.
    fn get(&self, id: &str) -> Option<&Self::Node>;

    /// Get the parent of a node
    ///
    /// Returns `None` for the root, for orphans and for unknown IDs.
    fn parent(&self, id: &str) -> Option<&NodeId>;

    /// Iterate over the child IDs of a node, in document order
    ///
    /// Returns an empty iterator for leaves or unknown IDs.
    fn children(&self, id: &str) -> Box<dyn Iterator<Item = &NodeId> + '_>;

    /// Count total nodes in the tree
    fn node_count(&self) -> usize;

    /// Check whether an ID resolves
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Get the ids from just below the root down to `target`, inclusive
    ///
    /// The root itself is never part of the result. A missing or dangling
    /// parent reference counts as reaching the root. Unknown targets give an
    /// empty path, so every returned id resolves.
    fn path_from_root(&self, target: &str) -> Vec<NodeId> {
        let mut path = Vec::new();
        if !self.contains(target) {
            return path;
        }

        let mut seen = HashSet::new();
        let mut current = NodeId::from(target);

        for _ in 0..self.node_count() {
            if &current == self.root() {
                break;
            }
            if !seen.insert(current.clone()) {
                warn!("Parent cycle through {current} while walking to the root");
                break;
            }

            let parent = self.parent(&current).cloned();
            path.push(current);

            match parent {
                Some(parent) if self.contains(&parent) => current = parent,
                _ => break,
            }
        }

        path.reverse();
        path
    }

    /// Get all ancestors of a node, from parent up to the root
    ///
    /// Returns an empty vector for the root or unknown IDs.
    fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);

        while let Some(parent_id) = current {
            if ancestors.contains(parent_id) || ancestors.len() >= self.node_count() {
                break;
            }
            ancestors.push(parent_id.clone());
            current = self.parent(parent_id);
        }
        ancestors
    }

    /// Get the number of parent links between a node and the root
    ///
    /// Returns `None` for unknown IDs.
    fn depth_of(&self, id: &str) -> Option<usize> {
        self.contains(id).then(|| self.ancestors(id).len())
    }

    /// Check if a node is an ancestor of another
    fn is_ancestor_of(&self, ancestor: &str, descendant: &str) -> bool {
        self.ancestors(descendant)
            .iter()
            .any(|id| id.as_str() == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Bare parent-pointer tree, with room for broken links
    struct LinkTree {
        root: NodeId,
        parents: HashMap<NodeId, Option<NodeId>>,
    }

    impl LinkTree {
        fn new(links: &[(&str, Option<&str>)]) -> Self {
            Self {
                root: NodeId::from(links[0].0),
                parents: links
                    .iter()
                    .map(|(id, parent)| (NodeId::from(*id), parent.map(NodeId::from)))
                    .collect(),
            }
        }
    }

    impl Tree for LinkTree {
        type Node = Option<NodeId>;

        fn root(&self) -> &NodeId {
            &self.root
        }

        fn get(&self, id: &str) -> Option<&Option<NodeId>> {
            self.parents.get(id)
        }

        fn parent(&self, id: &str) -> Option<&NodeId> {
            self.parents.get(id).and_then(|p| p.as_ref())
        }

        fn children(&self, _id: &str) -> Box<dyn Iterator<Item = &NodeId> + '_> {
            Box::new(std::iter::empty())
        }

        fn node_count(&self) -> usize {
            self.parents.len()
        }
    }

    #[test]
    fn test_path_from_root() {
        let tree = LinkTree::new(&[("root", None), ("a", Some("root")), ("a1", Some("a"))]);

        assert_eq!(
            tree.path_from_root("a1"),
            vec![NodeId::from("a"), NodeId::from("a1")]
        );
        assert!(tree.path_from_root("root").is_empty());
        assert!(tree.path_from_root("missing").is_empty());
    }

    #[test]
    fn test_path_from_root_dangling_parent() {
        let tree = LinkTree::new(&[("root", None), ("x", Some("ghost")), ("y", Some("x"))]);

        assert_eq!(
            tree.path_from_root("y"),
            vec![NodeId::from("x"), NodeId::from("y")]
        );
    }

    #[test]
    fn test_path_from_root_terminates_on_cycle() {
        let tree = LinkTree::new(&[("root", None), ("p", Some("q")), ("q", Some("p"))]);

        let path = tree.path_from_root("p");
        assert_eq!(path.len(), 2);
        assert!(tree.ancestors("p").len() <= tree.node_count());
    }

    #[test]
    fn test_depth_and_ancestry() {
        let tree = LinkTree::new(&[("root", None), ("a", Some("root")), ("a1", Some("a"))]);

        assert_eq!(tree.depth_of("root"), Some(0));
        assert_eq!(tree.depth_of("a1"), Some(2));
        assert_eq!(tree.depth_of("nope"), None);
        assert!(tree.is_ancestor_of("root", "a1"));
        assert!(!tree.is_ancestor_of("a1", "a"));
    }
}
