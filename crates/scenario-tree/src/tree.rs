//! The loaded scenario tree document

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::source::TreeSource;
use crate::{BranchType, NodeId, Tree, TreeError, TreeNode, WorldState};

/// Wire shape of the tree document
///
/// Kept separate from the public types so load can be lenient about
/// optional fields and report data-quality problems with the node id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTreeData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    scenario: String,
    #[serde(default)]
    world_state: WorldState,
    #[serde(default)]
    time_horizon_months: Option<u32>,
    nodes: IndexMap<String, RawTreeNode>,
    #[serde(default)]
    root_node_id: String,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTreeNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    depth: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    world_update: String,
    #[serde(default)]
    timeline_date: String,
    #[serde(default)]
    branch_type: Option<String>,
    #[serde(default)]
    children: Option<Vec<String>>,
    #[serde(default)]
    parent_id: Option<String>,
}

impl RawTreeNode {
    fn into_node(self, key: &str) -> TreeNode {
        let id = match self.id {
            Some(id) if id != key => {
                warn!("Node stored under `{key}` declares id `{id}`; using the mapping key");
                NodeId::from(key)
            }
            _ => NodeId::from(key),
        };

        let branch_type = match self.branch_type.as_deref() {
            Some(raw) => BranchType::parse(raw).unwrap_or_else(|| {
                warn!(
                    "Node {id} has unrecognized branchType {raw:?}; treating it as {}",
                    BranchType::FALLBACK
                );
                BranchType::FALLBACK
            }),
            None => {
                warn!(
                    "Node {id} has no branchType; treating it as {}",
                    BranchType::FALLBACK
                );
                BranchType::FALLBACK
            }
        };

        TreeNode {
            id,
            depth: self.depth,
            title: self.title,
            description: self.description,
            world_update: self.world_update,
            timeline_date: self.timeline_date,
            branch_type,
            children: self
                .children
                .unwrap_or_default()
                .into_iter()
                .map(NodeId::from)
                .collect(),
            parent_id: self.parent_id.filter(|p| !p.is_empty()).map(NodeId::from),
        }
    }
}

/// A precomputed decision tree of future scenarios
///
/// Built once from a [`TreeSource`] and immutable afterwards. Lookups never
/// fail: ids from stale share links or a changed document simply resolve to
/// nothing.
#[derive(Debug, Clone)]
pub struct ScenarioTree {
    id: String,
    scenario: String,
    world_state: WorldState,
    time_horizon_months: Option<u32>,
    nodes: IndexMap<NodeId, TreeNode>,
    root: NodeId,
    metadata: serde_json::Value,
    root_choices: Vec<NodeId>,
}

impl ScenarioTree {
    /// Fetch and parse a tree document
    pub fn load(source: &dyn TreeSource) -> Result<Self, TreeError> {
        let location = source.location();
        info!("Loading tree data from {location}");

        let text = source.fetch()?;
        let tree = Self::from_json(&text)?;

        info!(
            "Tree data loaded: scenario={:?}, nodes={}, root={}, totalNodes={}",
            tree.scenario,
            tree.node_count(),
            tree.root,
            tree.metadata
                .get("totalNodes")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "n/a".to_string()),
        );
        Ok(tree)
    }

    /// Parse a tree document held in memory
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        let raw: RawTreeData = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTreeData) -> Result<Self, TreeError> {
        let root_id = raw.root_node_id.trim();
        if root_id.is_empty() {
            return Err(TreeError::MissingRoot);
        }
        let root = NodeId::from(root_id);

        let nodes: IndexMap<NodeId, TreeNode> = raw
            .nodes
            .into_iter()
            .map(|(key, node)| {
                let node = node.into_node(&key);
                (node.id.clone(), node)
            })
            .collect();

        if !nodes.contains_key(root.as_str()) {
            return Err(TreeError::DanglingRoot(root));
        }

        for node in nodes.values() {
            for child in node.children.iter().filter(|c| !nodes.contains_key(c.as_str())) {
                warn!("Node {} lists unknown child {child}; it will be skipped", node.id);
            }
        }

        let root_choices = Self::compute_root_choices(&nodes, &root);
        debug!(
            "Root choices: [{}]",
            root_choices
                .iter()
                .map(NodeId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            id: raw.id,
            scenario: raw.scenario,
            world_state: raw.world_state,
            time_horizon_months: raw.time_horizon_months,
            nodes,
            root,
            metadata: raw.metadata,
            root_choices,
        })
    }

    /// Depth-0 nodes other than the root, or the root's children if there are none
    fn compute_root_choices(nodes: &IndexMap<NodeId, TreeNode>, root: &NodeId) -> Vec<NodeId> {
        let depth_zero: Vec<NodeId> = nodes
            .values()
            .filter(|node| node.depth == 0 && &node.id != root)
            .map(|node| node.id.clone())
            .collect();

        if !depth_zero.is_empty() {
            return depth_zero;
        }

        nodes
            .get(root.as_str())
            .map(|node| {
                node.children
                    .iter()
                    .filter(|c| nodes.contains_key(c.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Document identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scenario label
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Context shown before the first choice
    pub fn world_state(&self) -> &WorldState {
        &self.world_state
    }

    /// Planning horizon, if the document states one
    pub fn time_horizon_months(&self) -> Option<u32> {
        self.time_horizon_months
    }

    /// Free-form document metadata
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Get a node by its ID
    ///
    /// Absence is an expected outcome, not an error.
    pub fn node_by_id(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Get the children of a node, in document order
    ///
    /// Returns an empty vector for unknown ids and for leaves. Child ids
    /// that do not resolve are skipped.
    pub fn children_of(&self, id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.nodes.get(child.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the choices offered from the world state
    pub fn root_choices(&self) -> Vec<&TreeNode> {
        self.root_choices
            .iter()
            .filter_map(|id| self.nodes.get(id.as_str()))
            .collect()
    }

    /// Iterate over all nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }
}

impl Tree for ScenarioTree {
    type Node = TreeNode;

    fn root(&self) -> &NodeId {
        &self.root
    }

    fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    fn parent(&self, id: &str) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|node| node.parent_id.as_ref())
    }

    fn children(&self, id: &str) -> Box<dyn Iterator<Item = &NodeId> + '_> {
        Box::new(
            self.nodes
                .get(id)
                .map(|node| node.children.iter())
                .into_iter()
                .flatten()
                .filter(|child| self.nodes.contains_key(child.as_str())),
        )
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "scenario": "Small",
        "rootNodeId": "root",
        "nodes": {
            "root": { "id": "root", "depth": 0, "branchType": "moderate", "children": ["a", "b"] },
            "a": { "id": "a", "depth": 0, "branchType": "optimistic", "parentId": "root" },
            "b": { "id": "b", "depth": 0, "branchType": "bogus", "parentId": "root", "children": ["ghost"] }
        }
    }"#;

    #[test]
    fn test_root_choices_exclude_root() {
        let tree = ScenarioTree::from_json(SMALL).unwrap();
        let ids: Vec<&str> = tree.root_choices().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_root_choices_fall_back_to_root_children() {
        let json = r#"{
            "rootNodeId": "r",
            "nodes": {
                "r": { "depth": 0, "children": ["x"] },
                "x": { "depth": 1, "parentId": "r" }
            }
        }"#;
        let tree = ScenarioTree::from_json(json).unwrap();
        let ids: Vec<&str> = tree.root_choices().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[test]
    fn test_lenient_fields() {
        let tree = ScenarioTree::from_json(SMALL).unwrap();
        let b = tree.node_by_id("b").unwrap();
        assert_eq!(b.branch_type, BranchType::FALLBACK);
        assert!(tree.children_of("b").is_empty());
        assert_eq!(tree.children("b").count(), 0);
        assert!(tree.node_by_id("a").unwrap().is_leaf());
    }
}
