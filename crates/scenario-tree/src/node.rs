//! Core node types for scenario trees

use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Identifier of a node, unique within one tree document
///
/// Share tokens carry these verbatim, so a `NodeId` may outlive the tree it
/// came from. Always resolve it against the current tree before use.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Deref,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_owned())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Narrative tone of a branch
///
/// Only used for presentation: traversal never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchType {
    Optimistic,
    #[default]
    Moderate,
    Pessimistic,
}

impl BranchType {
    /// All branch types in ordinal order
    pub const ALL: [BranchType; 3] = [
        BranchType::Optimistic,
        BranchType::Moderate,
        BranchType::Pessimistic,
    ];

    /// The class used when a document omits or misspells a branch type
    pub const FALLBACK: BranchType = BranchType::Moderate;

    /// Parse the document spelling of a branch type
    ///
    /// Returns `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Some(BranchType::Optimistic),
            "moderate" => Some(BranchType::Moderate),
            "pessimistic" => Some(BranchType::Pessimistic),
            _ => None,
        }
    }

    /// Document spelling (lowercase)
    pub const fn as_str(self) -> &'static str {
        match self {
            BranchType::Optimistic => "optimistic",
            BranchType::Moderate => "moderate",
            BranchType::Pessimistic => "pessimistic",
        }
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            BranchType::Optimistic => "Optimistic",
            BranchType::Moderate => "Moderate",
            BranchType::Pessimistic => "Pessimistic",
        }
    }

    /// Digit used in the numeric path summary (1, 2 or 3)
    pub const fn ordinal(self) -> u8 {
        match self {
            BranchType::Optimistic => 1,
            BranchType::Moderate => 2,
            BranchType::Pessimistic => 3,
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BranchType::parse(s).ok_or_else(|| format!("unknown branch type: {s}"))
    }
}

/// Narrative context shown before any choice is made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldState {
    pub description: String,
    pub current_date: String,
    pub key_events: Vec<String>,
    pub key_players: Vec<String>,
    pub contextual_factors: Vec<String>,
}

/// A single scenario in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Unique id within the tree
    pub id: NodeId,
    /// Distance from the root
    pub depth: u32,
    /// Short headline for the fork
    pub title: String,
    /// What this choice means
    pub description: String,
    /// The world after taking this branch
    pub world_update: String,
    /// Display date for the world update
    pub timeline_date: String,
    /// Narrative tone
    pub branch_type: BranchType,
    /// Ordered ids of the next forks (empty for leaves)
    pub children: Vec<NodeId>,
    /// Back-reference; absent only for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
}

impl TreeNode {
    /// Create a node with empty text fields
    pub fn new(id: impl Into<NodeId>, depth: u32, branch_type: BranchType) -> Self {
        Self {
            id: id.into(),
            depth,
            title: String::new(),
            description: String::new(),
            world_update: String::new(),
            timeline_date: String::new(),
            branch_type,
            children: Vec::new(),
            parent_id: None,
        }
    }

    /// Returns true if the node has no further forks
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.branch_type, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("n-1");
        assert_eq!(id.as_str(), "n-1");
        assert_eq!(id, NodeId::from("n-1"));
        assert_eq!(id, NodeId::from(String::from("n-1")));
        assert_eq!(id.to_string(), "n-1");
        assert_eq!(id.len(), 3);
    }

    #[test]
    fn test_branch_type_parse() {
        assert_eq!(BranchType::parse("optimistic"), Some(BranchType::Optimistic));
        assert_eq!(BranchType::parse(" Pessimistic "), Some(BranchType::Pessimistic));
        assert_eq!(BranchType::parse("wild"), None);
        assert!("moderate".parse::<BranchType>().is_ok());
    }

    #[test]
    fn test_branch_type_ordinals() {
        let ordinals: Vec<u8> = BranchType::ALL.iter().map(|b| b.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(BranchType::default(), BranchType::FALLBACK);
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let mut node = TreeNode::new("a", 0, BranchType::Optimistic);
        node.world_update = "calm".into();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["worldUpdate"], "calm");
        assert_eq!(json["branchType"], "optimistic");
        assert!(json.get("parentId").is_none());
        assert!(node.is_leaf());
    }
}
