//! Level-by-level view of a path for the replay
//!
//! A journey pairs each chosen node with the options that were on offer at
//! that fork, which is what the replay reveals one level at a time.

use log::warn;
use scenario_tree::{BranchType, NodeId, ScenarioTree, TreeNode};
use smallvec::SmallVec;

/// Separator between levels in path summaries
pub const PATH_SEPARATOR: &str = " → ";

/// A decoded path with every id checked against a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    ids: Vec<NodeId>,
    skipped: Vec<NodeId>,
}

impl ResolvedPath {
    /// Keep the ids that resolve in `tree`, in order
    ///
    /// Ids that do not resolve are dropped with a warning. A shared link can
    /// outlive the tree revision it was made from.
    pub fn resolve(tree: &ScenarioTree, ids: impl IntoIterator<Item = NodeId>) -> Self {
        let (ids, skipped): (Vec<NodeId>, Vec<NodeId>) = ids
            .into_iter()
            .partition(|id| tree.node_by_id(id).is_some());

        for id in &skipped {
            warn!("Shared path names unknown node {id}; skipping it");
        }
        Self { ids, skipped }
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Ids that were dropped during resolution
    pub fn skipped(&self) -> &[NodeId] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One fork of a journey
#[derive(Debug, Clone)]
pub struct JourneyLevel<'t> {
    /// The node taken at this fork
    pub chosen: &'t TreeNode,
    /// Everything offered at this fork, chosen node included
    pub alternatives: SmallVec<[&'t TreeNode; 3]>,
    /// Position of `chosen` within `alternatives`
    pub chosen_index: usize,
}

impl<'t> JourneyLevel<'t> {
    /// Branch class of the edge leading into the chosen node
    pub fn incoming(&self) -> BranchType {
        self.chosen.branch_type
    }
}

/// Build the per-level view of `path`
///
/// Ids that do not resolve are skipped. When the chosen node is not among
/// the options at its fork (a path that no longer fits the tree), it is
/// shown as the only option.
pub fn levels<'t>(tree: &'t ScenarioTree, path: &[NodeId]) -> Vec<JourneyLevel<'t>> {
    let mut levels = Vec::with_capacity(path.len());
    let mut previous: Option<&NodeId> = None;

    for id in path {
        let Some(chosen) = tree.node_by_id(id) else {
            continue;
        };

        let mut alternatives: SmallVec<[&TreeNode; 3]> = match previous {
            None => tree.root_choices().into_iter().collect(),
            Some(parent) => tree.children_of(parent).into_iter().collect(),
        };

        let chosen_index = match alternatives.iter().position(|n| n.id == chosen.id) {
            Some(index) => index,
            None => {
                alternatives.clear();
                alternatives.push(chosen);
                0
            }
        };

        levels.push(JourneyLevel {
            chosen,
            alternatives,
            chosen_index,
        });
        previous = Some(id);
    }
    levels
}

/// Branch ordinals of the path, e.g. `1 → 2 → 3`
///
/// Unknown ids count as moderate. An empty path gives an empty string.
pub fn numeric_path(tree: &ScenarioTree, path: &[NodeId]) -> String {
    path.iter()
        .map(|id| {
            tree.node_by_id(id)
                .map(|node| node.branch_type)
                .unwrap_or(BranchType::FALLBACK)
                .ordinal()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Node titles along the path, unknown ids shown as the raw id
pub fn titled_path(tree: &ScenarioTree, path: &[NodeId]) -> String {
    path.iter()
        .map(|id| {
            tree.node_by_id(id)
                .map(|node| node.title.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}
