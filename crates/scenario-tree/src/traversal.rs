//! Traversal state machine
//!
//! A traversal is either at the world state (empty path) or at a node (the
//! last path entry). Choosing is a two-phase commit: [`Traversal::choose`]
//! marks a pending selection and hands back a ticket, and
//! [`Traversal::commit`] appends it once the settle delay has elapsed. While
//! a selection is pending, further choices are rejected.
//!
//! Every mutation bumps a generation counter. A ticket only commits if it
//! was issued in the current generation, so a settle timer that fires after
//! a back or reset cannot write into the newer state.

use log::{debug, info, trace};

use crate::{NodeId, ScenarioTree, TreeNode};

/// Where a traversal currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<'a> {
    /// No choice made yet
    WorldState,
    /// At the last node of the path
    Node(&'a NodeId),
}

/// Ticket for a marked but not yet committed choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    index: usize,
    node_id: NodeId,
    generation: u64,
}

impl PendingChoice {
    /// Zero-based index into the choice set it was made from
    pub fn index(&self) -> usize {
        self.index
    }

    /// The node that will be appended on commit
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

/// The ordered path of visited node ids plus any pending selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    path: Vec<NodeId>,
    pending: Option<PendingChoice>,
    generation: u64,
}

impl Traversal {
    /// Create a traversal at the world state
    pub fn new() -> Self {
        Self::default()
    }

    /// The visited ids, root side first
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// The selection waiting to be committed, if any
    pub fn pending(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    /// Returns true while a selection is settling
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Current position
    pub fn position(&self) -> Position<'_> {
        match self.path.last() {
            Some(id) => Position::Node(id),
            None => Position::WorldState,
        }
    }

    /// The node at the end of the path
    ///
    /// Returns `None` at the world state, or if the id no longer resolves.
    pub fn current_node<'t>(&self, tree: &'t ScenarioTree) -> Option<&'t TreeNode> {
        self.path.last().and_then(|id| tree.node_by_id(id))
    }

    /// Returns true if there is an entry to go back from
    pub fn can_go_back(&self) -> bool {
        !self.path.is_empty()
    }

    /// The legal choice set at the current position
    ///
    /// Root choices at the world state, children of the current node
    /// otherwise, and nothing if the current node does not resolve.
    pub fn current_choices<'t>(&self, tree: &'t ScenarioTree) -> Vec<&'t TreeNode> {
        match self.position() {
            Position::WorldState => tree.root_choices(),
            Position::Node(id) => tree.children_of(id),
        }
    }

    /// Mark the choice at `index` as pending
    ///
    /// Returns the ticket to commit with, or `None` if a selection is
    /// already pending or the index is out of range.
    pub fn choose(&mut self, tree: &ScenarioTree, index: usize) -> Option<PendingChoice> {
        if let Some(pending) = &self.pending {
            debug!(
                "Choice {} rejected: {} is still settling",
                index + 1,
                pending.node_id
            );
            return None;
        }

        let choices = self.current_choices(tree);
        let Some(choice) = choices.get(index) else {
            debug!(
                "No choice at index {} ({} available)",
                index + 1,
                choices.len()
            );
            return None;
        };

        info!(
            "Choice selected: node={} branch={} button={} depth={}",
            choice.id,
            choice.branch_type,
            index + 1,
            self.path.len()
        );

        let ticket = PendingChoice {
            index,
            node_id: choice.id.clone(),
            generation: self.generation,
        };
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    /// Mark the choice with the given id as pending
    ///
    /// Same as [`choose`](Self::choose), looking the id up in the current
    /// choice set.
    pub fn choose_node(&mut self, tree: &ScenarioTree, id: &str) -> Option<PendingChoice> {
        let index = self
            .current_choices(tree)
            .iter()
            .position(|node| node.id.as_str() == id);

        match index {
            Some(index) => self.choose(tree, index),
            None => {
                debug!("{id} is not a legal choice here");
                None
            }
        }
    }

    /// Finalize a pending selection
    ///
    /// Returns false, changing nothing, for a ticket that is not the
    /// current pending selection.
    pub fn commit(&mut self, ticket: &PendingChoice) -> bool {
        if self.pending.as_ref() != Some(ticket) {
            trace!("Stale selection {} ignored", ticket.node_id);
            return false;
        }

        self.pending = None;
        self.path.push(ticket.node_id.clone());
        self.generation += 1;

        info!(
            "Navigation complete: node={} path_length={}",
            ticket.node_id,
            self.path.len()
        );
        true
    }

    /// Drop the pending selection without committing it
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Pending selection {} cancelled", pending.node_id);
            self.generation += 1;
        }
    }

    /// Remove the last path entry
    ///
    /// Returns the removed id. On an empty path this does nothing.
    pub fn go_back(&mut self) -> Option<NodeId> {
        let removed = self.path.pop()?;

        self.pending = None;
        self.generation += 1;

        info!(
            "Back navigation complete: from={} to={}",
            removed,
            self.path
                .last()
                .map(NodeId::as_str)
                .unwrap_or("world state")
        );
        Some(removed)
    }

    /// Return to the world state
    pub fn reset(&mut self) {
        if !self.path.is_empty() {
            info!("Reset after {} choices", self.path.len());
        }
        self.path.clear();
        self.pending = None;
        self.generation += 1;
    }

    /// Choose and commit each id in turn
    ///
    /// Stops at the first id that is not a legal choice and returns how many
    /// were applied.
    pub fn follow<I, S>(&mut self, tree: &ScenarioTree, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut applied = 0;
        for id in ids {
            match self.choose_node(tree, id.as_ref()) {
                Some(ticket) if self.commit(&ticket) => applied += 1,
                _ => break,
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ScenarioTree {
        ScenarioTree::from_json(
            r#"{
                "rootNodeId": "root",
                "nodes": {
                    "root": { "depth": 0, "children": ["a", "b"] },
                    "a": { "depth": 0, "branchType": "optimistic", "parentId": "root", "children": ["a1"] },
                    "b": { "depth": 0, "branchType": "pessimistic", "parentId": "root" },
                    "a1": { "depth": 1, "branchType": "moderate", "parentId": "a" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_traversal_is_at_world_state() {
        let traversal = Traversal::new();
        assert_eq!(traversal.position(), Position::WorldState);
        assert!(!traversal.can_go_back());
        assert!(!traversal.is_pending());
    }

    #[test]
    fn test_choose_then_commit() {
        let tree = tree();
        let mut traversal = Traversal::new();

        let ticket = traversal.choose(&tree, 0).unwrap();
        assert_eq!(ticket.index(), 0);
        assert!(traversal.path().is_empty());

        assert!(traversal.commit(&ticket));
        assert_eq!(traversal.path(), &[NodeId::from("a")]);
        assert!(traversal.pending().is_none());
        assert!(!traversal.commit(&ticket));
    }

    #[test]
    fn test_ticket_goes_stale_after_cancel() {
        let tree = tree();
        let mut traversal = Traversal::new();

        let ticket = traversal.choose(&tree, 1).unwrap();
        traversal.cancel_pending();
        assert!(!traversal.commit(&ticket));
        assert!(traversal.path().is_empty());
    }

    #[test]
    fn test_follow_stops_at_illegal_step() {
        let tree = tree();
        let mut traversal = Traversal::new();

        assert_eq!(traversal.follow(&tree, ["a", "b", "a1"]), 1);
        assert_eq!(traversal.path(), &[NodeId::from("a")]);
    }
}
