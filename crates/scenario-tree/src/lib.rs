//! Scenario Tree Library
//!
//! A read-only store for precomputed decision trees of future scenarios, and
//! the traversal state machine that walks one fork at a time from the world
//! state down to a leaf.
//!
//! # Core Concepts
//!
//! - **ScenarioTree**: The loaded document with lookups by id
//! - **Tree**: Generic navigation trait (parents, children, root paths)
//! - **Traversal**: The visited path plus a two-phase pending selection
//! - **TreeSource**: Where the document comes from (file, HTTP, memory)
//!
//! # Example
//!
//! ```no_run
//! use scenario_tree::prelude::*;
//!
//! let tree = ScenarioTree::load(&FileSource::new("data/example.json")).expect("tree data");
//!
//! let mut traversal = Traversal::new();
//! if let Some(ticket) = traversal.choose(&tree, 0) {
//!     // The settle delay would normally elapse here
//!     traversal.commit(&ticket);
//! }
//!
//! for id in traversal.path() {
//!     let node = tree.node_by_id(id).unwrap();
//!     println!("{} ({})", node.title, node.branch_type);
//! }
//! ```

mod error;
mod node;
pub mod source;
mod traits;
pub mod traversal;
mod tree;

pub use error::TreeError;
pub use node::{BranchType, NodeId, TreeNode, WorldState};
pub use source::{open_source, FileSource, JsonSource, TreeSource};
pub use traits::Tree;
pub use traversal::{PendingChoice, Position, Traversal};
pub use tree::ScenarioTree;

#[cfg(feature = "http")]
pub use source::HttpSource;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        BranchType, FileSource, JsonSource, NodeId, PendingChoice, Position, ScenarioTree,
        Traversal, Tree, TreeError, TreeNode, TreeSource, WorldState,
    };
}
