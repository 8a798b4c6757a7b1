use thiserror::Error;

use crate::NodeId;

/// Failure to produce a usable tree at load time.
///
/// Every variant means the tree data is unavailable: the consuming view
/// cannot proceed and shows the error instead. There is no retry.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The backing source could not be read.
    #[error("failed to fetch tree data from {location}: {reason}")]
    Unreachable { location: String, reason: String },

    /// The payload is not a tree document.
    #[error("tree data does not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// The document does not name a root.
    #[error("tree data has no rootNodeId")]
    MissingRoot,

    /// The named root is not in the node mapping.
    #[error("rootNodeId `{0}` is not present in the node mapping")]
    DanglingRoot(NodeId),
}

impl TreeError {
    pub(crate) fn unreachable(location: impl Into<String>, reason: impl ToString) -> Self {
        TreeError::Unreachable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
