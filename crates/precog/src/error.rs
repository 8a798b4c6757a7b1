use path_replay::CodecError;
use scenario_tree::TreeError;
use thiserror::Error;

/// Failures that stop a view from showing anything but an error screen
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Tree data is unavailable: {0}")]
    DataUnavailable(#[from] TreeError),

    #[error("This share link is not valid: {0}")]
    InvalidToken(#[from] CodecError),
}

impl ViewError {
    /// Short heading for the error screen
    pub fn title(&self) -> &'static str {
        match self {
            ViewError::DataUnavailable(_) => "Unable to load scenarios",
            ViewError::InvalidToken(_) => "Invalid share link",
        }
    }
}
