use thiserror::Error;

/// Why a share token could not be read back
#[derive(Debug, Error)]
pub enum TokenFault {
    #[error("token is {len} bytes, more than the {max} byte limit")]
    TooLong { len: usize, max: usize },

    #[error("token is not valid base64: {0}")]
    Alphabet(#[from] base64::DecodeError),

    #[error("token does not hold a list of node ids: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Share codec failure
///
/// There is a single user-facing outcome: the link is broken. The fault is
/// kept for logs.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid share token: {0}")]
    InvalidToken(#[from] TokenFault),
}

impl CodecError {
    /// The underlying fault
    pub fn fault(&self) -> &TokenFault {
        match self {
            CodecError::InvalidToken(fault) => fault,
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(e: base64::DecodeError) -> Self {
        CodecError::InvalidToken(e.into())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::InvalidToken(e.into())
    }
}
