//! Share tokens
//!
//! A token is the compact JSON array of node ids, base64 encoded with the
//! URL-safe alphabet and no padding, so it can sit in a path segment as is.
//! Decoding also accepts the standard alphabet and padded input, which is
//! what links copied out of older builds and chat clients look like.
//!
//! The codec never looks at a tree. Resolving ids is the caller's job.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use log::{debug, warn};
use scenario_tree::NodeId;
use serde_json::Value;
use std::fmt;

use crate::error::{CodecError, TokenFault};

/// Longest token accepted by [`decode`]
pub const MAX_TOKEN_LEN: usize = 8 * 1024;

/// Path segment that introduces a token in a share URL
const SHARE_SEGMENT: &str = "/share/";

/// An encoded path, safe to embed in a URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

impl ShareToken {
    /// Decode a received token, keeping its text as given
    pub fn parse(token: &str) -> Result<(Self, Vec<NodeId>), CodecError> {
        let token = token.trim();
        let path = decode(token)?;
        Ok((Self(token.to_string()), path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode an ordered path as a share token
pub fn encode(path: &[NodeId]) -> ShareToken {
    let payload = Value::Array(
        path.iter()
            .map(|id| Value::String(id.to_string()))
            .collect(),
    )
    .to_string();

    let token = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    debug!("Encoded {} ids into a {} byte token", path.len(), token.len());
    ShareToken(token)
}

/// Decode a share token back into the ordered path
///
/// Either the whole path comes back or an error does; a token that decodes
/// to anything other than a JSON array of strings is rejected.
pub fn decode(token: &str) -> Result<Vec<NodeId>, CodecError> {
    let token = token.trim();
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenFault::TooLong {
            len: token.len(),
            max: MAX_TOKEN_LEN,
        }
        .into());
    }

    let mut standard: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = STANDARD.decode(standard.as_bytes()).map_err(|e| {
        warn!("Share token rejected: {e}");
        CodecError::from(e)
    })?;
    let path: Vec<NodeId> = serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Share token payload rejected: {e}");
        CodecError::from(e)
    })?;

    debug!("Decoded share token into {} ids", path.len());
    Ok(path)
}

/// A share URL: `<origin>/share/<token>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    origin: String,
    token: ShareToken,
}

impl ShareLink {
    /// Create a link; trailing slashes on the origin are dropped
    pub fn new(origin: impl AsRef<str>, token: ShareToken) -> Self {
        Self {
            origin: origin.as_ref().trim().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Encode `path` and build its link in one go
    pub fn for_path(origin: impl AsRef<str>, path: &[NodeId]) -> Self {
        Self::new(origin, encode(path))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn token(&self) -> &ShareToken {
        &self.token
    }

    /// Render the full URL
    pub fn url(&self) -> String {
        format!("{}{}{}", self.origin, SHARE_SEGMENT, self.token)
    }

    /// Pull the token out of user input
    ///
    /// Accepts a bare token or any URL with a `/share/<token>` segment.
    /// Query string, fragment and a trailing slash are ignored.
    pub fn token_from_input(input: &str) -> &str {
        let input = input.trim();
        let tail = match input.rfind(SHARE_SEGMENT) {
            Some(at) => &input[at + SHARE_SEGMENT.len()..],
            None => input,
        };

        let end = tail.find(['?', '#']).unwrap_or(tail.len());
        tail[..end].trim_end_matches('/')
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
