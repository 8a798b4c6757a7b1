//! Where tree documents come from
//!
//! The tree is read exactly once per session. A source only has to hand
//! back the document text; parsing and validation happen in
//! [`ScenarioTree::load`](crate::ScenarioTree::load).

use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::TreeError;

/// A readable tree document
pub trait TreeSource {
    /// Human-readable location for logs and error messages
    fn location(&self) -> String;

    /// Read the whole document
    fn fetch(&self) -> Result<String, TreeError>;
}

/// A tree document on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TreeSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, TreeError> {
        debug!("Reading tree document {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|e| TreeError::unreachable(self.location(), e))
    }
}

/// A tree document already in memory
#[derive(Debug, Clone)]
pub struct JsonSource {
    text: String,
}

impl JsonSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TreeSource for JsonSource {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn fetch(&self) -> Result<String, TreeError> {
        Ok(self.text.clone())
    }
}

/// A tree document served over HTTP(S)
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "http")]
impl TreeSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, TreeError> {
        debug!("GET {}", self.url);
        reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| TreeError::unreachable(self.location(), e))
    }
}

/// Returns true if `location` names an HTTP(S) resource
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Pick a source for a location string: HTTP(S) URLs or a file path
pub fn open_source(location: &str) -> Result<Box<dyn TreeSource>, TreeError> {
    if is_remote(location) {
        #[cfg(feature = "http")]
        return Ok(Box::new(HttpSource::new(location.trim())));

        #[cfg(not(feature = "http"))]
        return Err(TreeError::unreachable(
            location,
            "built without the `http` feature",
        ));
    }
    Ok(Box::new(FileSource::new(location)))
}
