//! Application configuration
//!
//! `AppConfig` is read from a JSON file and then overridden by command line
//! flags. Every field has a default, so an empty object (or no file at all)
//! is a valid configuration.

use log::{debug, info};
use path_replay::PhaseTimings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "PRECOG_CONFIG";

/// Config file picked up from the working directory
pub const LOCAL_CONFIG: &str = "precog.json";

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown key `{key}` bound to {action}")]
    UnknownKey { action: &'static str, key: String },

    #[error("key `{key}` bound to {action} is reserved for choices 1-9")]
    ReservedKey { action: &'static str, key: String },
}

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

/// Key names for the rebindable actions
///
/// Names are single characters or one of `backspace`, `esc`, `enter`,
/// `tab`, `space`, `delete`, `left`, `right`, `up`, `down`. Digits always
/// pick choices and Escape always closes the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub back: String,
    pub open_replay: String,
    pub close: String,
    pub share: String,
    pub reset: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            back: "backspace".into(),
            open_replay: "v".into(),
            close: "esc".into(),
            share: "s".into(),
            reset: "r".into(),
            quit: "q".into(),
        }
    }
}

/// Configuration for a precog session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tree document: a file path or an HTTP(S) URL
    pub data: String,

    /// Origin that share URLs are built on
    pub share_origin: String,

    /// How long a picked choice stays highlighted before it is taken
    pub settle_delay_ms: u64,

    /// Replay pacing while exploring
    pub explore_timings: PhaseTimings,

    /// Replay pacing for shared links
    pub replay_timings: PhaseTimings,

    /// How long notifications stay on screen
    pub toast_ttl_ms: u64,

    pub theme: ThemeChoice,

    pub keys: KeyBindings,

    /// Where the terminal UI writes its log. Defaults to the temp dir.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: "data/example.json".into(),
            share_origin: "http://localhost:3000".into(),
            settle_delay_ms: 300,
            explore_timings: PhaseTimings::explore(),
            replay_timings: PhaseTimings::replay(),
            toast_ttl_ms: 4_000,
            theme: ThemeChoice::default(),
            keys: KeyBindings::default(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config file; the file must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Find and load the config for this run
    ///
    /// Looks at `explicit`, then `$PRECOG_CONFIG`, then `precog.json` in the
    /// working directory. Falls back to defaults when none is set. A file
    /// that is named explicitly or through the environment has to exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            debug!("{CONFIG_ENV} is set");
            return Self::load(Path::new(&path));
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.is_file() {
            return Self::load(local);
        }

        debug!("No config file found; using defaults");
        Ok(Self::default())
    }

    /// Set the tree document location.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the share URL origin.
    pub fn share_origin(mut self, origin: impl Into<String>) -> Self {
        self.share_origin = origin.into();
        self
    }

    /// Set the settle delay in milliseconds.
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Set the replay pacing used while exploring.
    pub fn explore_timings(mut self, timings: PhaseTimings) -> Self {
        self.explore_timings = timings;
        self
    }

    /// Set the replay pacing used for shared links.
    pub fn replay_timings(mut self, timings: PhaseTimings) -> Self {
        self.replay_timings = timings;
        self
    }

    /// Set the notification lifetime in milliseconds.
    pub fn toast_ttl_ms(mut self, ms: u64) -> Self {
        self.toast_ttl_ms = ms;
        self
    }

    pub fn theme(mut self, theme: ThemeChoice) -> Self {
        self.theme = theme;
        self
    }

    /// Set the log file path.
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    /// Log destination for the terminal UI
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("precog.log"))
    }
}
