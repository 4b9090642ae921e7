//! Configuration for taskweave.
//!
//! A single optional TOML file holds user preferences:
//!
//! - System: `~/.config/taskweave/config.toml`
//! - Override: `TW_CONFIG` environment variable (absolute path)
//!
//! Every key is optional; a missing file or missing keys resolve to the
//! built-in defaults. A present-but-malformed file is an error, not a
//! silent fallback.

use crate::mindmap::layout::LayoutConfig;
use crate::mindmap::sequencer::SequencerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "TW_CONFIG";

/// Resolved taskweave configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Estimate substituted when a generated task carries none
    pub fallback_estimate: String,
    /// Mind-map layout geometry
    pub layout: LayoutConfig,
    /// Execution animation timing
    pub sequencer: SequencerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_estimate: "1 hour".to_string(),
            layout: LayoutConfig::default(),
            sequencer: SequencerConfig::default(),
        }
    }
}

impl Config {
    /// Default config file path under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("taskweave").join("config.toml"))
    }

    /// Path to load: `TW_CONFIG` env var, else the platform default.
    pub fn resolve_path() -> Option<PathBuf> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::resolve_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
    }
}
