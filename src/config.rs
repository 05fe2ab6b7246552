//! Outliner configuration with TOML persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_SEARCH_LIMIT;
use crate::index::DEFAULT_RECENT_CAPACITY;
use crate::types::{OutlineError, OutlineResult, DEFAULT_RANK_INCREMENT};

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Snapshot file used when no path is given on the command line
    pub data_file: PathBuf,

    /// Rank step between imported siblings when there is no next sibling
    pub default_rank_increment: f64,

    /// Maximum search matches returned
    pub search_limit: usize,

    /// Entries kept by the recently edited tracker
    pub recently_edited_capacity: usize,

    /// LZ4-compress snapshot bodies
    pub compress: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("outline.otl"),
            default_rank_increment: DEFAULT_RANK_INCREMENT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            recently_edited_capacity: DEFAULT_RECENT_CAPACITY,
            compress: true,
        }
    }
}

impl OutlineConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> OutlineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| OutlineError::Config(e.to_string()))
    }

    /// Save to a TOML file
    pub fn save(&self, path: &Path) -> OutlineResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| OutlineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("outliner")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default config ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
