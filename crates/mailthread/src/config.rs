//! Configuration for the mail panel
//!
//! Settings are optional: a missing file yields the defaults, a
//! malformed file is an error the caller surfaces at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_refresh_interval_secs() -> u64 {
    60
}

/// Mail panel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// How often the fetch collaborator refreshes the collections
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Site-local reply/forward marker words merged into the
    /// normalizer's built-in set (e.g. "sv" for Swedish deployments)
    #[serde(default)]
    pub extra_subject_markers: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            extra_subject_markers: Vec::new(),
        }
    }
}

impl PanelConfig {
    /// Load the panel configuration from a JSON file, falling back to
    /// defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
