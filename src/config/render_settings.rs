use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MAX_DEPTH: usize = 32;

/// Renderer options, loadable from a YAML file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum Container nesting depth before a render is abandoned.
    pub max_depth: usize,
    /// Pretty-print the rendered JSON instead of emitting it compact.
    pub pretty: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }
}

impl RenderSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid render settings")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&yaml)
    }
}
