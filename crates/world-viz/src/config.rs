//! Visualizer settings, loaded from an optional TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use world_tree::WorldTreeConfig;

use crate::TerrainConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Tree(#[from] world_tree::WorldTreeError),
}

/// Initial orbit camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 60.0,
            yaw: 0.6,
            pitch: 0.7,
        }
    }
}

/// Everything the visualizer can be told from its config file.
///
/// ```toml
/// [tree]
/// max_depth = 10
/// leaf_threshold = 32
///
/// [terrain]
/// cells = 96
/// pillars = 40
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub tree: WorldTreeConfig,
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
}

impl VizConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.tree.validate()?;
        Ok(config)
    }

    /// Reads the config at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(VizConfig::from_toml("").unwrap(), VizConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = VizConfig::from_toml(
            r#"
            [tree]
            leaf_threshold = 32

            [terrain]
            cells = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.tree.leaf_threshold, 32);
        assert_eq!(config.tree.max_depth, world_tree::MAX_DEPTH);
        assert_eq!(config.terrain.cells, 16);
        assert_eq!(config.terrain.pillars, TerrainConfig::default().pillars);
    }

    #[test]
    fn invalid_tree_config_is_rejected() {
        let result = VizConfig::from_toml("[tree]\nmax_depth = 0\n");
        assert!(matches!(result, Err(ConfigError::Tree(_))));

        let result = VizConfig::from_toml("[tree]\nmax_depth = 65535\n");
        assert!(matches!(result, Err(ConfigError::Tree(_))));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = VizConfig::from_toml("[terrain\ncells = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
