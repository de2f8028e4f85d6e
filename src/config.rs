use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Environment variable naming an optional TOML file with overrides.
pub const CONFIG_ENV: &str = "FOLDERTREE_CONFIG";

/// Appearance settings. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub tree: TreeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: "Folder Tree Viewer".to_string(),
        }
    }
}

/// Colors are plain RGB triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeStyle {
    pub row_height: f32,
    pub indent: f32,
    pub font_size: f32,
    pub background: [u8; 3],
    pub panel: [u8; 3],
    pub text: [u8; 3],
    pub selected: [u8; 3],
    pub choose_button: [u8; 3],
    pub expand_button: [u8; 3],
    pub collapse_button: [u8; 3],
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            indent: 18.0,
            font_size: 14.0,
            background: [0xff, 0xff, 0xff],
            panel: [0xf2, 0xf2, 0xf2],
            text: [0x33, 0x33, 0x33],
            selected: [0xcc, 0xe5, 0xff],
            choose_button: [0x4c, 0xaf, 0x50],
            expand_button: [0x21, 0x96, 0xf3],
            collapse_button: [0xff, 0x98, 0x00],
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by the file named in `FOLDERTREE_CONFIG` if set.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
