//! Configuration for the object layer
//!
//! Settings come from built-in defaults, optionally overridden by
//! ~/.config/bezy/objects.json.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default nesting limit when flattening components into outlines: the
/// number of component references allowed along one chain, counting the
/// outermost component as 1. Deeper chains are treated as reference cycles
/// and cut off.
pub const DEFAULT_MAX_COMPONENT_DEPTH: usize = 32;

/// Default tracing filter directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Get the path to the bezy config directory
pub fn config_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
    config_dir.join("bezy")
}

/// Runtime settings, after merging the config file over the defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub log_to_file: bool,
    /// Component references allowed along one chain, see [`DEFAULT_MAX_COMPONENT_DEPTH`]
    pub max_component_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_file: false,
            max_component_depth: DEFAULT_MAX_COMPONENT_DEPTH,
        }
    }
}

impl Settings {
    /// Build settings from an optional config file, falling back to defaults
    /// for anything the file leaves out.
    pub fn from_config(config: Option<&ConfigFile>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };

        Self {
            log_level: config.log_level.clone().unwrap_or(defaults.log_level),
            log_to_file: config.log_to_file.unwrap_or(defaults.log_to_file),
            max_component_depth: config
                .max_component_depth
                .unwrap_or(defaults.max_component_depth),
        }
    }

    /// Load the user config file (if any) and merge it over the defaults
    pub fn load() -> Self {
        Self::from_config(ConfigFile::load().as_ref())
    }
}

/// User configuration from ~/.config/bezy/objects.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Tracing filter directive, e.g. "debug" or "bezy_objects=trace"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Write logs to ~/.config/bezy/logs in addition to stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_to_file: Option<bool>,
    /// Nesting limit for component flattening
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_component_depth: Option<usize>,
}

impl ConfigFile {
    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        config_dir().join("objects.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path.
    /// A missing or malformed file yields `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded object settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved object settings to {:?}", path);
        Ok(())
    }
}
