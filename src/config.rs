use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/slotlens.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Scenario loaded when none is given on the command line.
    pub default_scenario: Option<PathBuf>,
    /// Print JSON instead of text tables.
    pub json: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            default_scenario: None,
            json: false,
        }
    }
}

/// Why a config file could not be used.
#[derive(Debug)]
pub enum ConfigFallback {
    NotFound(PathBuf),
    Unreadable(anyhow::Error),
}

impl InspectorConfig {
    /// Load configuration from an explicit path.
    ///
    /// Returns the defaults together with the reason when the file is missing
    /// or malformed. Logging is not installed yet at this point, so reporting
    /// is left to the caller.
    pub fn load_from_path(path: &Path) -> (Self, Option<ConfigFallback>) {
        match Self::read(path) {
            Ok(config) => (config, None),
            Err(err) => {
                let not_found = err
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
                let reason = if not_found {
                    ConfigFallback::NotFound(path.to_path_buf())
                } else {
                    ConfigFallback::Unreadable(err)
                };
                (InspectorConfig::default(), Some(reason))
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
