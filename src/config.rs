use crate::cli::ColorMode;
use crate::schema::ExpressionField;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: json5::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Attribute whose wire model the commands operate on
    pub field: ExpressionField,
    pub output: OutputRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputRules {
    pub pretty_json: bool,
    pub color: ColorMode,
}

impl Default for OutputRules {
    fn default() -> Self {
        Self {
            pretty_json: true,
            color: ColorMode::Auto,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ToolConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    json5::from_str::<ToolConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static ToolConfig {
    static DEFAULT_CONFIG: LazyLock<ToolConfig> = LazyLock::new(ToolConfig::default);
    &DEFAULT_CONFIG
}
