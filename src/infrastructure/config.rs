use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::{BandPlan, ContinentTable, DisplayPadding};
use super::log_reader::ColumnSynonyms;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config format - {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: 1400, height: 1000 }
    }
}

/// Lookup tables and rendering options.
///
/// Every field falls back to its built-in default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub band_plan: BandPlan,
    pub continents: ContinentTable,
    pub columns: ColumnSynonyms,
    pub padding: DisplayPadding,
    pub render: RenderOptions,
}

pub struct ConfigRepository;

impl ConfigRepository {
    pub fn load(path: &Path) -> ConfigResult<MapConfig> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<MapConfig> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(config: &MapConfig) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }
}
