//! JSON dashboard configuration.
//!
//! ```json
//! {
//!   "columns": 6,
//!   "rows": 4,
//!   "areas": ["N N N N W W", "N N N N W W", "T T C C K K", "T T C C . ."],
//!   "tiles": { "N": { "type": "news", "variant": "standard" } },
//!   "grid": { "gap": 8.0, "minColumns": 2, "maxColumns": 8 }
//! }
//! ```
//!
//! `grid` is optional and falls back to [`GridSettings::default`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::GridSettings;
use crate::spec::{LayoutSpec, StructuralError, TileDefinition};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file `{0}` not found")]
    NotFound(PathBuf),
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid layout: {0}")]
    InvalidFormat(#[from] StructuralError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub columns: u16,
    pub rows: u16,
    pub areas: Vec<String>,
    #[serde(default)]
    pub tiles: BTreeMap<String, TileConfig>,
    #[serde(default)]
    pub grid: GridSettings,
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::from_json_str(&text)
    }

    /// Validate the grid template and tile definitions into a [`LayoutSpec`].
    pub fn to_spec(&self) -> Result<LayoutSpec, ConfigError> {
        let tile_defs = self
            .tiles
            .iter()
            .map(|(id, tile)| -> Result<_, StructuralError> {
                Ok((id.clone(), TileDefinition::new(&tile.kind, &tile.variant)?))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(LayoutSpec::new(
            self.columns,
            self.rows,
            self.areas.clone(),
            tile_defs,
        )?)
    }
}
