use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Token marking an intentionally empty grid cell.
pub const PLACEHOLDER: &str = ".";

/// Identifier of a named area in the grid template.
pub type TileId = String;

/// Errors raised while constructing layout input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("layout must have at least one column")]
    ZeroColumns,
    #[error("layout must have at least one row")]
    ZeroRows,
    #[error("expected {expected} area rows, found {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("area row {row} has {actual} tokens, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("tile definition field `{0}` must not be blank")]
    BlankTileField(&'static str),
}

/// What to render in a tile, independent of where it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TileDefinition {
    #[serde(rename = "type")]
    kind: String,
    variant: String,
}

impl TileDefinition {
    pub fn new(
        kind: impl Into<String>,
        variant: impl Into<String>,
    ) -> Result<Self, StructuralError> {
        let kind = kind.into();
        let variant = variant.into();
        if kind.trim().is_empty() {
            return Err(StructuralError::BlankTileField("type"));
        }
        if variant.trim().is_empty() {
            return Err(StructuralError::BlankTileField("variant"));
        }
        Ok(Self { kind, variant })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Registry key in `type:variant` form.
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.variant)
    }
}

/// Validated grid template plus the tile definitions it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSpec {
    columns: u16,
    rows: u16,
    area_rows: Vec<String>,
    tile_defs: BTreeMap<TileId, TileDefinition>,
}

impl LayoutSpec {
    /// Build a spec, checking the row count and the token count of every row.
    ///
    /// Ids that appear in `area_rows` without a matching entry in `tile_defs`
    /// are not rejected here; the resolver reports them alongside every other
    /// per-area problem so a single pass surfaces all of them.
    pub fn new(
        columns: u16,
        rows: u16,
        area_rows: Vec<String>,
        tile_defs: BTreeMap<TileId, TileDefinition>,
    ) -> Result<Self, StructuralError> {
        if columns == 0 {
            return Err(StructuralError::ZeroColumns);
        }
        if rows == 0 {
            return Err(StructuralError::ZeroRows);
        }
        if area_rows.len() != rows as usize {
            return Err(StructuralError::RowCountMismatch {
                expected: rows as usize,
                actual: area_rows.len(),
            });
        }
        for (row, line) in area_rows.iter().enumerate() {
            let actual = line.split_whitespace().count();
            if actual != columns as usize {
                return Err(StructuralError::ColumnCountMismatch {
                    row,
                    expected: columns as usize,
                    actual,
                });
            }
        }

        Ok(Self {
            columns,
            rows,
            area_rows,
            tile_defs,
        })
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn area_rows(&self) -> &[String] {
        &self.area_rows
    }

    pub fn tile_defs(&self) -> &BTreeMap<TileId, TileDefinition> {
        &self.tile_defs
    }

    pub fn tile(&self, id: &str) -> Option<&TileDefinition> {
        self.tile_defs.get(id)
    }

    /// Tokenized template, indexed as `cells[y][x]`.
    pub fn cells(&self) -> Vec<Vec<&str>> {
        self.area_rows
            .iter()
            .map(|line| line.split_whitespace().collect())
            .collect()
    }

    /// Content hash of the normalized template and definitions.
    ///
    /// Whitespace differences inside area rows do not change the fingerprint.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.columns.to_le_bytes());
        hasher.update(&self.rows.to_le_bytes());
        for row in self.cells() {
            for token in row {
                hash_field(&mut hasher, token);
            }
        }
        hasher.update(&(self.tile_defs.len() as u64).to_le_bytes());
        for (id, def) in &self.tile_defs {
            hash_field(&mut hasher, id);
            hash_field(&mut hasher, &def.kind);
            hash_field(&mut hasher, &def.variant);
        }
        hasher.finalize()
    }
}

// Length prefixes keep field boundaries unambiguous whatever bytes a field holds.
fn hash_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}
