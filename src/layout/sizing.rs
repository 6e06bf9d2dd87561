//! Responsive cell sizing.
//!
//! The row count always fills the shorter viewport axis, so rotating a device
//! keeps the cell size stable; only the column count follows the width. The
//! gap is a fixed setting and is never derived from the viewport.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Extent, TileSize};

pub const DEFAULT_GAP: f32 = 8.0;
pub const DEFAULT_MIN_COLUMNS: u16 = 2;
pub const DEFAULT_MAX_COLUMNS: u16 = 8;

const CACHE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Fixed grid parameters that do not depend on the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    /// Spacing between adjacent cells.
    pub gap: f32,
    pub min_columns: u16,
    pub max_columns: u16,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            min_columns: DEFAULT_MIN_COLUMNS,
            max_columns: DEFAULT_MAX_COLUMNS,
        }
    }
}

impl GridSettings {
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_column_range(mut self, min_columns: u16, max_columns: u16) -> Self {
        self.min_columns = min_columns;
        self.max_columns = max_columns;
        self
    }

    fn check(&self) -> Result<(), SizingError> {
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(SizingError::InvalidDimensions(format!(
                "gap must be a finite non-negative number, got {}",
                self.gap
            )));
        }
        if self.min_columns == 0 || self.min_columns > self.max_columns {
            return Err(SizingError::InvalidDimensions(format!(
                "column range {}..={} is empty or starts at zero",
                self.min_columns, self.max_columns
            )));
        }
        Ok(())
    }
}

/// Viewport-derived cell metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingParams {
    pub base_cell_size: f32,
    pub columns: u16,
    pub gap: f32,
}

impl SizingParams {
    /// Distance between the leading edges of two adjacent cells.
    pub fn stride(&self) -> f32 {
        self.base_cell_size + self.gap
    }

    pub fn tile_width(&self, columns: u16) -> f32 {
        span_length(self.base_cell_size, self.gap, columns)
    }

    pub fn tile_height(&self, rows: u16) -> f32 {
        span_length(self.base_cell_size, self.gap, rows)
    }

    pub fn tile_extent(&self, size: TileSize) -> Extent {
        Extent::new(self.tile_width(size.columns), self.tile_height(size.rows))
    }
}

fn span_length(cell: f32, gap: f32, cells: u16) -> f32 {
    if cells == 0 {
        return 0.0;
    }
    cell * cells as f32 + gap * (cells - 1) as f32
}

/// Derives [`SizingParams`] from a viewport and a target row count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResponsiveGridSizer {
    settings: GridSettings,
}

impl ResponsiveGridSizer {
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn size(&self, width: f32, height: f32, rows: u16) -> Result<SizingParams, SizingError> {
        self.settings.check()?;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SizingError::InvalidDimensions(format!(
                "viewport must be positive, got {width}x{height}"
            )));
        }
        if rows == 0 {
            return Err(SizingError::InvalidDimensions(
                "row count must be positive".to_string(),
            ));
        }

        let gap = self.settings.gap;
        let shorter = width.min(height);
        let base_cell_size = (shorter - gap * (rows - 1) as f32) / rows as f32;
        if !(base_cell_size > 0.0) {
            return Err(SizingError::InvalidDimensions(format!(
                "{shorter} units cannot hold {rows} rows with a gap of {gap}"
            )));
        }

        // The extra gap in the numerator accounts for the last column having
        // no trailing gap. `as` saturates, so huge ratios land on u16::MAX.
        let fit = ((width + gap) / (base_cell_size + gap)).floor() as u16;
        let columns = fit.clamp(self.settings.min_columns, self.settings.max_columns);

        Ok(SizingParams {
            base_cell_size,
            columns,
            gap,
        })
    }
}

/// Memo of sizing results keyed on the exact viewport and row count.
#[derive(Debug, Default)]
pub struct SizingCache {
    sizer: ResponsiveGridSizer,
    entries: HashMap<(u32, u32, u16), SizingParams>,
    hits: u64,
}

impl SizingCache {
    pub fn new(sizer: ResponsiveGridSizer) -> Self {
        Self {
            sizer,
            entries: HashMap::new(),
            hits: 0,
        }
    }

    pub fn sizer(&self) -> &ResponsiveGridSizer {
        &self.sizer
    }

    /// Returns the sizing for the viewport and whether it came from the cache.
    pub fn size(
        &mut self,
        width: f32,
        height: f32,
        rows: u16,
    ) -> Result<(SizingParams, bool), SizingError> {
        let key = (width.to_bits(), height.to_bits(), rows);
        if let Some(params) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return Ok((*params, true));
        }

        let params = self.sizer.size(width, height, rows)?;
        if self.entries.len() >= CACHE_CAPACITY {
            self.entries.clear();
        }
        self.entries.insert(key, params);
        Ok((params, false))
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> ResponsiveGridSizer {
        ResponsiveGridSizer::default()
    }

    #[test]
    fn rows_fill_the_shorter_axis() {
        let params = sizer().size(1200.0, 824.0, 4).unwrap();
        assert_eq!(params.base_cell_size, 200.0);
        assert_eq!(params.gap, DEFAULT_GAP);
        // (1200 + 8) / 208 = 5.8
        assert_eq!(params.columns, 5);
        assert_eq!(params.tile_height(4), 824.0);
    }

    #[test]
    fn rotation_keeps_cell_size() {
        let landscape = sizer().size(1200.0, 824.0, 4).unwrap();
        let portrait = sizer().size(824.0, 1200.0, 4).unwrap();
        assert_eq!(landscape.base_cell_size, portrait.base_cell_size);
        assert_eq!(portrait.columns, 4);
    }

    #[test]
    fn sizing_is_idempotent() {
        let a = sizer().size(1337.5, 911.25, 5).unwrap();
        let b = sizer().size(1337.5, 911.25, 5).unwrap();
        assert_eq!(a.base_cell_size.to_bits(), b.base_cell_size.to_bits());
        assert_eq!(a.columns, b.columns);
        assert_eq!(a.gap.to_bits(), b.gap.to_bits());
    }

    #[test]
    fn columns_are_clamped_for_extreme_aspect_ratios() {
        let settings = GridSettings::default().with_gap(0.0);
        let sizer = ResponsiveGridSizer::new(settings);

        let narrow = sizer.size(1.0, 100_000.0, 4).unwrap();
        assert!((DEFAULT_MIN_COLUMNS..=DEFAULT_MAX_COLUMNS).contains(&narrow.columns));

        let wide = sizer.size(100_000.0, 800.0, 4).unwrap();
        assert_eq!(wide.columns, DEFAULT_MAX_COLUMNS);

        let gapped_wide = ResponsiveGridSizer::default()
            .size(100_000.0, 800.0, 4)
            .unwrap();
        assert_eq!(gapped_wide.columns, DEFAULT_MAX_COLUMNS);

        let square = sizer.size(100.0, 100.0, 1).unwrap();
        assert_eq!(square.columns, DEFAULT_MIN_COLUMNS);
    }

    #[test]
    fn single_cell_tiles_have_no_gap() {
        let params = sizer().size(900.0, 600.0, 3).unwrap();
        assert_eq!(params.tile_width(1), params.base_cell_size);
        assert_eq!(params.tile_height(1), params.base_cell_size);
        assert_eq!(
            params.tile_width(3),
            params.base_cell_size * 3.0 + params.gap * 2.0
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            sizer().size(0.0, 600.0, 3),
            Err(SizingError::InvalidDimensions(_))
        ));
        assert!(matches!(
            sizer().size(600.0, -1.0, 3),
            Err(SizingError::InvalidDimensions(_))
        ));
        assert!(matches!(
            sizer().size(600.0, 600.0, 0),
            Err(SizingError::InvalidDimensions(_))
        ));
        assert!(matches!(
            sizer().size(f32::NAN, 600.0, 3),
            Err(SizingError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ResponsiveGridSizer::new(GridSettings::default().with_gap(-1.0)).size(600.0, 600.0, 3),
            Err(SizingError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ResponsiveGridSizer::new(GridSettings::default().with_column_range(4, 2))
                .size(600.0, 600.0, 3),
            Err(SizingError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_gaps_that_consume_the_viewport() {
        let err = sizer().size(1.0, 100_000.0, 4).unwrap_err();
        assert!(err.to_string().contains("cannot hold 4 rows"));
    }

    #[test]
    fn cache_reuses_results() {
        let mut cache = SizingCache::new(sizer());
        let (first, hit) = cache.size(1200.0, 824.0, 4).unwrap();
        assert!(!hit);
        let (second, hit) = cache.size(1200.0, 824.0, 4).unwrap();
        assert!(hit);
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);

        let (_, hit) = cache.size(824.0, 1200.0, 4).unwrap();
        assert!(!hit);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_clears_once_full() {
        let mut cache = SizingCache::new(sizer());
        for step in 0..=CACHE_CAPACITY {
            let (_, hit) = cache.size(800.0 + step as f32, 600.0, 3).unwrap();
            assert!(!hit);
        }
        assert_eq!(cache.len(), 1);

        let (_, hit) = cache.size(800.0 + CACHE_CAPACITY as f32, 600.0, 3).unwrap();
        assert!(hit);
        let (_, hit) = cache.size(800.0, 600.0, 3).unwrap();
        assert!(!hit);
    }
}
