//! Grid-template area resolution.
//!
//! Turns the tokenized template of a [`LayoutSpec`] into one [`Region`] per
//! named area. Every area is checked for rectangularity and for a matching
//! tile definition; problems are collected across the whole grid and
//! returned together instead of stopping at the first one.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::geometry::GridRect;
use crate::spec::{LayoutSpec, PLACEHOLDER, TileDefinition, TileId};

/// A validated rectangular placement of one area id in the logical grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: TileId,
    pub rect: GridRect,
    pub tile: TileDefinition,
}

impl Region {
    pub fn contains(&self, gx: u16, gy: u16) -> bool {
        self.rect.contains(gx, gy)
    }
}

/// A problem with one named area.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("area `{0}` does not form a filled rectangle")]
    NotRectangular(TileId),
    #[error("area `{0}` has no tile definition")]
    TileNotDefined(TileId),
}

impl ResolveError {
    pub fn id(&self) -> &str {
        match self {
            Self::NotRectangular(id) | Self::TileNotDefined(id) => id,
        }
    }
}

/// Every error found during one resolution pass, in area discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ResolveFailure {
    pub errors: Vec<ResolveError>,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout resolution failed with {} error(s)", self.errors.len())?;
        for (idx, err) in self.errors.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{sep}{err}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Bounds {
    fn at(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    // LayoutSpec dimensions are u16, so every index fits.
    fn to_rect(self) -> GridRect {
        GridRect::new(
            self.min_x as u16,
            self.min_y as u16,
            (self.max_x - self.min_x + 1) as u16,
            (self.max_y - self.min_y + 1) as u16,
        )
    }
}

/// Resolve every named area of `spec` into a [`Region`].
///
/// Regions come back in row-major first-seen order, so identical input always
/// yields identical output.
pub fn resolve(spec: &LayoutSpec) -> Result<Vec<Region>, ResolveFailure> {
    let cells = spec.cells();
    let discovered = discover(&cells);

    let mut regions = Vec::with_capacity(discovered.len());
    let mut errors = Vec::new();

    for (id, bounds) in discovered {
        let rectangular = is_filled(&cells, id, bounds);
        if !rectangular {
            errors.push(ResolveError::NotRectangular(id.to_string()));
        }

        match spec.tile(id) {
            None => errors.push(ResolveError::TileNotDefined(id.to_string())),
            Some(tile) if rectangular => regions.push(Region {
                id: id.to_string(),
                rect: bounds.to_rect(),
                tile: tile.clone(),
            }),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(regions)
    } else {
        Err(ResolveFailure { errors })
    }
}

/// Distinct non-placeholder ids with their bounding boxes, in first-seen order.
fn discover<'a>(cells: &[Vec<&'a str>]) -> Vec<(&'a str, Bounds)> {
    let mut order: Vec<(&'a str, Bounds)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for (y, row) in cells.iter().enumerate() {
        for (x, &token) in row.iter().enumerate() {
            if token == PLACEHOLDER {
                continue;
            }
            match index.get(token) {
                Some(&slot) => order[slot].1.include(x, y),
                None => {
                    index.insert(token, order.len());
                    order.push((token, Bounds::at(x, y)));
                }
            }
        }
    }

    order
}

fn is_filled(cells: &[Vec<&str>], id: &str, bounds: Bounds) -> bool {
    cells[bounds.min_y..=bounds.max_y]
        .iter()
        .all(|row| row[bounds.min_x..=bounds.max_x].iter().all(|&cell| cell == id))
}
