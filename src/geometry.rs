use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical tile size measured in grid cells.
///
/// This is the single `(columns, rows)` ordering used for every size
/// comparison in the crate: `columns` is the horizontal span (width) and
/// `rows` the vertical span (height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileSize {
    pub columns: u16,
    pub rows: u16,
}

impl TileSize {
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Rectangle anchored within the logical cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl GridRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, gx: u16, gy: u16) -> bool {
        gx >= self.x && gx < self.right() && gy >= self.y && gy < self.bottom()
    }

    pub fn size(&self) -> TileSize {
        TileSize::new(self.width, self.height)
    }
}

/// Absolute rectangle in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Width/height pair in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = GridRect::new(1, 2, 2, 3);
        assert!(rect.contains(1, 2));
        assert!(rect.contains(2, 4));
        assert!(!rect.contains(3, 2));
        assert!(!rect.contains(1, 5));
        assert!(!rect.contains(0, 2));
    }

    #[test]
    fn size_is_columns_then_rows() {
        let rect = GridRect::new(0, 0, 4, 2);
        assert_eq!(rect.size(), TileSize::new(4, 2));
        assert_ne!(rect.size(), TileSize::new(2, 4));
        assert_eq!(rect.size().to_string(), "4x2");
    }
}
