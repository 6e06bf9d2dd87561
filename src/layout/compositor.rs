use serde::Serialize;

use crate::geometry::{Extent, Frame, TileSize};
use crate::layout::resolver::Region;
use crate::layout::sizing::SizingParams;
use crate::spec::{TileDefinition, TileId};

/// A region translated into viewport units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: TileId,
    pub frame: Frame,
    /// Logical span in cells, compared against widget supported sizes.
    pub span: TileSize,
    pub tile: TileDefinition,
}

/// Translate resolved regions into absolute placements, one per region.
///
/// Offsets are `index * (cell + gap)` on both axes: the first row and column
/// sit at 0 and each later index adds one whole `cell + gap` stride.
pub fn compose(regions: &[Region], sizing: &SizingParams) -> Vec<Placement> {
    let stride = sizing.stride();
    regions
        .iter()
        .map(|region| {
            let extent = sizing.tile_extent(region.rect.size());
            Placement {
                id: region.id.clone(),
                frame: Frame::new(
                    region.rect.x as f32 * stride,
                    region.rect.y as f32 * stride,
                    extent.width,
                    extent.height,
                ),
                span: region.rect.size(),
                tile: region.tile.clone(),
            }
        })
        .collect()
}

/// Size of the container needed for `sizing.columns` by `rows` cells.
pub fn content_size(sizing: &SizingParams, rows: u16) -> Extent {
    Extent::new(sizing.tile_width(sizing.columns), sizing.tile_height(rows))
}
