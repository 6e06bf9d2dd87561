//! Declarative layout input.
//!
//! A [`LayoutSpec`] is the validated, immutable form of a dashboard's grid
//! template. Structural problems (wrong row or token counts, blank tile
//! fields) are rejected here so the resolver only ever sees well-formed grids.

mod core;

pub use core::{LayoutSpec, PLACEHOLDER, StructuralError, TileDefinition, TileId};
