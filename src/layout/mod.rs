//! Layout module orchestrator.
//!
//! Resolution, sizing and composition are independent pure steps; the
//! dashboard pipeline chains them, but each can be driven on its own.

mod compositor;
mod resolver;
mod sizing;

pub use compositor::{Placement, compose, content_size};
pub use resolver::{Region, ResolveError, ResolveFailure, resolve};
pub use sizing::{
    DEFAULT_GAP, DEFAULT_MAX_COLUMNS, DEFAULT_MIN_COLUMNS, GridSettings, ResponsiveGridSizer,
    SizingCache, SizingError, SizingParams,
};
