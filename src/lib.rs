//! Layout core for a Metro-style dashboard of fixed-size tiles.
//!
//! A grid template (rows of area ids) is resolved into rectangular regions,
//! sized against the viewport, composed into absolute placements and checked
//! against the widget registry. Visual content is left to the host's
//! renderers; this crate decides where a tile goes, how big it is and
//! whether its widget variant supports that size.

pub mod builtin;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod preview;
pub mod registry;
pub mod spec;

pub use config::{ConfigError, DashboardConfig, TileConfig};
pub use dashboard::{Dashboard, DiagnosticTile, LayoutPass, TileOutcome};
pub use error::{DashboardError, Result};
pub use geometry::{Extent, Frame, GridRect, TileSize};
pub use layout::{
    GridSettings, Placement, Region, ResolveError, ResolveFailure, ResponsiveGridSizer,
    SizingCache, SizingError, SizingParams, compose, content_size, resolve,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use preview::grid_preview;
pub use registry::{
    RegistryError, RenderContext, RenderReady, TileContent, TileRenderer, WidgetDescriptor,
    WidgetRegistry, WidgetRegistryBuilder,
};
pub use spec::{LayoutSpec, PLACEHOLDER, StructuralError, TileDefinition, TileId};
