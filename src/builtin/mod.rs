//! Stock widget catalogue.
//!
//! The concrete clock, weather, calendar, todo and news visuals live in the
//! host application. This module only declares which sizes each variant
//! accepts and registers a [`LabelRenderer`] so a dashboard built from the
//! stock catalogue renders something before real renderers are plugged in.

use std::sync::Arc;

use crate::geometry::TileSize;
use crate::layout::Placement;
use crate::registry::{
    RenderContext, TileContent, TileRenderer, WidgetDescriptor, WidgetRegistryBuilder,
};
use crate::spec::TileDefinition;

const fn size(columns: u16, rows: u16) -> TileSize {
    TileSize::new(columns, rows)
}

/// `(type, variant, supported sizes, default size)` for every stock widget.
pub const CATALOGUE: &[(&str, &str, &[TileSize], TileSize)] = &[
    ("clock", "simple", &[size(1, 1), size(2, 1)], size(1, 1)),
    ("clock", "standard", &[size(2, 1), size(2, 2)], size(2, 2)),
    ("clock", "detailed", &[size(2, 2), size(4, 2)], size(4, 2)),
    ("weather", "compact", &[size(1, 1), size(2, 1)], size(1, 1)),
    ("weather", "standard", &[size(2, 2), size(2, 1)], size(2, 2)),
    ("weather", "detailed", &[size(4, 2), size(4, 4)], size(4, 2)),
    ("calendar", "standard", &[size(2, 2)], size(2, 2)),
    ("calendar", "agenda", &[size(2, 4), size(4, 2), size(4, 4)], size(4, 2)),
    ("todo", "standard", &[size(2, 2), size(2, 4)], size(2, 2)),
    ("news", "standard", &[size(4, 2), size(4, 4)], size(4, 2)),
    ("news", "headline", &[size(2, 1), size(4, 1)], size(4, 1)),
];

/// Placeholder renderer: the widget key, its span and its frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRenderer;

impl TileRenderer for LabelRenderer {
    fn render(
        &self,
        tile: &TileDefinition,
        placement: &Placement,
        _ctx: &RenderContext<'_>,
    ) -> TileContent {
        let frame = placement.frame;
        format!(
            "{} [{}] {:.0}x{:.0}+{:.0}+{:.0}",
            tile.key(),
            placement.span,
            frame.width,
            frame.height,
            frame.x,
            frame.y
        )
    }
}

/// Register every stock widget with a shared [`LabelRenderer`].
pub fn register_defaults(builder: &mut WidgetRegistryBuilder) {
    let renderer: Arc<dyn TileRenderer> = Arc::new(LabelRenderer);
    for &(kind, variant, sizes, default_size) in CATALOGUE {
        builder.register(WidgetDescriptor::with_shared_renderer(
            kind,
            variant,
            sizes.iter().copied(),
            default_size,
            Arc::clone(&renderer),
        ));
    }
}
