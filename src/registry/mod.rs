//! Widget registry.
//!
//! Widgets are registered on a [`WidgetRegistryBuilder`] during startup and
//! sealed into a read-only [`WidgetRegistry`] before any lookup happens.

mod core;

pub use core::{
    RegistryError, RenderContext, RenderReady, TileContent, TileRenderer, WidgetDescriptor,
    WidgetRegistry, WidgetRegistryBuilder,
};
