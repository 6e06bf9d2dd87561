use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use thiserror::Error;

use crate::geometry::TileSize;
use crate::layout::{Placement, SizingParams};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::spec::TileDefinition;

const LOG_TARGET: &str = "metro_grid::registry";

/// Rendered payload produced for a tile.
pub type TileContent = String;

/// Read-only data threaded through every renderer call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub sizing: SizingParams,
    /// Application state supplied by the host.
    pub state: &'a Value,
}

/// Produces the visual content of one widget variant.
pub trait TileRenderer: Send + Sync {
    fn render(
        &self,
        tile: &TileDefinition,
        placement: &Placement,
        ctx: &RenderContext<'_>,
    ) -> TileContent;
}

impl<F> TileRenderer for F
where
    F: Fn(&TileDefinition, &Placement, &RenderContext<'_>) -> TileContent + Send + Sync,
{
    fn render(
        &self,
        tile: &TileDefinition,
        placement: &Placement,
        ctx: &RenderContext<'_>,
    ) -> TileContent {
        self(tile, placement, ctx)
    }
}

/// Capability record for one `(type, variant)` pair.
#[derive(Clone)]
pub struct WidgetDescriptor {
    kind: String,
    variant: String,
    supported_sizes: BTreeSet<TileSize>,
    default_size: TileSize,
    renderer: Arc<dyn TileRenderer>,
}

impl WidgetDescriptor {
    pub fn new<R>(
        kind: impl Into<String>,
        variant: impl Into<String>,
        supported_sizes: impl IntoIterator<Item = TileSize>,
        default_size: TileSize,
        renderer: R,
    ) -> Self
    where
        R: TileRenderer + 'static,
    {
        Self::with_shared_renderer(
            kind,
            variant,
            supported_sizes,
            default_size,
            Arc::new(renderer),
        )
    }

    pub fn with_shared_renderer(
        kind: impl Into<String>,
        variant: impl Into<String>,
        supported_sizes: impl IntoIterator<Item = TileSize>,
        default_size: TileSize,
        renderer: Arc<dyn TileRenderer>,
    ) -> Self {
        Self {
            kind: kind.into(),
            variant: variant.into(),
            supported_sizes: supported_sizes.into_iter().collect(),
            default_size,
            renderer,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn key(&self) -> String {
        registry_key(&self.kind, &self.variant)
    }

    pub fn supported_sizes(&self) -> &BTreeSet<TileSize> {
        &self.supported_sizes
    }

    pub fn default_size(&self) -> TileSize {
        self.default_size
    }

    pub fn supports(&self, size: TileSize) -> bool {
        self.supported_sizes.contains(&size)
    }
}

impl fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("kind", &self.kind)
            .field("variant", &self.variant)
            .field("supported_sizes", &self.supported_sizes)
            .field("default_size", &self.default_size)
            .finish_non_exhaustive()
    }
}

fn registry_key(kind: &str, variant: &str) -> String {
    format!("{kind}:{variant}")
}

fn format_sizes(sizes: &[TileSize]) -> String {
    sizes
        .iter()
        .map(TileSize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons a placement cannot be rendered by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no widget registered for `{kind}:{variant}`")]
    UnknownVariant { kind: String, variant: String },
    #[error("widget `{kind}:{variant}` declares no supported sizes")]
    RegistryConfig { kind: String, variant: String },
    #[error(
        "widget `{kind}:{variant}` does not support size {requested}; supported: {}",
        format_sizes(.supported)
    )]
    SizeMismatch {
        kind: String,
        variant: String,
        requested: TileSize,
        supported: Vec<TileSize>,
    },
}

impl RegistryError {
    /// Short label for diagnostic output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnknownVariant { .. } => "unknown_variant",
            Self::RegistryConfig { .. } => "registry_config",
            Self::SizeMismatch { .. } => "size_mismatch",
        }
    }

    pub fn diagnostic_fields(&self) -> Vec<(String, Value)> {
        match self {
            Self::UnknownVariant { kind, variant } | Self::RegistryConfig { kind, variant } => {
                vec![json_str("widget", registry_key(kind, variant))]
            }
            Self::SizeMismatch {
                kind,
                variant,
                requested,
                supported,
            } => vec![
                json_str("widget", registry_key(kind, variant)),
                json_str("requested", requested.to_string()),
                json_kv(
                    "supported",
                    json!(supported.iter().map(TileSize::to_string).collect::<Vec<_>>()),
                ),
            ],
        }
    }
}

/// Registration phase of the widget registry.
///
/// Descriptors can only be looked up after [`seal`](Self::seal) converts the
/// builder into an immutable [`WidgetRegistry`].
#[derive(Debug, Default)]
pub struct WidgetRegistryBuilder {
    entries: HashMap<String, WidgetDescriptor>,
    logger: Option<Logger>,
}

impl WidgetRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Insert a descriptor under `type:variant`.
    ///
    /// An existing descriptor with the same key is replaced and returned.
    pub fn register(&mut self, descriptor: WidgetDescriptor) -> Option<WidgetDescriptor> {
        let key = descriptor.key();
        let replaced = self.entries.insert(key.clone(), descriptor);
        if replaced.is_some() {
            if let Some(logger) = &self.logger {
                let event = event_with_fields(
                    LogLevel::Warn,
                    LOG_TARGET,
                    "descriptor_replaced",
                    [json_str("widget", key)],
                );
                let _ = logger.log_event(event);
            }
        }
        replaced
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn seal(self) -> WidgetRegistry {
        WidgetRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable widget lookup table.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    entries: HashMap<String, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn builder() -> WidgetRegistryBuilder {
        WidgetRegistryBuilder::new()
    }

    pub fn lookup(&self, kind: &str, variant: &str) -> Result<&WidgetDescriptor, RegistryError> {
        self.entries
            .get(&registry_key(kind, variant))
            .ok_or_else(|| RegistryError::UnknownVariant {
                kind: kind.to_string(),
                variant: variant.to_string(),
            })
    }

    /// Check that `placement` names a registered widget at a supported size.
    ///
    /// Sizes compare as exact `(columns, rows)` pairs; a transposed pair is a
    /// mismatch.
    pub fn validate<'a>(
        &'a self,
        placement: &'a Placement,
    ) -> Result<RenderReady<'a>, RegistryError> {
        let tile = &placement.tile;
        let descriptor = self.lookup(tile.kind(), tile.variant())?;

        if descriptor.supported_sizes.is_empty() {
            return Err(RegistryError::RegistryConfig {
                kind: descriptor.kind.clone(),
                variant: descriptor.variant.clone(),
            });
        }

        if !descriptor.supports(placement.span) {
            return Err(RegistryError::SizeMismatch {
                kind: descriptor.kind.clone(),
                variant: descriptor.variant.clone(),
                requested: placement.span,
                supported: descriptor.supported_sizes.iter().copied().collect(),
            });
        }

        Ok(RenderReady {
            descriptor,
            placement,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// A placement that passed validation, paired with its descriptor.
#[derive(Debug, Clone, Copy)]
pub struct RenderReady<'a> {
    pub descriptor: &'a WidgetDescriptor,
    pub placement: &'a Placement,
}

impl RenderReady<'_> {
    pub fn render(&self, ctx: &RenderContext<'_>) -> TileContent {
        self.descriptor
            .renderer
            .render(&self.placement.tile, self.placement, ctx)
    }
}
