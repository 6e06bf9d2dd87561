//! Dashboard pipeline.
//!
//! A [`Dashboard`] owns the current [`LayoutSpec`] and its resolved regions,
//! and turns a viewport into placements and, with application state, into
//! per-tile render outcomes. Sizing errors abort a pass; registry errors
//! become [`DiagnosticTile`]s that keep the geometry of the requested tile.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::geometry::Extent;
use crate::layout::{
    GridSettings, Placement, Region, ResolveFailure, ResponsiveGridSizer, SizingCache,
    SizingParams, compose, content_size, resolve,
};
use crate::logging::{LogEvent, LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::preview::grid_preview;
use crate::registry::{RegistryError, RenderContext, TileContent, WidgetRegistry};
use crate::spec::LayoutSpec;

const LOG_TARGET: &str = "metro_grid::dashboard";
const METRICS_TARGET: &str = "metro_grid::dashboard.metrics";

/// Geometry of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPass {
    pub sizing: SizingParams,
    pub content_size: Extent,
    pub placements: Vec<Placement>,
}

/// Placeholder shown in place of a tile the registry rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticTile {
    pub placement: Placement,
    pub error: RegistryError,
}

impl DiagnosticTile {
    pub fn kind(&self) -> &'static str {
        self.error.kind_name()
    }

    pub fn label(&self) -> String {
        format!("{} ({}): {}", self.placement.id, self.kind(), self.error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    Rendered {
        placement: Placement,
        content: TileContent,
    },
    Diagnostic(DiagnosticTile),
}

impl TileOutcome {
    pub fn placement(&self) -> &Placement {
        match self {
            Self::Rendered { placement, .. } => placement,
            Self::Diagnostic(tile) => &tile.placement,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }
}

pub struct Dashboard {
    spec: LayoutSpec,
    fingerprint: blake3::Hash,
    regions: Vec<Region>,
    registry: Arc<WidgetRegistry>,
    sizing: SizingCache,
    logger: Option<Logger>,
    metrics: LayoutMetrics,
    started: Instant,
}

impl Dashboard {
    pub fn new(
        spec: LayoutSpec,
        registry: Arc<WidgetRegistry>,
        settings: GridSettings,
    ) -> Result<Self> {
        Self::build(spec, registry, settings, None)
    }

    pub fn with_logger(
        spec: LayoutSpec,
        registry: Arc<WidgetRegistry>,
        settings: GridSettings,
        logger: Logger,
    ) -> Result<Self> {
        Self::build(spec, registry, settings, Some(logger))
    }

    /// Build from a loaded configuration, using its grid settings.
    pub fn from_config(
        config: &DashboardConfig,
        registry: Arc<WidgetRegistry>,
        logger: Option<Logger>,
    ) -> Result<Self> {
        let spec = config.to_spec()?;
        Self::build(spec, registry, config.grid, logger)
    }

    fn build(
        spec: LayoutSpec,
        registry: Arc<WidgetRegistry>,
        settings: GridSettings,
        logger: Option<Logger>,
    ) -> Result<Self> {
        let mut metrics = LayoutMetrics::new();
        let regions = resolve_recorded(&spec, &mut metrics, logger.as_ref())?;

        Ok(Self {
            fingerprint: spec.fingerprint(),
            spec,
            regions,
            registry,
            sizing: SizingCache::new(ResponsiveGridSizer::new(settings)),
            logger,
            metrics,
            started: Instant::now(),
        })
    }

    /// Replace the whole layout spec.
    ///
    /// Returns `Ok(false)` when `spec` has the same fingerprint as the current
    /// one. If the new spec fails to resolve, the current one stays active.
    pub fn replace_spec(&mut self, spec: LayoutSpec) -> Result<bool> {
        let fingerprint = spec.fingerprint();
        if fingerprint == self.fingerprint {
            self.emit(LogEvent::new(LogLevel::Debug, LOG_TARGET, "spec_unchanged"));
            return Ok(false);
        }

        let regions = resolve_recorded(&spec, &mut self.metrics, self.logger.as_ref())?;
        self.spec = spec;
        self.fingerprint = fingerprint;
        self.regions = regions;
        Ok(true)
    }

    /// Size the grid for the viewport and place every region.
    pub fn layout(&mut self, width: f32, height: f32) -> Result<LayoutPass> {
        let rows = self.spec.rows();
        let (sizing, cache_hit) = match self.sizing.size(width, height, rows) {
            Ok(sized) => sized,
            Err(err) => {
                self.emit(event_with_fields(
                    LogLevel::Error,
                    LOG_TARGET,
                    "sizing_failed",
                    [json_str("error", err.to_string())],
                ));
                return Err(err.into());
            }
        };
        self.metrics.record_layout_pass(cache_hit);

        if self.spec.columns() > sizing.columns {
            self.emit(event_with_fields(
                LogLevel::Warn,
                LOG_TARGET,
                "viewport_narrower_than_layout",
                [
                    json_kv("layout_columns", self.spec.columns()),
                    json_kv("viewport_columns", sizing.columns),
                ],
            ));
        }

        let placements = compose(&self.regions, &sizing);
        let pass = LayoutPass {
            sizing,
            content_size: content_size(&sizing, rows),
            placements,
        };

        self.emit(event_with_fields(
            LogLevel::Debug,
            LOG_TARGET,
            "layout_pass",
            [
                json_kv("width", width),
                json_kv("height", height),
                json_kv("cell", sizing.base_cell_size),
                json_kv("columns", sizing.columns),
                json_kv("cache_hit", cache_hit),
            ],
        ));
        Ok(pass)
    }

    /// Lay out the viewport and render every tile against `state`.
    ///
    /// Tiles the registry rejects come back as diagnostics; only sizing
    /// errors fail the call.
    pub fn render(&mut self, width: f32, height: f32, state: &Value) -> Result<Vec<TileOutcome>> {
        let pass = self.layout(width, height)?;
        let ctx = RenderContext {
            sizing: pass.sizing,
            state,
        };

        let mut outcomes = Vec::with_capacity(pass.placements.len());
        for placement in pass.placements {
            let rendered = self
                .registry
                .validate(&placement)
                .map(|ready| ready.render(&ctx));
            match rendered {
                Ok(content) => outcomes.push(TileOutcome::Rendered { placement, content }),
                Err(error) => {
                    let mut fields = vec![json_str("id", placement.id.clone())];
                    fields.extend(error.diagnostic_fields());
                    self.emit(event_with_fields(
                        LogLevel::Warn,
                        LOG_TARGET,
                        error.kind_name(),
                        fields,
                    ));
                    outcomes.push(TileOutcome::Diagnostic(DiagnosticTile { placement, error }));
                }
            }
        }

        let diagnostics = outcomes.iter().filter(|o| o.is_diagnostic()).count();
        self.metrics
            .record_tiles(outcomes.len() - diagnostics, diagnostics);
        Ok(outcomes)
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &GridSettings {
        self.sizing.sizer().settings()
    }

    /// Text rendering of the logical grid.
    pub fn preview(&self) -> String {
        grid_preview(&self.spec, None)
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot(self.started.elapsed())
    }

    pub fn emit_metrics(&self) {
        self.emit(self.metrics().to_log_event(METRICS_TARGET));
    }

    fn emit(&self, event: LogEvent) {
        emit(self.logger.as_ref(), event);
    }
}

fn emit(logger: Option<&Logger>, event: LogEvent) {
    if let Some(logger) = logger {
        let _ = logger.log_event(event);
    }
}

fn resolve_recorded(
    spec: &LayoutSpec,
    metrics: &mut LayoutMetrics,
    logger: Option<&Logger>,
) -> Result<Vec<Region>> {
    match resolve(spec) {
        Ok(regions) => {
            metrics.record_resolution(true);
            emit(
                logger,
                event_with_fields(
                    LogLevel::Info,
                    LOG_TARGET,
                    "layout_resolved",
                    [
                        json_kv("columns", spec.columns()),
                        json_kv("rows", spec.rows()),
                        json_kv("regions", regions.len()),
                    ],
                ),
            );
            Ok(regions)
        }
        Err(failure) => {
            metrics.record_resolution(false);
            emit(logger, failure_event(&failure));
            Err(failure.into())
        }
    }
}

fn failure_event(failure: &ResolveFailure) -> LogEvent {
    let errors: Vec<_> = failure.errors.iter().map(|err| err.to_string()).collect();
    event_with_fields(
        LogLevel::Error,
        LOG_TARGET,
        "layout_resolution_failed",
        [
            json_kv("error_count", failure.errors.len()),
            json_kv("errors", json!(errors)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::register_defaults;
    use crate::error::DashboardError;
    use crate::geometry::{Frame, TileSize};
    use crate::layout::{ResolveError, SizingError};
    use crate::logging::MemorySink;
    use crate::spec::TileDefinition;
    use std::collections::BTreeMap;

    fn registry() -> Arc<WidgetRegistry> {
        let mut builder = WidgetRegistry::builder();
        register_defaults(&mut builder);
        Arc::new(builder.seal())
    }

    fn spec(lines: &[&str], tiles: &[(&str, &str, &str)]) -> LayoutSpec {
        let columns = lines[0].split_whitespace().count() as u16;
        let defs: BTreeMap<_, _> = tiles
            .iter()
            .map(|(id, kind, variant)| {
                (id.to_string(), TileDefinition::new(*kind, *variant).unwrap())
            })
            .collect();
        LayoutSpec::new(
            columns,
            lines.len() as u16,
            lines.iter().map(|line| line.to_string()).collect(),
            defs,
        )
        .unwrap()
    }

    fn mixed_spec() -> LayoutSpec {
        spec(
            &["K W W X", ". W W X"],
            &[
                ("K", "clock", "simple"),
                ("W", "weather", "standard"),
                ("X", "stocks", "ticker"),
            ],
        )
    }

    fn dashboard_with_sink() -> (Dashboard, MemorySink) {
        let sink = MemorySink::new();
        let dashboard = Dashboard::with_logger(
            mixed_spec(),
            registry(),
            GridSettings::default(),
            Logger::new(sink.clone()),
        )
        .unwrap();
        (dashboard, sink)
    }

    #[test]
    fn layout_places_every_region() {
        let (mut dashboard, _) = dashboard_with_sink();
        let pass = dashboard.layout(1200.0, 424.0).unwrap();

        assert_eq!(pass.sizing.base_cell_size, 208.0);
        assert_eq!(pass.sizing.columns, 5);
        assert_eq!(pass.placements.len(), dashboard.regions().len());
        assert_eq!(pass.placements[0].frame, Frame::new(0.0, 0.0, 208.0, 208.0));
        assert_eq!(pass.placements[1].frame, Frame::new(216.0, 0.0, 424.0, 424.0));
        assert_eq!(pass.placements[2].frame, Frame::new(648.0, 0.0, 208.0, 424.0));
        assert_eq!(pass.content_size, Extent::new(1072.0, 424.0));
    }

    #[test]
    fn render_turns_registry_errors_into_diagnostics() {
        let (mut dashboard, sink) = dashboard_with_sink();
        let outcomes = dashboard.render(1200.0, 424.0, &json!({})).unwrap();

        assert_eq!(outcomes.len(), 3);
        match &outcomes[0] {
            TileOutcome::Rendered { content, .. } => {
                assert_eq!(content, "clock:simple [1x1] 208x208+0+0")
            }
            other => panic!("expected rendered clock, got {other:?}"),
        }
        assert!(!outcomes[1].is_diagnostic());

        let TileOutcome::Diagnostic(tile) = &outcomes[2] else {
            panic!("expected diagnostic tile");
        };
        assert_eq!(tile.kind(), "unknown_variant");
        assert_eq!(tile.placement.span, TileSize::new(1, 2));
        assert_eq!(
            tile.label(),
            "X (unknown_variant): no widget registered for `stocks:ticker`"
        );

        let warning = sink
            .events()
            .into_iter()
            .find(|event| event.message == "unknown_variant")
            .unwrap();
        assert_eq!(warning.field("widget"), Some(&json!("stocks:ticker")));

        let metrics = dashboard.metrics();
        assert_eq!(metrics.tiles_rendered, 2);
        assert_eq!(metrics.diagnostic_tiles, 1);
    }

    #[test]
    fn size_mismatch_keeps_requested_geometry() {
        let spec = spec(&["K .", "K ."], &[("K", "clock", "simple")]);
        let mut dashboard = Dashboard::new(spec, registry(), GridSettings::default()).unwrap();
        let outcomes = dashboard.render(800.0, 408.0, &Value::Null).unwrap();

        let TileOutcome::Diagnostic(tile) = &outcomes[0] else {
            panic!("expected diagnostic tile");
        };
        assert!(matches!(tile.error, RegistryError::SizeMismatch { .. }));
        assert_eq!(tile.placement.frame.height, 408.0);
    }

    #[test]
    fn unresolvable_spec_is_rejected_up_front() {
        let broken = spec(&["A B", "B A"], &[("A", "clock", "simple")]);
        let err = Dashboard::new(broken, registry(), GridSettings::default())
            .err()
            .unwrap();
        let DashboardError::Resolve(failure) = err else {
            panic!("expected resolve failure");
        };
        assert_eq!(
            failure.errors,
            vec![
                ResolveError::NotRectangular("A".into()),
                ResolveError::NotRectangular("B".into()),
                ResolveError::TileNotDefined("B".into()),
            ]
        );
    }

    #[test]
    fn replace_spec_detects_unchanged_input() {
        let (mut dashboard, sink) = dashboard_with_sink();
        assert!(!dashboard.replace_spec(mixed_spec()).unwrap());
        assert!(sink.messages().contains(&"spec_unchanged".to_string()));

        let next = spec(&["K K", "K K"], &[("K", "clock", "standard")]);
        assert!(dashboard.replace_spec(next).unwrap());
        assert_eq!(dashboard.regions().len(), 1);
        assert_eq!(dashboard.spec().columns(), 2);
    }

    #[test]
    fn replace_spec_sees_control_characters_inside_tile_fields() {
        let first = spec(&["K ."], &[("K", "clock\u{1f}x", "simple")]);
        let second = spec(&["K ."], &[("K", "clock", "x\u{1f}simple")]);
        let mut dashboard = Dashboard::new(first, registry(), GridSettings::default()).unwrap();

        assert!(dashboard.replace_spec(second).unwrap());
        assert_eq!(dashboard.regions()[0].tile.kind(), "clock");
        assert_eq!(dashboard.regions()[0].tile.variant(), "x\u{1f}simple");
    }

    #[test]
    fn failed_replacement_keeps_previous_layout() {
        let (mut dashboard, sink) = dashboard_with_sink();
        let broken = spec(&["Q Q", "Q ."], &[("Q", "clock", "simple")]);
        assert!(matches!(
            dashboard.replace_spec(broken),
            Err(DashboardError::Resolve(_))
        ));
        assert_eq!(dashboard.regions().len(), 3);
        assert_eq!(dashboard.spec(), &mixed_spec());

        let failure = sink
            .events()
            .into_iter()
            .find(|event| event.message == "layout_resolution_failed")
            .unwrap();
        assert_eq!(failure.field("error_count"), Some(&json!(1)));
        assert_eq!(dashboard.metrics().resolution_failures, 1);
    }

    #[test]
    fn sizing_errors_are_fatal() {
        let (mut dashboard, sink) = dashboard_with_sink();
        let err = dashboard.layout(0.0, 400.0).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Sizing(SizingError::InvalidDimensions(_))
        ));
        assert!(sink.messages().contains(&"sizing_failed".to_string()));
    }

    #[test]
    fn repeated_viewports_hit_the_sizing_cache() {
        let (mut dashboard, _) = dashboard_with_sink();
        let first = dashboard.layout(1200.0, 424.0).unwrap();
        let second = dashboard.layout(1200.0, 424.0).unwrap();
        assert_eq!(first, second);

        let metrics = dashboard.metrics();
        assert_eq!(metrics.layout_passes, 2);
        assert_eq!(metrics.sizing_cache_hits, 1);
    }

    #[test]
    fn narrow_viewport_is_reported() {
        let (mut dashboard, sink) = dashboard_with_sink();
        let pass = dashboard.layout(424.0, 1200.0).unwrap();
        assert_eq!(pass.sizing.columns, 2);

        let warning = sink
            .events()
            .into_iter()
            .find(|event| event.message == "viewport_narrower_than_layout")
            .unwrap();
        assert_eq!(warning.field("layout_columns"), Some(&json!(4)));
        assert_eq!(warning.field("viewport_columns"), Some(&json!(2)));
    }

    #[test]
    fn metrics_snapshot_is_logged() {
        let (dashboard, sink) = dashboard_with_sink();
        sink.clear();
        dashboard.emit_metrics();
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, METRICS_TARGET);
        assert_eq!(events[0].field("resolutions"), Some(&json!(1)));
    }

    #[test]
    fn from_config_uses_grid_settings() {
        let config = DashboardConfig::from_json_str(
            r#"{"columns": 2, "rows": 1, "areas": ["K ."],
                "tiles": {"K": {"type": "clock", "variant": "simple"}},
                "grid": {"gap": 0.0}}"#,
        )
        .unwrap();
        let mut dashboard = Dashboard::from_config(&config, registry(), None).unwrap();
        assert_eq!(dashboard.settings().gap, 0.0);

        let pass = dashboard.layout(300.0, 100.0).unwrap();
        assert_eq!(pass.sizing.columns, 3);
        assert_eq!(dashboard.preview(), "K .");
    }
}
