use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a dashboard over its lifetime.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    resolutions: u64,
    resolution_failures: u64,
    layout_passes: u64,
    sizing_cache_hits: u64,
    tiles_rendered: u64,
    diagnostic_tiles: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolution(&mut self, succeeded: bool) {
        self.resolutions = self.resolutions.saturating_add(1);
        if !succeeded {
            self.resolution_failures = self.resolution_failures.saturating_add(1);
        }
    }

    pub fn record_layout_pass(&mut self, cache_hit: bool) {
        self.layout_passes = self.layout_passes.saturating_add(1);
        if cache_hit {
            self.sizing_cache_hits = self.sizing_cache_hits.saturating_add(1);
        }
    }

    pub fn record_tiles(&mut self, rendered: usize, diagnostics: usize) {
        self.tiles_rendered = self.tiles_rendered.saturating_add(rendered as u64);
        self.diagnostic_tiles = self.diagnostic_tiles.saturating_add(diagnostics as u64);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            resolutions: self.resolutions,
            resolution_failures: self.resolution_failures,
            layout_passes: self.layout_passes,
            sizing_cache_hits: self.sizing_cache_hits,
            tiles_rendered: self.tiles_rendered,
            diagnostic_tiles: self.diagnostic_tiles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub resolutions: u64,
    pub resolution_failures: u64,
    pub layout_passes: u64,
    pub sizing_cache_hits: u64,
    pub tiles_rendered: u64,
    pub diagnostic_tiles: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("resolutions".to_string(), json!(self.resolutions));
        map.insert(
            "resolution_failures".to_string(),
            json!(self.resolution_failures),
        );
        map.insert("layout_passes".to_string(), json!(self.layout_passes));
        map.insert(
            "sizing_cache_hits".to_string(),
            json!(self.sizing_cache_hits),
        );
        map.insert("tiles_rendered".to_string(), json!(self.tiles_rendered));
        map.insert("diagnostic_tiles".to_string(), json!(self.diagnostic_tiles));
        map
    }
}
