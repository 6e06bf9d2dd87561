use thiserror::Error;

use crate::config::ConfigError;
use crate::layout::{ResolveFailure, SizingError};
use crate::registry::RegistryError;
use crate::spec::StructuralError;

/// Unified result type for the dashboard layout crate.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors surfaced by the layout pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid layout spec: {0}")]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Resolve(#[from] ResolveFailure),
    #[error("grid sizing error: {0}")]
    Sizing(#[from] SizingError),
    #[error("widget registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
