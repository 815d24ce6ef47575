use core::fmt;

use crate::Grid;

/// Tuning values handed unchanged to every worker's transform call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub sigma: f32,
    pub k: f32,
    pub min_size: u32,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            k: 16.0,
            min_size: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform failed: {}", self.message)
    }
}

impl std::error::Error for TransformError {}

/// A per-band pixel transform.
///
/// Implementations must be deterministic, preserve the band's shape and
/// format, and read only the rows they are given — the pipeline never
/// provides halo rows from neighboring bands.
pub trait Transform: Send + Sync {
    fn apply(&self, band: &Grid, params: &TransformParams) -> Result<Grid, TransformError>;
}

/// Passes the band through untouched. Useful for exercising the
/// distribution path in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn apply(&self, band: &Grid, _params: &TransformParams) -> Result<Grid, TransformError> {
        Ok(band.clone())
    }
}
