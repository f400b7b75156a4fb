//! Spatial-subsystem error type.

use thiserror::Error;

use pt_core::{Rect, Vec2};

/// Errors produced by `pt-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("point {point} lies outside the index bounds {bounds}")]
    OutOfBounds { point: Vec2, bounds: Rect },

    #[error("quadtree level {depth} is deeper than the maximum of {max_depth}")]
    DepthExceeded { depth: u8, max_depth: u8 },

    #[error("invalid quadtree configuration: {0}")]
    InvalidConfig(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
