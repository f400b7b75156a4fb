//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `PtError` as one variant
//! where they need to surface configuration problems from this crate.

use thiserror::Error;

use crate::ParticleId;

/// The top-level error type for `pt-core`.
#[derive(Debug, Error)]
pub enum PtError {
    #[error("particle {0} not found")]
    ParticleNotFound(ParticleId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `pt-core`.
pub type PtResult<T> = Result<T, PtError>;
