use pt_agent::StoreError;
use pt_behavior::BehaviorError;
use pt_core::PtError;
use pt_mobility::MobilityError;
use pt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] PtError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("particle pool error: {0}")]
    Store(#[from] StoreError),

    #[error("movement error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
