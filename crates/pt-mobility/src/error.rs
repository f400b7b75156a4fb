use pt_core::{ParticleId, Rect};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("particle {0} is not alive")]
    NotAlive(ParticleId),

    #[error("world bounds {0} are empty or not finite")]
    InvalidBounds(Rect),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
