use thiserror::Error;

use pt_core::ParticleId;

/// Pool misuse.  Each of these is a logic error in the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} is not a slot of this store")]
    OutOfRange(ParticleId),

    #[error("{0} is already dead")]
    AlreadyDead(ParticleId),

    #[error("{0} is dead and cannot be re-initialised in place")]
    NotAlive(ParticleId),
}

pub type StoreResult<T> = Result<T, StoreError>;
