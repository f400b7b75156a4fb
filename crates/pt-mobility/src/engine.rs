//! Per-tick movement of one particle.

use pt_agent::ParticleStore;
use pt_behavior::Neighbor;
use pt_core::{ParticleId, Rect, Vec2};

use crate::{MobilityError, MobilityResult, heading, separation};

/// Moves particles inside a toroidal world.
#[derive(Copy, Clone, Debug)]
pub struct MobilityEngine {
    bounds: Rect,
}

impl MobilityEngine {
    pub fn new(bounds: Rect) -> MobilityResult<Self> {
        if !bounds.is_valid() {
            return Err(MobilityError::InvalidBounds(bounds));
        }
        Ok(Self { bounds })
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Advance `id` by one tick of `dt` seconds and return its new position.
    ///
    /// Immobile particles (speed ≤ 0) stay where they are.  The result is
    /// always inside the bounds.
    pub fn step(
        &self,
        store:     &mut ParticleStore,
        id:        ParticleId,
        neighbors: &[Neighbor],
        dt:        f32,
    ) -> MobilityResult<Vec2> {
        if !store.is_alive(id) {
            return Err(MobilityError::NotAlive(id));
        }
        let i = id.index();
        let speed = store.speed[i];
        if speed <= 0.0 {
            return Ok(store.position[i]);
        }

        let push = separation(store, id, neighbors);
        let dir = heading(store.velocity[i], speed, push);
        let next = self.bounds.wrap(store.position[i] + dir * (speed * dt));
        store.position[i] = next;
        Ok(next)
    }
}
