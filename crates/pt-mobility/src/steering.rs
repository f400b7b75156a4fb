//! Steering maths.  Pure functions over the particle store; nothing here
//! moves a particle.

use pt_agent::ParticleStore;
use pt_behavior::Neighbor;
use pt_core::{ParticleId, ParticleKind, Vec2};

/// Weight of the desired direction relative to the unit separation push.
pub const DESIRED_WEIGHT: f32 = 3.0;

/// Unit vector pointing away from every same-team cell crowding `id`, or
/// zero if nobody is too close.
///
/// A neighbor crowds the particle when `dist² < size² + other_size²`.
/// `neighbors` is the list collected for this tick; entries that died since
/// then are skipped.
pub fn separation(store: &ParticleStore, id: ParticleId, neighbors: &[Neighbor]) -> Vec2 {
    let me = id.index();
    let at = store.position[me];
    let size_sq = store.size[me] * store.size[me];

    let push = neighbors
        .iter()
        .filter(|n| store.is_current(n.handle))
        .map(|n| n.id().index())
        .filter(|&o| store.kind[o] == ParticleKind::Cell && store.team[o] == store.team[me])
        .filter(|&o| at.dist_sq(store.position[o]) < size_sq + store.size[o] * store.size[o])
        .fold(Vec2::ZERO, |sum, o| sum + (at - store.position[o]));
    push.normalize_or_zero()
}

/// Direction of travel: the desired velocity scaled by `1 / speed`,
/// weighted by [`DESIRED_WEIGHT`], plus `push`, normalised.
///
/// Zero when the particle cannot move or nothing pulls it anywhere.
pub fn heading(velocity: Vec2, speed: f32, push: Vec2) -> Vec2 {
    if speed <= 0.0 {
        return Vec2::ZERO;
    }
    (velocity * (DESIRED_WEIGHT / speed) + push).normalize_or_zero()
}
