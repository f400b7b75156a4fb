//! The per-decision context handed to a tree.

use pt_agent::{ParticleHandle, ParticleStore};
use pt_core::{ParticleId, ParticleKind, SimRng, Vec2};
use pt_spatial::QuadTree;

/// A visible neighbor and its squared distance at the time it was collected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub handle: ParticleHandle,
    pub dist_sq: f32,
}

impl Neighbor {
    #[inline]
    pub fn id(&self) -> ParticleId {
        self.handle.id
    }
}

/// Everything a tree may read or change while it decides for one particle.
///
/// Built fresh by the scheduler for every decision and borrowed for a single
/// `start` / `resume` call.  Nodes cannot keep it: every field that points
/// into the world is a borrow.
///
/// `neighbors` is sorted by ascending distance and never contains the
/// deciding particle itself or anything that was dead when it was collected.
/// Filters may narrow it for their subtree; they restore it afterwards.
pub struct DecisionContext<'a> {
    pub particles: &'a mut ParticleStore,
    /// Spatial index of the particles alive at the start of this tick.
    pub index: &'a QuadTree<ParticleHandle>,
    pub rng: &'a mut SimRng,
    pub entity: ParticleId,
    pub neighbors: Vec<Neighbor>,
    /// Simulated seconds since this particle's previous decision.
    pub dt: f32,
}

impl<'a> DecisionContext<'a> {
    #[inline]
    pub fn new(
        particles: &'a mut ParticleStore,
        index:     &'a QuadTree<ParticleHandle>,
        rng:       &'a mut SimRng,
        entity:    ParticleId,
        neighbors: Vec<Neighbor>,
        dt:        f32,
    ) -> Self {
        Self { particles, index, rng, entity, neighbors, dt }
    }

    /// Slot index of the deciding particle.
    #[inline]
    pub fn me(&self) -> usize {
        self.entity.index()
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.particles.position[self.me()]
    }

    /// `true` if `n` still refers to the same living particle it did when
    /// the neighbor list was built.
    #[inline]
    pub fn is_live(&self, n: &Neighbor) -> bool {
        self.particles.is_current(n.handle)
    }

    #[inline]
    pub fn kind_of(&self, n: &Neighbor) -> ParticleKind {
        self.particles.kind[n.id().index()]
    }

    /// Point the particle's desired velocity at `target` at full speed.
    pub fn head_towards(&mut self, target: Vec2) {
        let me = self.me();
        let dir = (target - self.particles.position[me]).normalize_or_zero();
        self.particles.velocity[me] = dir * self.particles.speed[me];
    }

    /// Query the index for everything within `radius` of the deciding
    /// particle, excluding itself and anything no longer alive.
    pub fn neighbors_within_radius(&self, radius: f32) -> Vec<Neighbor> {
        let mut out = Vec::new();
        collect_neighbors(self.particles, self.index, self.entity, radius, &mut out);
        out
    }
}

/// Fill `out` with the live neighbors of `id` within `radius`, sorted by
/// ascending squared distance.  `out` is cleared first.
pub fn collect_neighbors(
    particles: &ParticleStore,
    index:     &QuadTree<ParticleHandle>,
    id:        ParticleId,
    radius:    f32,
    out:       &mut Vec<Neighbor>,
) {
    out.clear();
    let center = particles.position[id.index()];
    index.for_each_in_circle(center, radius, |handle, dist_sq| {
        if handle.id != id && particles.is_current(handle) {
            out.push(Neighbor { handle, dist_sq });
        }
    });
    out.sort_by(|a, b| a.dist_sq.total_cmp(&b.dist_sq));
}
