//! Core particle storage: `ParticleStore` (SoA data + pool bookkeeping).
//!
//! # Why SoA?
//!
//! The scheduler touches one or two fields of every particle per phase
//! (positions to build the index, energy to age, velocity to move).  Keeping
//! each field in its own `Vec` keeps those scans contiguous:
//!
//! ```ignore
//! let pos = store.position[id.index()];  // O(1), cache-friendly
//! ```
//!
//! Behavior trees are *not* stored here.  `pt-sim` keeps them in a parallel
//! `Vec` so that a tree can be borrowed mutably while the decision context
//! holds `&mut ParticleStore`.

use std::collections::VecDeque;

use tracing::{debug, warn};

use pt_core::{Color, KindProfiles, ParticleId, ParticleKind, TeamId, Vec2};

use crate::{StoreError, StoreResult};

// ── ParticleHandle ────────────────────────────────────────────────────────────

/// One *life* of a particle slot: the slot id plus the generation it had when
/// the handle was taken.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleHandle {
    pub id: ParticleId,
    pub generation: u32,
}

// ── ParticleStore ─────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for every particle slot ever allocated.
///
/// All `pub` `Vec` fields have exactly [`slot_count`](Self::slot_count)
/// elements and are indexed by `ParticleId`.  Values in dead slots are
/// meaningless until the slot is spawned again.
pub struct ParticleStore {
    // ── Identity ──────────────────────────────────────────────────────────
    pub kind: Vec<ParticleKind>,
    pub alive: Vec<bool>,
    /// Bumped on every (re)initialisation of the slot.
    pub generation: Vec<u32>,
    pub team: Vec<TeamId>,

    // ── Kinematics ────────────────────────────────────────────────────────
    pub position: Vec<Vec2>,
    /// Desired velocity set by behaviors; movement blends it with separation.
    pub velocity: Vec<Vec2>,
    pub speed: Vec<f32>,
    pub size: Vec<f32>,

    // ── Metabolism ────────────────────────────────────────────────────────
    pub energy: Vec<f32>,
    pub max_energy: Vec<f32>,
    pub metabolism: Vec<f32>,
    pub food_value: Vec<f32>,
    /// Seconds since the slot was last spawned.
    pub age: Vec<f32>,
    /// Seconds spent in the current kind (drives lifetime transitions).
    pub kind_timer: Vec<f32>,

    // ── Decision-making ───────────────────────────────────────────────────
    pub sight_range: Vec<f32>,
    /// Seconds between two decisions.
    pub decision_interval: Vec<f32>,
    /// Seconds left until the next decision.
    pub decision_timer: Vec<f32>,
    /// Seconds since the previous decision; handed to the tree as `dt`.
    pub since_decision: Vec<f32>,
    /// Food the particle is currently heading for.
    pub food_goal: Vec<Option<ParticleHandle>>,
    /// Prey the particle is currently chasing.
    pub hunt_goal: Vec<Option<ParticleHandle>>,

    // ── Rendering ─────────────────────────────────────────────────────────
    pub color: Vec<Color>,

    // ── Pool bookkeeping ──────────────────────────────────────────────────
    /// Alive particles in the order they are processed each tick.  Dead
    /// entries are dropped by [`reap`](Self::reap).
    population: Vec<ParticleId>,
    /// Dead slots, reused oldest-first.
    free: VecDeque<ParticleId>,
    /// Killed since the last `reap`; still listed in `population`.
    graveyard: Vec<ParticleId>,
    alive_count: usize,
    pool_size: usize,
    profiles: KindProfiles,
}

impl ParticleStore {
    pub(crate) fn new(pool_size: usize, reserve: usize, profiles: KindProfiles) -> Self {
        Self {
            kind: Vec::with_capacity(reserve),
            alive: Vec::with_capacity(reserve),
            generation: Vec::with_capacity(reserve),
            team: Vec::with_capacity(reserve),
            position: Vec::with_capacity(reserve),
            velocity: Vec::with_capacity(reserve),
            speed: Vec::with_capacity(reserve),
            size: Vec::with_capacity(reserve),
            energy: Vec::with_capacity(reserve),
            max_energy: Vec::with_capacity(reserve),
            metabolism: Vec::with_capacity(reserve),
            food_value: Vec::with_capacity(reserve),
            age: Vec::with_capacity(reserve),
            kind_timer: Vec::with_capacity(reserve),
            sight_range: Vec::with_capacity(reserve),
            decision_interval: Vec::with_capacity(reserve),
            decision_timer: Vec::with_capacity(reserve),
            since_decision: Vec::with_capacity(reserve),
            food_goal: Vec::with_capacity(reserve),
            hunt_goal: Vec::with_capacity(reserve),
            color: Vec::with_capacity(reserve),
            population: Vec::with_capacity(reserve),
            free: VecDeque::new(),
            graveyard: Vec::new(),
            alive_count: 0,
            pool_size,
            profiles,
        }
    }

    // ── Sizes ─────────────────────────────────────────────────────────────

    /// Number of slots ever allocated (alive or pooled).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.kind.len()
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// `true` if no particle is alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    #[inline]
    pub fn can_spawn(&self) -> bool {
        self.alive_count < self.pool_size
    }

    /// The per-kind parameter table used by `spawn` / `init_with_type`.
    pub fn profiles(&self) -> &KindProfiles {
        &self.profiles
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Alive particles in processing order.  May still list particles that
    /// died during the current tick until [`reap`](Self::reap) runs.
    #[inline]
    pub fn population(&self) -> &[ParticleId] {
        &self.population
    }

    #[inline]
    pub fn is_alive(&self, id: ParticleId) -> bool {
        self.alive.get(id.index()).copied().unwrap_or(false)
    }

    /// Handle for the current life of `id`.
    #[inline]
    pub fn handle(&self, id: ParticleId) -> ParticleHandle {
        ParticleHandle { id, generation: self.generation[id.index()] }
    }

    /// `true` if `handle` still refers to a living particle in the same life.
    #[inline]
    pub fn is_current(&self, handle: ParticleHandle) -> bool {
        self.is_alive(handle.id) && self.generation[handle.id.index()] == handle.generation
    }

    /// Iterator over alive particles of `kind`, in population order.
    pub fn alive_of_kind(&self, kind: ParticleKind) -> impl Iterator<Item = ParticleId> + '_ {
        self.population
            .iter()
            .copied()
            .filter(move |&id| self.alive[id.index()] && self.kind[id.index()] == kind)
    }

    /// Number of alive particles of `kind`.
    pub fn count_of_kind(&self, kind: ParticleKind) -> usize {
        self.alive_of_kind(kind).count()
    }

    // ── Pool operations ───────────────────────────────────────────────────

    /// Bring a particle of `kind` to life at the origin.
    ///
    /// Reuses the oldest reaped slot if there is one; slots killed since the
    /// last [`reap`](Self::reap) are not reused yet.  Returns `None` when
    /// `pool_size` particles are already alive; callers must handle that.
    pub fn spawn(&mut self, kind: ParticleKind) -> Option<ParticleId> {
        if !self.can_spawn() {
            warn!(alive = self.alive_count, pool_size = self.pool_size, %kind, "particle pool exhausted");
            return None;
        }
        let id = match self.free.pop_front() {
            Some(id) => id,
            None => self.push_slot()?,
        };
        let i = id.index();
        self.alive[i] = true;
        self.position[i] = Vec2::ZERO;
        self.team[i] = TeamId(0);
        self.age[i] = 0.0;
        self.apply_profile(id, kind);
        self.alive_count += 1;
        self.population.push(id);
        debug!(%id, %kind, "spawned");
        Some(id)
    }

    /// Convenience: spawn and place in one call.
    pub fn spawn_at(&mut self, kind: ParticleKind, position: Vec2) -> Option<ParticleId> {
        let id = self.spawn(kind)?;
        self.position[id.index()] = position;
        Some(id)
    }

    /// Mark `id` dead and return its slot to the pool.
    ///
    /// Killing a dead particle is a logic error and is reported as such.
    pub fn kill(&mut self, id: ParticleId) -> StoreResult<()> {
        self.check(id)?;
        let i = id.index();
        if !self.alive[i] {
            return Err(StoreError::AlreadyDead(id));
        }
        self.alive[i] = false;
        self.food_goal[i] = None;
        self.hunt_goal[i] = None;
        self.alive_count -= 1;
        self.graveyard.push(id);
        debug!(%id, kind = %self.kind[i], "killed");
        Ok(())
    }

    /// Re-initialise a living particle in place as `kind`, keeping its
    /// position and team.  Its generation changes, so any behavior tree built
    /// for the previous life is discarded at its next decision.
    pub fn init_with_type(&mut self, id: ParticleId, kind: ParticleKind) -> StoreResult<()> {
        self.check(id)?;
        if !self.alive[id.index()] {
            return Err(StoreError::NotAlive(id));
        }
        debug!(%id, from = %self.kind[id.index()], to = %kind, "re-initialised");
        self.apply_profile(id, kind);
        Ok(())
    }

    /// Drop dead particles from the population order and hand their slots
    /// to the pool.  Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.population.len();
        let alive = &self.alive;
        self.population.retain(|id| alive[id.index()]);
        self.free.extend(self.graveyard.drain(..));
        before - self.population.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn check(&self, id: ParticleId) -> StoreResult<()> {
        if id.index() < self.slot_count() {
            Ok(())
        } else {
            Err(StoreError::OutOfRange(id))
        }
    }

    fn push_slot(&mut self) -> Option<ParticleId> {
        let id = ParticleId::try_from(self.slot_count()).ok()?;
        self.kind.push(ParticleKind::Food);
        self.alive.push(false);
        self.generation.push(0);
        self.team.push(TeamId(0));
        self.position.push(Vec2::ZERO);
        self.velocity.push(Vec2::ZERO);
        self.speed.push(0.0);
        self.size.push(0.0);
        self.energy.push(0.0);
        self.max_energy.push(0.0);
        self.metabolism.push(0.0);
        self.food_value.push(0.0);
        self.age.push(0.0);
        self.kind_timer.push(0.0);
        self.sight_range.push(0.0);
        self.decision_interval.push(0.0);
        self.decision_timer.push(0.0);
        self.since_decision.push(0.0);
        self.food_goal.push(None);
        self.hunt_goal.push(None);
        self.color.push(Color::BLUE);
        Some(id)
    }

    fn apply_profile(&mut self, id: ParticleId, kind: ParticleKind) {
        let i = id.index();
        let profile = self.profiles.get(kind);
        self.kind[i] = kind;
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.velocity[i] = Vec2::ZERO;
        self.speed[i] = profile.speed;
        self.size[i] = profile.size;
        self.energy[i] = profile.energy;
        self.max_energy[i] = profile.max_energy;
        self.metabolism[i] = profile.metabolism;
        self.food_value[i] = profile.food_value;
        self.kind_timer[i] = 0.0;
        self.sight_range[i] = profile.sight_range;
        self.decision_interval[i] = profile.decision_interval;
        // Decide on the first tick after (re)initialisation.
        self.decision_timer[i] = 0.0;
        self.since_decision[i] = 0.0;
        self.food_goal[i] = None;
        self.hunt_goal[i] = None;
        self.color[i] = profile.color;
    }
}
