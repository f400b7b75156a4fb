//! The `Sim` struct and its tick loop.

use rustc_hash::FxHashMap;
use tracing::{debug, error, trace};

use pt_agent::{ParticleHandle, ParticleStore};
use pt_behavior::{DecisionContext, Neighbor, Node, NodeFactory, collect_neighbors};
use pt_core::{ParticleId, ParticleKind, SimClock, SimConfig, SimRng, TeamId, Tick, Vec2};
use pt_mobility::MobilityEngine;
use pt_spatial::QuadTree;

use crate::lifecycle;
use crate::{SimObserver, SimResult, TickSummary};

/// A particle's tree together with the life and behavior epoch it was built
/// for.
pub(crate) struct TreeSlot {
    generation: u32,
    epoch: u64,
    node: Node,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each [`step`](Self::step) runs one tick:
///
/// 1. **Index**: rebuild the quadtree from every live particle.
/// 2. **Particles**, in population order, for the particles alive when the
///    tick began (offspring born this tick wait for the next one):
///    - collect the visible neighbors, nearest first;
///    - cells whose decision timer ran out get one behavior-tree step;
///    - move along the desired velocity and wrap the torus;
///    - age the particle, then burn energy (cells) or apply the kind's
///      lifetime transition (passive kinds).  Energy a decision spent counts
///      here, so a cell that fought itself down to zero dies this tick.
/// 3. **Reap**: drop the dead from the population and free their slots.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Every particle, alive or pooled.
    pub particles: ParticleStore,

    /// Spatial index as of the last rebuild (start of the last tick).
    pub index: QuadTree<ParticleHandle>,

    /// Simulation RNG, handed to trees through the decision context.
    pub rng: SimRng,

    pub(crate) mobility: MobilityEngine,

    /// Behavior trees, indexed by `ParticleId`; attached on first decision.
    pub(crate) trees: Vec<Option<TreeSlot>>,

    pub(crate) default_behavior: NodeFactory,
    pub(crate) team_behaviors: FxHashMap<TeamId, NodeFactory>,

    /// Bumped whenever a factory changes so existing trees are rebuilt.
    pub(crate) epoch: u64,

    /// Reused neighbor buffer.
    pub(crate) scratch: Vec<Neighbor>,
}

impl Sim {
    // ── Run loops ─────────────────────────────────────────────────────────

    /// Run `config.total_ticks` ticks of `config.dt` seconds each.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let (ticks, dt) = (self.config.total_ticks, self.config.dt);
        self.run_ticks(ticks, dt, observer)?;
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks of `raw_dt` seconds each.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, raw_dt: f32, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let summary = self.step(raw_dt)?;
            observer.on_tick_end(now, &summary);
            if now.is_every(self.config.snapshot_interval_ticks) {
                observer.on_snapshot(now, &self.particles);
            }
        }
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Process one tick covering `raw_dt` real seconds (scaled by the speed
    /// multiplier).
    ///
    /// A behavior error aborts the tick and is returned after being logged;
    /// the simulation should not be stepped again afterwards.
    pub fn step(&mut self, raw_dt: f32) -> SimResult<TickSummary> {
        let tick = self.clock.current_tick;
        let dt = self.clock.scaled(raw_dt);
        let mut summary = TickSummary { tick, ..TickSummary::default() };

        self.rebuild_index()?;
        self.trees.resize_with(self.particles.slot_count(), || None);

        let count = self.particles.population().len();
        for k in 0..count {
            let id = self.particles.population()[k];
            if !self.particles.is_alive(id) {
                continue;
            }
            self.process(id, dt, &mut summary)?;
        }

        summary.spawns = self.particles.population().len() - count;
        summary.deaths += self.particles.reap();
        self.prune_trees();

        self.clock.advance(raw_dt);
        summary.elapsed_secs = self.clock.elapsed_secs;
        summary.alive = self.particles.alive_count();
        summary.cells = self.particles.count_of_kind(ParticleKind::Cell);
        summary.food = ParticleKind::ALL
            .into_iter()
            .filter(|k| k.is_edible())
            .map(|k| self.particles.count_of_kind(k))
            .sum();
        trace!(%tick, alive = summary.alive, decisions = summary.decisions, "tick done");
        Ok(summary)
    }

    fn process(&mut self, id: ParticleId, dt: f32, summary: &mut TickSummary) -> SimResult<()> {
        let i = id.index();
        let radius = self.particles.sight_range[i];
        collect_neighbors(&self.particles, &self.index, id, radius, &mut self.scratch);

        if self.particles.kind[i].decides() {
            self.particles.decision_timer[i] -= dt;
            self.particles.since_decision[i] += dt;
            if self.particles.decision_timer[i] <= 0.0 {
                self.decide(id)?;
                summary.decisions += 1;
                self.particles.decision_timer[i] = self.particles.decision_interval[i];
                self.particles.since_decision[i] = 0.0;
            }
        }

        // A tree may have removed its own particle.
        if !self.particles.is_alive(id) {
            self.trees[i] = None;
            return Ok(());
        }
        self.mobility.step(&mut self.particles, id, &self.scratch, dt)?;

        if lifecycle::advance(&mut self.particles, id, dt)?.is_death() {
            self.trees[i] = None;
        }
        Ok(())
    }

    /// Run one behavior-tree step for `id`, attaching a fresh tree first if
    /// it has none or the one it has belongs to an earlier life or behavior.
    fn decide(&mut self, id: ParticleId) -> SimResult<()> {
        let i = id.index();
        let generation = self.particles.generation[i];
        let team = self.particles.team[i];
        let epoch = self.epoch;

        let slot = &mut self.trees[i];
        if !matches!(slot, Some(s) if s.generation == generation && s.epoch == epoch) {
            let factory = self.team_behaviors.get(&team).unwrap_or(&self.default_behavior);
            debug!(%id, %team, "behavior tree attached");
            *slot = Some(TreeSlot { generation, epoch, node: factory.make() });
        }
        let Some(tree) = slot.as_mut() else {
            return Ok(());
        };

        let dt = self.particles.since_decision[i];
        let neighbors = std::mem::take(&mut self.scratch);
        let mut ctx = DecisionContext::new(&mut self.particles, &self.index, &mut self.rng, id, neighbors, dt);
        let result = tree.node.tick(&mut ctx);
        self.scratch = ctx.neighbors;

        match result {
            Ok(status) => {
                trace!(%id, %status, state = %tree.node.state(), "decided");
                Ok(())
            }
            Err(e) => {
                error!(%id, tree = tree.node.name(), error = %e, "behavior tree failed");
                Err(e.into())
            }
        }
    }

    /// Clear and refill the spatial index from every live particle.
    pub fn rebuild_index(&mut self) -> SimResult<()> {
        self.index.clear();
        for &id in self.particles.population() {
            if self.particles.is_alive(id) {
                let at = self.particles.position[id.index()];
                self.index.insert(self.particles.handle(id), at)?;
            }
        }
        Ok(())
    }

    /// Drop trees whose particle died or changed life.
    fn prune_trees(&mut self) {
        let particles = &self.particles;
        for (i, slot) in self.trees.iter_mut().enumerate() {
            let stale = matches!(slot, Some(t) if !(particles.alive[i] && particles.generation[i] == t.generation));
            if stale {
                *slot = None;
            }
        }
    }

    // ── World API ─────────────────────────────────────────────────────────

    /// Spawn a particle of `kind` at the world origin.  `None` when the pool
    /// is full.
    pub fn spawn(&mut self, kind: ParticleKind) -> Option<ParticleId> {
        self.particles.spawn(kind)
    }

    /// Spawn a particle of `kind` at `at`, wrapped into the world.
    pub fn spawn_at(&mut self, kind: ParticleKind, at: Vec2) -> Option<ParticleId> {
        self.particles.spawn_at(kind, self.mobility.bounds().wrap(at))
    }

    /// Kill a living particle.  Its slot is reused after the current tick.
    pub fn kill(&mut self, id: ParticleId) -> SimResult<()> {
        self.particles.kill(id)?;
        if let Some(slot) = self.trees.get_mut(id.index()) {
            *slot = None;
        }
        Ok(())
    }

    /// Re-initialise a living particle in place as `kind`.  Any tree it had
    /// is replaced at its next decision.
    pub fn init_with_type(&mut self, id: ParticleId, kind: ParticleKind) -> SimResult<()> {
        self.particles.init_with_type(id, kind)?;
        Ok(())
    }

    /// Live neighbors of `id` within `radius`, nearest first, according to
    /// the index as of its last rebuild.
    pub fn neighbors_within_radius(&self, id: ParticleId, radius: f32) -> Vec<Neighbor> {
        let mut out = Vec::new();
        collect_neighbors(&self.particles, &self.index, id, radius, &mut out);
        out
    }

    // ── Behaviors ─────────────────────────────────────────────────────────

    /// Use `factory` for the cells of `team`.  Trees already attached to
    /// those cells are rebuilt at their next decision.
    pub fn set_behavior(&mut self, team: TeamId, factory: NodeFactory) {
        self.team_behaviors.insert(team, factory);
        self.epoch += 1;
        debug!(%team, epoch = self.epoch, "team behavior replaced");
    }

    /// Use `factory` for every team without its own behavior.
    pub fn set_default_behavior(&mut self, factory: NodeFactory) {
        self.default_behavior = factory;
        self.epoch += 1;
        debug!(epoch = self.epoch, "default behavior replaced");
    }

    /// The tree currently attached to `id`, if any.
    pub fn tree(&self, id: ParticleId) -> Option<&Node> {
        self.trees.get(id.index())?.as_ref().map(|t| &t.node)
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }
}
