//! Fluent builder for constructing a [`Sim`].

use rustc_hash::FxHashMap;
use tracing::debug;

use pt_agent::{ParticleStore, ParticleStoreBuilder};
use pt_behavior::{NodeFactory, NodeRegistry, TreeDefinition, build_factory};
use pt_core::{PtError, SimClock, SimConfig, SimRng, TeamId};
use pt_mobility::MobilityEngine;
use pt_spatial::QuadTree;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                          |
/// |------------------------|--------------------------------------------------|
/// | `.particles(store)`    | Empty store sized from the config                |
/// | `.default_behavior(f)` | [`TreeDefinition::stock_cell`] with stock leaves |
/// | `.team_behavior(t, f)` | None; every team uses the default                |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default())
///     .team_behavior(TeamId(1), coward_factory)
///     .build()?;
/// sim.spawn_at(ParticleKind::Cell, Vec2::new(10.0, 0.0));
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    particles: Option<ParticleStore>,
    default_behavior: Option<NodeFactory>,
    team_behaviors: FxHashMap<TeamId, NodeFactory>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            particles: None,
            default_behavior: None,
            team_behaviors: FxHashMap::default(),
        }
    }

    /// Start from an existing particle store instead of an empty one.  Its
    /// pool size must match `config.pool_size`.
    pub fn particles(mut self, store: ParticleStore) -> Self {
        self.particles = Some(store);
        self
    }

    pub fn default_behavior(mut self, factory: NodeFactory) -> Self {
        self.default_behavior = Some(factory);
        self
    }

    pub fn team_behavior(mut self, team: TeamId, factory: NodeFactory) -> Self {
        self.team_behaviors.insert(team, factory);
        self
    }

    /// Validate the configuration, compile the default behavior if none was
    /// given, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let particles = match self.particles {
            Some(store) if store.pool_size() != self.config.pool_size => {
                return Err(PtError::Config(format!(
                    "particle store pool size {} does not match config pool_size {}",
                    store.pool_size(),
                    self.config.pool_size
                ))
                .into());
            }
            Some(store) => store,
            None => ParticleStoreBuilder::from_config(&self.config).build(),
        };

        let default_behavior = match self.default_behavior {
            Some(factory) => factory,
            None => build_factory(&NodeRegistry::with_stock(), &TreeDefinition::stock_cell())?,
        };

        let bounds = self.config.world_bounds();
        let index = QuadTree::new(bounds, self.config.quadtree_capacity, self.config.quadtree_max_depth)?;
        let mobility = MobilityEngine::new(bounds)?;

        debug!(
            half_extent = self.config.half_extent,
            pool_size = self.config.pool_size,
            seed = self.config.seed,
            teams = self.team_behaviors.len(),
            "simulation built"
        );

        Ok(Sim {
            clock: SimClock::new(self.config.speed_multiplier),
            rng: SimRng::new(self.config.seed),
            trees: Vec::with_capacity(particles.slot_count()),
            config: self.config,
            particles,
            index,
            mobility,
            default_behavior,
            team_behaviors: self.team_behaviors,
            epoch: 0,
            scratch: Vec::new(),
        })
    }
}
