//! Top-level simulation configuration.

use crate::{KindProfiles, PtError, PtResult, Rect};

/// Simulation configuration.
///
/// Typically built in code or loaded from JSON by the application crate and
/// passed to `SimBuilder`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Half the side length of the square, toroidal world centred on the
    /// origin.  Default: 500 (a 1000 × 1000 world).
    pub half_extent: f32,

    /// Maximum number of simultaneously alive particles.  `spawn` returns
    /// `None` once this many are alive.
    pub pool_size: usize,

    /// Objects a quadtree leaf holds before it subdivides.
    pub quadtree_capacity: usize,

    /// Deepest allowed quadtree level.  Leaves at this depth accept any
    /// number of objects.
    pub quadtree_max_depth: u8,

    /// Raw seconds per tick used by `Sim::run`.
    pub dt: f32,

    /// Total ticks `Sim::run` simulates.
    pub total_ticks: u64,

    /// Multiplier applied to every raw `dt`.
    pub speed_multiplier: f32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit an observer snapshot every N ticks; 0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Initial values per particle kind.
    pub kinds: KindProfiles,
}

impl SimConfig {
    /// The toroidal world rectangle.
    #[inline]
    pub fn world_bounds(&self) -> Rect {
        Rect::centered(self.half_extent)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> PtResult<()> {
        if !(self.half_extent > 0.0 && self.half_extent.is_finite()) {
            return Err(PtError::Config(format!(
                "half_extent must be positive and finite, got {}",
                self.half_extent
            )));
        }
        if self.pool_size == 0 {
            return Err(PtError::Config("pool_size must be at least 1".into()));
        }
        if self.quadtree_capacity == 0 {
            return Err(PtError::Config("quadtree_capacity must be at least 1".into()));
        }
        if !(self.dt >= 0.0 && self.dt.is_finite()) {
            return Err(PtError::Config(format!("dt must be non-negative, got {}", self.dt)));
        }
        if !(self.speed_multiplier >= 0.0 && self.speed_multiplier.is_finite()) {
            return Err(PtError::Config(format!(
                "speed_multiplier must be non-negative, got {}",
                self.speed_multiplier
            )));
        }
        for kind in crate::ParticleKind::ALL {
            let profile = self.kinds.get(kind);
            if profile.sight_range < 0.0 || profile.speed < 0.0 || profile.size < 0.0 {
                return Err(PtError::Config(format!(
                    "{kind}: size, speed and sight_range must be non-negative"
                )));
            }
            if let Some(lifetime) = profile.lifetime
                && lifetime.after_secs < 0.0
            {
                return Err(PtError::Config(format!(
                    "{kind}: lifetime must be non-negative"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            half_extent: 500.0,
            pool_size: 5_000,
            quadtree_capacity: 40,
            quadtree_max_depth: 20,
            dt: 1.0 / 60.0,
            total_ticks: 3_600,
            speed_multiplier: 1.0,
            seed: 42,
            snapshot_interval_ticks: 60,
            kinds: KindProfiles::default(),
        }
    }
}
