//! Fluent builder for constructing a `ParticleStore`.
//!
//! # Usage
//!
//! ```rust
//! use pt_agent::ParticleStoreBuilder;
//! use pt_core::{ParticleKind, Vec2};
//!
//! let mut store = ParticleStoreBuilder::new(/*pool_size=*/ 100)
//!     .reserve(100)
//!     .build();
//!
//! let food = store.spawn_at(ParticleKind::Food, Vec2::new(5.0, 5.0)).unwrap();
//! assert!(store.is_alive(food));
//! assert_eq!(store.alive_count(), 1);
//! ```

use pt_core::{KindProfiles, SimConfig};

use crate::ParticleStore;

/// Fluent builder for [`ParticleStore`].
pub struct ParticleStoreBuilder {
    pool_size: usize,
    reserve: usize,
    profiles: KindProfiles,
}

impl ParticleStoreBuilder {
    /// Create a builder for a pool holding at most `pool_size` live particles.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            reserve: 0,
            profiles: KindProfiles::default(),
        }
    }

    /// Builder pre-filled from a simulation config (pool size and kind table).
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.pool_size).profiles(config.kinds.clone())
    }

    /// Pre-allocate room for `n` slots so early spawns do not reallocate.
    pub fn reserve(mut self, n: usize) -> Self {
        self.reserve = n;
        self
    }

    /// Replace the per-kind parameter table.
    pub fn profiles(mut self, profiles: KindProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn build(self) -> ParticleStore {
        ParticleStore::new(self.pool_size, self.reserve.min(self.pool_size), self.profiles)
    }
}
