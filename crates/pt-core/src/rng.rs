//! Deterministic simulation RNG wrapper.
//!
//! The scheduler is single-threaded, so one `SimRng` seeded from
//! `SimConfig::seed` drives every random choice (world bootstrap, random
//! walks, target picking).  The same seed and the same sequence of `dt`s
//! always reproduce the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec2;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent `SimRng` from this one and `offset`.  World
    /// bootstrap draws from a child stream.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniformly random unit vector.
    pub fn direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.0.gen_range(0.0..std::f32::consts::TAU))
    }

    /// Value in `[-1, 1]` biased towards zero (mean of two uniforms, rescaled).
    /// Used to cluster bootstrap placements around the centre of the world.
    pub fn centered_unit(&mut self) -> f32 {
        let a: f32 = self.0.r#gen();
        let b: f32 = self.0.r#gen();
        (a + b) - 1.0
    }
}
