//! Simulation time model.
//!
//! # Design
//!
//! Ticks are counted with an integer `Tick`; the simulated time each tick
//! covers is a float `dt` in seconds, supplied by the caller of
//! `Sim::step` (a fixed value from `SimConfig` for headless runs, the frame
//! delta for interactive ones).  `SimClock` accumulates both and applies the
//! global speed multiplier.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// `true` every `interval` ticks, counting from tick 0.  An interval of
    /// zero never matches.
    #[inline]
    pub fn is_every(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and the simulated seconds elapsed so far.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current tick, advanced by [`SimClock::advance`] each step.
    pub current_tick: Tick,
    /// Simulated seconds since tick 0 (after the speed multiplier).
    pub elapsed_secs: f64,
    /// Multiplier applied to every raw `dt` passed to `advance`.
    pub speed_multiplier: f32,
}

impl SimClock {
    pub fn new(speed_multiplier: f32) -> Self {
        Self {
            current_tick: Tick::ZERO,
            elapsed_secs: 0.0,
            speed_multiplier,
        }
    }

    /// Scale a raw frame delta by the speed multiplier without advancing.
    #[inline]
    pub fn scaled(&self, raw_dt: f32) -> f32 {
        raw_dt * self.speed_multiplier
    }

    /// Advance by one tick covering `raw_dt` real seconds.  Returns the
    /// simulated `dt` for this tick.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let dt = self.scaled(raw_dt);
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed_secs += f64::from(dt);
        dt
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs)
    }
}
