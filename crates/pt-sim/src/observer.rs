//! Simulation observer trait and the per-tick summary it receives.

use pt_agent::ParticleStore;
use pt_core::Tick;

/// Counters collected while one tick was processed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    /// Simulated seconds elapsed once this tick completed.
    pub elapsed_secs: f64,
    /// Particles alive at the end of the tick.
    pub alive: usize,
    pub cells: usize,
    /// Live edible particles (food and corpses).
    pub food: usize,
    /// Behavior-tree decisions taken.
    pub decisions: usize,
    /// Particles that died (starved, eaten or expired).  Turning into a
    /// corpse or dead food is not a death.
    pub deaths: usize,
    pub spawns: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_ticks`][crate::Sim::run_ticks] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: population printer
///
/// ```rust,ignore
/// struct Census;
///
/// impl SimObserver for Census {
///     fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
///         println!("{tick}: {} cells, {} food", summary.cells, summary.food);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called every `config.snapshot_interval_ticks` ticks, after
    /// `on_tick_end`, with read-only access to every particle.
    fn on_snapshot(&mut self, _tick: Tick, _particles: &ParticleStore) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
