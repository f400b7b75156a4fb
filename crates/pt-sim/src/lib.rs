//! `pt-sim` — tick scheduler for the `petri` particle simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Index:     clear the quadtree and insert every live particle.
//!   ② Particles: in population order, for those alive at tick start:
//!                   neighbors within sight_range, nearest first
//!                   decision timer elapsed → one behavior-tree step
//!                   movement + torus wrap
//!                   age; metabolism (cells) or lifetime transition (others)
//!   ③ Reap:      drop the dead, release their slots, prune stale trees.
//! ```
//!
//! Trees are attached lazily: a cell gets a fresh tree from its team's
//! [`NodeFactory`](pt_behavior::NodeFactory) at its first decision, and again
//! whenever its slot was re-initialised or its team's behavior replaced.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pt_core::{ParticleKind, SimConfig, Vec2};
//! use pt_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! sim.spawn_at(ParticleKind::Food, Vec2::new(20.0, 0.0));
//! sim.spawn_at(ParticleKind::Cell, Vec2::ZERO);
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use lifecycle::Outcome;
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::Sim;
