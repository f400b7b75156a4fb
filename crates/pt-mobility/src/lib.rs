//! `pt-mobility` — turning desired velocities into movement.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`steering`] | `separation`, `heading`: pure steering maths               |
//! | [`engine`]   | `MobilityEngine`: moves one particle and wraps the torus   |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                       |
//!
//! # Movement model
//!
//! Behaviors only set a particle's desired `velocity`.  Every tick, after
//! the decision step, the scheduler asks the engine to move each particle:
//!
//! 1. Same-team cells that overlap push the particle away (separation).
//! 2. The desired direction, weighted ×3, is blended with that push and
//!    normalised.
//! 3. The particle advances `speed × dt` along the result.
//! 4. The position is wrapped onto the toroidal world.
//!
//! Movement runs whatever the tree reported, so a Running task keeps its
//! particle moving between decisions.

pub mod engine;
pub mod error;
pub mod steering;


pub use engine::MobilityEngine;
pub use error::{MobilityError, MobilityResult};
pub use steering::{DESIRED_WEIGHT, heading, separation};
