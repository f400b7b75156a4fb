//! `pt-core` — foundational types for the `petri` particle simulation.
//!
//! This crate is a dependency of every other `pt-*` crate.  It intentionally
//! has no `pt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ParticleId`, `TeamId`                                |
//! | [`geo`]         | `Vec2`, `Rect`                                        |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng`                                              |
//! | [`kind`]        | `ParticleKind`, `KindProfile`, `KindProfiles`, `Color`|
//! | [`config`]      | `SimConfig`                                           |
//! | [`error`]       | `PtError`, `PtResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{PtError, PtResult};
pub use geo::{Rect, Vec2};
pub use ids::{ParticleId, TeamId};
pub use kind::{Color, Fate, KindProfile, KindProfiles, Lifetime, ParticleKind};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
