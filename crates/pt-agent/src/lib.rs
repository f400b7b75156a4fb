//! `pt-agent` — Structure-of-Arrays particle storage for `petri`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`store`]     | `ParticleStore` (SoA arrays + pool), `ParticleHandle`     |
//! | [`builder`]   | `ParticleStoreBuilder` (fluent construction)              |
//! | [`error`]     | `StoreError`, `StoreResult<T>`                            |
//!
//! # Pool model
//!
//! Every slot is either *alive* (listed in the population order and indexed
//! each tick) or *dead and pooled* (queued for reuse by the next `spawn`).
//! Re-initialising a slot bumps its generation, so anything that remembered
//! the previous life of a slot (a behavior tree, a spatial-index entry) can
//! tell it is stale.

pub mod builder;
pub mod error;
pub mod store;


pub use builder::ParticleStoreBuilder;
pub use error::{StoreError, StoreResult};
pub use store::{ParticleHandle, ParticleStore};
