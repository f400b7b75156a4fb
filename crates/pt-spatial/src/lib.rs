//! `pt-spatial` — region-subdividing spatial index.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`quadtree`] | `QuadTree<T>` (insert, rect / circle queries, inspection)|
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                       |
//!
//! The scheduler rebuilds one `QuadTree<ParticleHandle>` from scratch every
//! tick and answers every "who is near me" query from it.  The tree is
//! generic over a small `Copy` payload so tests can index plain integers.

pub mod error;
pub mod quadtree;


pub use error::{SpatialError, SpatialResult};
pub use quadtree::QuadTree;
