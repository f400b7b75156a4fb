//! `pt-behavior` — resumable behavior trees for `petri` particles.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`status`]     | `Status`, `NodeState`                                        |
//! | [`node`]       | `Behavior` trait, `Node` lifecycle wrapper                   |
//! | [`context`]    | `DecisionContext<'a>`, `Neighbor`, `collect_neighbors`       |
//! | [`composite`]  | `Sequence`, `Selector`, `Parallel`, `PriorityParallel`       |
//! | [`decorator`]  | `Repeat`, `Invert`, `Interrupter`, `Filter` + filters        |
//! | [`task`]       | `Task` trait, `TaskNode`, closure leaves, `Wait`             |
//! | [`tasks`]      | Stock particle tasks and perception predicates               |
//! | [`definition`] | `TreeDefinition` (plain-data tree description)               |
//! | [`registry`]   | `NodeRegistry` (kind name → leaf constructor)                |
//! | [`factory`]    | `build_factory`, `NodeFactory`                               |
//! | [`error`]      | `BehaviorError`, `BtResult<T>`                               |
//!
//! # Execution model
//!
//! A tree is not re-evaluated from the root on every decision.  Each node
//! remembers its [`NodeState`]; a tree that reported Running is *resumed* on
//! the particle's next decision and picks up inside the same child.  Only
//! a tree that completed is started again from the top.
//!
//! Nodes never hold on to the world.  Every hook receives a
//! [`DecisionContext`] borrowed for that one call.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `TreeDefinition`.               |

pub mod composite;
pub mod context;
pub mod decorator;
pub mod definition;
pub mod error;
pub mod factory;
pub mod node;
pub mod registry;
pub mod status;
pub mod task;
pub mod tasks;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use composite::{Parallel, PriorityParallel, Selector, Sequence};
pub use context::{DecisionContext, Neighbor, collect_neighbors};
pub use decorator::{ContextFilter, Filter, Interrupter, Invert, Nearest, OnlyKinds, Repeat, RepeatPolicy};
pub use definition::{Params, TreeDefinition};
pub use error::{BehaviorError, BtResult};
pub use factory::{NodeFactory, build_factory};
pub use node::{Behavior, Node};
pub use registry::{LeafCompiler, LeafMaker, NodeRegistry};
pub use status::{NodeState, Status};
pub use task::{Action, Condition, Task, TaskNode, Wait, action, condition, constant, task};
