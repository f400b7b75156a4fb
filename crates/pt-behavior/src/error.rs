use thiserror::Error;

use pt_agent::StoreError;
use pt_spatial::SpatialError;

use crate::NodeState;

/// Fatal behavior-engine errors.
///
/// Domain failures (no food in sight, nothing to fight) are reported as
/// [`Status::Failure`](crate::Status::Failure), never through this type.
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// A lifecycle method was called from a state that does not allow it.
    #[error("{node}: cannot {op} while {state}")]
    InvalidTransition {
        op: &'static str,
        state: NodeState,
        node: &'static str,
    },

    #[error("{0} needs at least one child")]
    EmptyComposite(&'static str),

    #[error("unknown node kind `{0}`")]
    UnknownKind(String),

    #[error("`{kind}` expects {expected} children, got {got}")]
    Arity {
        kind: String,
        expected: &'static str,
        got: usize,
    },

    #[error("`{kind}` parameter `{param}`: {reason}")]
    InvalidParam {
        kind: String,
        param: String,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type BtResult<T> = Result<T, BehaviorError>;
