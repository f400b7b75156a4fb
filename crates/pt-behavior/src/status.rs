//! Result and lifecycle enums shared by every node.

use std::fmt;

/// The result of driving a node one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The node finished and achieved its goal.
    Success,
    /// The node has not finished yet.  Drive it again with `resume` on a
    /// later decision.
    Running,
    /// The node finished without achieving its goal.  An expected outcome,
    /// never an error.
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Swap Success and Failure.  Running is left unchanged.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Success => "success",
            Status::Running => "running",
            Status::Failure => "failure",
        })
    }
}

/// Lifecycle state of a [`Node`](crate::Node).
///
/// ```text
///   New ──reset──▶ Ready ──start──▶ Starting ──▶ Running ──resume──▶ …
///                    ▲                   │           │
///                    │                   ▼           ▼
///                    └──────reset─── Successful / Failed ◀──interrupt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    New,
    Ready,
    /// Transient: inside `on_start`.
    Starting,
    Running,
    Successful,
    Failed,
}

impl NodeState {
    #[inline]
    pub fn is_new(self) -> bool {
        matches!(self, NodeState::New)
    }

    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, NodeState::Ready)
    }

    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    /// `true` for Successful and Failed.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, NodeState::Successful | NodeState::Failed)
    }

    /// The terminal result of a complete node, `None` otherwise.
    #[inline]
    pub fn outcome(self) -> Option<Status> {
        match self {
            NodeState::Successful => Some(Status::Success),
            NodeState::Failed => Some(Status::Failure),
            _ => None,
        }
    }

    pub(crate) fn after(status: Status) -> Self {
        match status {
            Status::Success => NodeState::Successful,
            Status::Running => NodeState::Running,
            Status::Failure => NodeState::Failed,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
