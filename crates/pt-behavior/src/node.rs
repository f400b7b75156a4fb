//! The `Behavior` trait and the `Node` wrapper that owns its state machine.
//!
//! A node kind only implements the hooks.  [`Node`] checks every lifecycle
//! call against the current [`NodeState`], runs the matching hook, and
//! records the result, so composites and decorators never have to track
//! their children's states themselves.

use crate::{BehaviorError, BtResult, DecisionContext, NodeState, Status};

/// Hooks implemented by every node kind.
///
/// Only [`on_start`](Self::on_start) and [`on_continue`](Self::on_continue)
/// are required.  Hooks are called by [`Node`] and must not be called
/// directly.
///
/// # Example
///
/// ```rust,ignore
/// struct Blink { left: u8 }
///
/// impl Behavior for Blink {
///     fn on_start(&mut self, _: &mut DecisionContext<'_>) -> BtResult<Status> {
///         self.left = 3;
///         Ok(Status::Running)
///     }
///
///     fn on_continue(&mut self, _: &mut DecisionContext<'_>) -> BtResult<Status> {
///         self.left -= 1;
///         Ok(if self.left == 0 { Status::Success } else { Status::Running })
///     }
/// }
/// ```
pub trait Behavior: Send {
    /// First step after `start`.
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status>;

    /// Every later step while the node is Running.
    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status>;

    /// Prepare for a fresh run.  Composites reset their children here.
    fn on_reset(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        Ok(())
    }

    /// The node is being abandoned while Running.
    fn on_interrupt(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        Ok(())
    }

    /// The node just became Successful or Failed through `start`/`resume`.
    fn on_complete(&mut self, _status: Status, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        Ok(())
    }

    /// Short kind name used in errors and traces.
    fn name(&self) -> &'static str {
        "behavior"
    }
}

impl Behavior for Box<dyn Behavior> {
    #[inline]
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        (**self).on_start(ctx)
    }

    #[inline]
    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        (**self).on_continue(ctx)
    }

    #[inline]
    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        (**self).on_reset(ctx)
    }

    #[inline]
    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        (**self).on_interrupt(ctx)
    }

    #[inline]
    fn on_complete(&mut self, status: Status, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        (**self).on_complete(status, ctx)
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A behavior plus its lifecycle state.
///
/// Trees are built from `Node` (= `Node<Box<dyn Behavior>>`); the type
/// parameter exists so a concrete node can be driven without boxing.
pub struct Node<B: Behavior = Box<dyn Behavior>> {
    state: NodeState,
    behavior: B,
}

impl<B: Behavior> Node<B> {
    pub fn new(behavior: B) -> Self {
        Self { state: NodeState::New, behavior }
    }

    #[inline]
    pub fn state(&self) -> NodeState {
        self.state
    }

    #[inline]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    /// New or Complete → Ready.
    pub fn reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        if !(self.state.is_new() || self.state.is_complete()) {
            return Err(self.invalid("reset"));
        }
        self.behavior.on_reset(ctx)?;
        self.state = NodeState::Ready;
        Ok(())
    }

    /// Ready → Starting → whatever `on_start` reports.
    pub fn start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.state.is_ready() {
            return Err(self.invalid("start"));
        }
        self.state = NodeState::Starting;
        let status = self.behavior.on_start(ctx)?;
        self.settle(status, ctx)
    }

    /// Running → whatever `on_continue` reports.
    pub fn resume(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.state.is_running() {
            return Err(self.invalid("continue"));
        }
        let status = self.behavior.on_continue(ctx)?;
        self.settle(status, ctx)
    }

    /// Running → Failed.  A no-op on a complete node.
    pub fn interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        match self.state {
            NodeState::Running => {
                self.behavior.on_interrupt(ctx)?;
                self.state = NodeState::Failed;
                Ok(())
            }
            NodeState::Successful | NodeState::Failed => Ok(()),
            _ => Err(self.invalid("interrupt")),
        }
    }

    /// Reset if needed, then start.
    pub fn restart(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if self.state.is_new() || self.state.is_complete() {
            self.reset(ctx)?;
        }
        self.start(ctx)
    }

    /// Like [`restart`](Self::restart), but interrupts a Running node first.
    pub fn force_restart(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if self.state.is_running() {
            self.interrupt(ctx)?;
        }
        self.restart(ctx)
    }

    /// Drive the node one step from whatever state it is in: resume if
    /// Running, start if Ready, restart otherwise.
    pub fn tick(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        match self.state {
            NodeState::Running => self.resume(ctx),
            NodeState::Ready => self.start(ctx),
            _ => self.restart(ctx),
        }
    }

    fn settle(&mut self, status: Status, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.state = NodeState::after(status);
        if self.state.is_complete() {
            self.behavior.on_complete(status, ctx)?;
        }
        Ok(status)
    }

    fn invalid(&self, op: &'static str) -> BehaviorError {
        BehaviorError::InvalidTransition { op, state: self.state, node: self.behavior.name() }
    }
}

impl<B: Behavior + 'static> Node<B> {
    /// Erase the behavior type so the node fits in a tree.
    pub fn boxed(self) -> Node {
        Node { state: self.state, behavior: Box::new(self.behavior) }
    }
}

impl<B: Behavior> std::fmt::Debug for Node<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.behavior.name())
            .field("state", &self.state)
            .finish()
    }
}

// ── Child helpers shared by composites and decorators ─────────────────────────

/// Reset a child if it is New or Complete.  Ready children are left alone.
pub(crate) fn reset_child(child: &mut Node, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
    if child.state().is_new() || child.state().is_complete() {
        child.reset(ctx)?;
    }
    Ok(())
}

/// Interrupt a child only if it is Running.
pub(crate) fn interrupt_child(child: &mut Node, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
    if child.state().is_running() {
        child.interrupt(ctx)?;
    }
    Ok(())
}
