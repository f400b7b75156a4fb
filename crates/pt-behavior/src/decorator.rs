//! Decorators: nodes wrapping exactly one child (plus a guard condition for
//! [`Interrupter`]).

use tracing::trace;

use pt_core::ParticleKind;

use crate::node::{interrupt_child, reset_child};
use crate::{Behavior, BehaviorError, BtResult, DecisionContext, Neighbor, Node, Status};

// ── Repeat ────────────────────────────────────────────────────────────────────

/// When a [`Repeat`] starts its child again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// Never stop on its own; only an interrupt ends it.
    Forever,
    /// Run the child this many times in total.
    Times(u32),
    /// Repeat while the child succeeds.
    UntilFailure,
    /// Repeat while the child fails.
    UntilSuccess,
}

impl RepeatPolicy {
    fn should_repeat(self, completed: u32, last: Status) -> bool {
        match self {
            RepeatPolicy::Forever => true,
            RepeatPolicy::Times(n) => completed < n,
            RepeatPolicy::UntilFailure => last.is_success(),
            RepeatPolicy::UntilSuccess => last.is_failure(),
        }
    }
}

/// Runs its child again each time it completes, as long as the policy says
/// so.
///
/// Starting a `Repeat` starts the child and always reports Running; the
/// child's completion is observed on the next `resume`.  When the policy
/// stops, the repeat succeeds.
pub struct Repeat {
    child: Node,
    policy: RepeatPolicy,
    completed: u32,
}

impl Repeat {
    pub fn new(child: Node, policy: RepeatPolicy) -> Self {
        Self { child, policy, completed: 0 }
    }

    pub fn forever(child: Node) -> Self {
        Self::new(child, RepeatPolicy::Forever)
    }

    /// Number of child runs observed complete since the last start.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn child(&self) -> &Node {
        &self.child
    }
}

impl Behavior for Repeat {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.completed = 0;
        self.child.restart(ctx)?;
        Ok(Status::Running)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let Some(last) = self.child.state().outcome() else {
            self.child.tick(ctx)?;
            return Ok(Status::Running);
        };
        self.completed = self.completed.saturating_add(1);
        if self.policy.should_repeat(self.completed, last) {
            self.child.restart(ctx)?;
            Ok(Status::Running)
        } else {
            trace!(completed = self.completed, policy = ?self.policy, "repeat finished");
            Ok(Status::Success)
        }
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.completed = 0;
        reset_child(&mut self.child, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_child(&mut self.child, ctx)
    }

    fn name(&self) -> &'static str {
        "repeat"
    }
}

// ── Invert ────────────────────────────────────────────────────────────────────

/// Swaps the child's Success and Failure.
pub struct Invert {
    child: Node,
}

impl Invert {
    pub fn new(child: Node) -> Self {
        Self { child }
    }
}

impl Behavior for Invert {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        Ok(self.child.tick(ctx)?.invert())
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        Ok(self.child.resume(ctx)?.invert())
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        reset_child(&mut self.child, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_child(&mut self.child, ctx)
    }

    fn name(&self) -> &'static str {
        "invert"
    }
}

// ── Interrupter ───────────────────────────────────────────────────────────────

/// Runs `child` only while `condition` holds.
///
/// The condition is force-restarted before every step.  If it fails, a
/// Running child is interrupted and the interrupter completes with
/// `fallback` (Success unless configured otherwise).
pub struct Interrupter {
    condition: Node,
    child: Node,
    fallback: Status,
}

impl Interrupter {
    pub fn new(condition: Node, child: Node) -> Self {
        Self { condition, child, fallback: Status::Success }
    }

    /// `fallback` must be Success or Failure.
    pub fn with_fallback(condition: Node, child: Node, fallback: Status) -> BtResult<Self> {
        if fallback.is_running() {
            return Err(BehaviorError::InvalidParam {
                kind: "interrupter".into(),
                param: "fallback".into(),
                reason: "must be success or failure".into(),
            });
        }
        Ok(Self::new_unchecked(condition, child, fallback))
    }

    /// `fallback` must be Success or Failure.
    pub(crate) fn new_unchecked(condition: Node, child: Node, fallback: Status) -> Self {
        Self { condition, child, fallback }
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    fn guard_holds(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<bool> {
        Ok(!self.condition.force_restart(ctx)?.is_failure())
    }

    fn fall_back(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        trace!(fallback = %self.fallback, "interrupter guard failed");
        interrupt_child(&mut self.child, ctx)?;
        Ok(self.fallback)
    }
}

impl Behavior for Interrupter {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.guard_holds(ctx)? {
            return self.fall_back(ctx);
        }
        self.child.tick(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.guard_holds(ctx)? {
            return self.fall_back(ctx);
        }
        self.child.resume(ctx)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        reset_child(&mut self.condition, ctx)?;
        reset_child(&mut self.child, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_child(&mut self.condition, ctx)?;
        interrupt_child(&mut self.child, ctx)
    }

    fn name(&self) -> &'static str {
        "interrupter"
    }
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// Rewrites what a subtree sees and how its result is reported.
pub trait ContextFilter: Send {
    /// Narrow `neighbors` (a copy of the context's list) for the subtree.
    fn narrow(&self, ctx: &DecisionContext<'_>, neighbors: &mut Vec<Neighbor>);

    /// Map the subtree's result.  Identity by default.
    fn map_result(&self, status: Status) -> Status {
        status
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

/// Keeps only the `n` closest neighbors.
#[derive(Copy, Clone, Debug)]
pub struct Nearest(pub usize);

impl ContextFilter for Nearest {
    fn narrow(&self, _ctx: &DecisionContext<'_>, neighbors: &mut Vec<Neighbor>) {
        neighbors.truncate(self.0);
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

/// Keeps only neighbors of the listed kinds.
#[derive(Clone, Debug)]
pub struct OnlyKinds(pub Vec<ParticleKind>);

impl OnlyKinds {
    /// Everything edible.
    pub fn food() -> Self {
        Self(ParticleKind::ALL.into_iter().filter(|k| k.is_edible()).collect())
    }

    pub fn cells() -> Self {
        Self(vec![ParticleKind::Cell])
    }
}

impl ContextFilter for OnlyKinds {
    fn narrow(&self, ctx: &DecisionContext<'_>, neighbors: &mut Vec<Neighbor>) {
        neighbors.retain(|n| self.0.contains(&ctx.kind_of(n)));
    }

    fn name(&self) -> &'static str {
        "only_kinds"
    }
}

/// Applies a [`ContextFilter`] around one child.  The context's neighbor
/// list is restored once the child returns.
pub struct Filter<F: ContextFilter> {
    filter: F,
    child: Node,
}

impl<F: ContextFilter> Filter<F> {
    pub fn new(filter: F, child: Node) -> Self {
        Self { filter, child }
    }

    fn with_narrowed(&mut self, ctx: &mut DecisionContext<'_>, resume: bool) -> BtResult<Status> {
        let mut narrowed = ctx.neighbors.clone();
        self.filter.narrow(ctx, &mut narrowed);
        let saved = std::mem::replace(&mut ctx.neighbors, narrowed);
        let result = if resume { self.child.resume(ctx) } else { self.child.tick(ctx) };
        ctx.neighbors = saved;
        Ok(self.filter.map_result(result?))
    }
}

impl<F: ContextFilter> Behavior for Filter<F> {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.with_narrowed(ctx, false)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.with_narrowed(ctx, true)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        reset_child(&mut self.child, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_child(&mut self.child, ctx)
    }

    fn name(&self) -> &'static str {
        self.filter.name()
    }
}
