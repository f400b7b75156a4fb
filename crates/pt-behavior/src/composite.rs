//! Composite nodes: a fixed, non-empty list of children.
//!
//! All composites share the same housekeeping: `reset` resets the children
//! that are New or Complete, and `interrupt` interrupts the children that
//! are still Running.  Children are driven with [`Node::tick`], which
//! resumes a Running child, starts a Ready one and restarts anything else.

use tracing::trace;

use crate::node::{interrupt_child, reset_child};
use crate::{Behavior, BehaviorError, BtResult, DecisionContext, Node, Status};

fn non_empty(kind: &'static str, children: Vec<Node>) -> BtResult<Vec<Node>> {
    if children.is_empty() {
        return Err(BehaviorError::EmptyComposite(kind));
    }
    Ok(children)
}

fn reset_all(children: &mut [Node], ctx: &mut DecisionContext<'_>) -> BtResult<()> {
    children.iter_mut().try_for_each(|c| reset_child(c, ctx))
}

fn interrupt_all(children: &mut [Node], ctx: &mut DecisionContext<'_>) -> BtResult<()> {
    children.iter_mut().try_for_each(|c| interrupt_child(c, ctx))
}

// ── Sequence ──────────────────────────────────────────────────────────────────

/// Runs children in order while they succeed.
///
/// A Running child suspends the sequence; the next `resume` picks up at the
/// same child.  The first failure fails the sequence.
pub struct Sequence {
    children: Vec<Node>,
    active: usize,
}

impl Sequence {
    pub fn new(children: Vec<Node>) -> BtResult<Self> {
        Ok(Self::new_unchecked(non_empty("sequence", children)?))
    }

    /// `children` must not be empty.
    pub(crate) fn new_unchecked(children: Vec<Node>) -> Self {
        Self { children, active: 0 }
    }

    /// Index of the child currently being run.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    fn run(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        while let Some(child) = self.children.get_mut(self.active) {
            match child.tick(ctx)? {
                Status::Success => self.active += 1,
                other => return Ok(other),
            }
        }
        Ok(Status::Success)
    }
}

impl Behavior for Sequence {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.active = 0;
        self.run(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.active = 0;
        reset_all(&mut self.children, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_all(&mut self.children, ctx)
    }

    fn name(&self) -> &'static str {
        "sequence"
    }
}

// ── Selector ──────────────────────────────────────────────────────────────────

/// Runs children in order until one does not fail.
///
/// `selected` only moves forward during a run: a Running child is resumed
/// on the next decision, and if it later fails the selector moves on to the
/// next child instead of starting over.
pub struct Selector {
    children: Vec<Node>,
    selected: usize,
}

impl Selector {
    pub fn new(children: Vec<Node>) -> BtResult<Self> {
        Ok(Self::new_unchecked(non_empty("selector", children)?))
    }

    pub(crate) fn new_unchecked(children: Vec<Node>) -> Self {
        Self { children, selected: 0 }
    }

    /// Index of the child that produced the last result.  Equal to the
    /// child count once every child has failed.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    fn run(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        while let Some(child) = self.children.get_mut(self.selected) {
            match child.tick(ctx)? {
                Status::Failure => self.selected += 1,
                other => return Ok(other),
            }
        }
        Ok(Status::Failure)
    }
}

impl Behavior for Selector {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.selected = 0;
        self.run(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.selected = 0;
        reset_all(&mut self.children, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_all(&mut self.children, ctx)
    }

    fn name(&self) -> &'static str {
        "selector"
    }
}

// ── Parallel ──────────────────────────────────────────────────────────────────

/// Drives every unfinished child on every step.
///
/// Running until all children are complete, then Success if at least
/// `min_successful` of them succeeded and Failure otherwise.
pub struct Parallel {
    children: Vec<Node>,
    min_successful: usize,
    max_failed: usize,
    successes: usize,
    failures: usize,
}

impl Parallel {
    /// `min_successful` must not exceed the number of children.
    pub fn new(children: Vec<Node>, min_successful: usize, max_failed: usize) -> BtResult<Self> {
        let children = non_empty("parallel", children)?;
        if min_successful > children.len() {
            return Err(BehaviorError::InvalidParam {
                kind: "parallel".into(),
                param: "min_successful".into(),
                reason: format!("{min_successful} exceeds the {} children", children.len()),
            });
        }
        Ok(Self::new_unchecked(children, min_successful, max_failed))
    }

    /// `children` must not be empty and must number at least
    /// `min_successful`.
    pub(crate) fn new_unchecked(children: Vec<Node>, min_successful: usize, max_failed: usize) -> Self {
        Self { children, min_successful, max_failed, successes: 0, failures: 0 }
    }

    /// Succeeds only if every child succeeds.
    pub fn all(children: Vec<Node>) -> BtResult<Self> {
        let n = children.len();
        Self::new(children, n, 1)
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    fn run(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let mut running = false;
        for child in self.children.iter_mut() {
            if child.state().is_complete() {
                continue;
            }
            match child.tick(ctx)? {
                Status::Success => self.successes += 1,
                Status::Failure => self.failures += 1,
                Status::Running => running = true,
            }
        }
        if running {
            return Ok(Status::Running);
        }
        if self.successes >= self.min_successful {
            return Ok(Status::Success);
        }
        if self.failures >= self.max_failed {
            trace!(failures = self.failures, max_failed = self.max_failed, "parallel failed");
        }
        Ok(Status::Failure)
    }
}

impl Behavior for Parallel {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.successes = 0;
        self.failures = 0;
        reset_all(&mut self.children, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_all(&mut self.children, ctx)
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}

// ── PriorityParallel ──────────────────────────────────────────────────────────

/// Re-evaluates children in priority order on every step.
///
/// The first child that does not fail wins: it is resumed if it was already
/// Running and restarted otherwise.  Every lower-priority child that is
/// still Running is interrupted, so at most one child runs at a time.
pub struct PriorityParallel {
    children: Vec<Node>,
    winner: Option<usize>,
}

impl PriorityParallel {
    pub fn new(children: Vec<Node>) -> BtResult<Self> {
        Ok(Self::new_unchecked(non_empty("priority", children)?))
    }

    pub(crate) fn new_unchecked(children: Vec<Node>) -> Self {
        Self { children, winner: None }
    }

    /// Index of the child that won the last step, if any.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    fn run(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.winner = None;
        for i in 0..self.children.len() {
            let status = self.children[i].tick(ctx)?;
            if status.is_failure() {
                continue;
            }
            if let Some(previous) = self.children[i + 1..].iter().position(|c| c.state().is_running()) {
                trace!(winner = i, preempted = i + 1 + previous, "priority preemption");
            }
            interrupt_all(&mut self.children[i + 1..], ctx)?;
            self.winner = Some(i);
            return Ok(status);
        }
        Ok(Status::Failure)
    }
}

impl Behavior for PriorityParallel {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.run(ctx)
    }

    fn on_reset(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.winner = None;
        reset_all(&mut self.children, ctx)
    }

    fn on_interrupt(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        interrupt_all(&mut self.children, ctx)
    }

    fn name(&self) -> &'static str {
        "priority"
    }
}
