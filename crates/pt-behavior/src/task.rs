//! Leaf nodes.
//!
//! [`Task`] is the template most leaves implement: a precondition checked
//! on start, a validity check on every later step, and an `execute` body
//! shared by both.  [`TaskNode`] adapts any `Task` to [`Behavior`].

use crate::{Behavior, BtResult, DecisionContext, Node, Status};

/// A leaf with guard checks.
pub trait Task: Send {
    /// Checked before the first `execute`.  Defaults to `check_valid`.
    fn check_precondition(&self, ctx: &DecisionContext<'_>) -> bool {
        self.check_valid(ctx)
    }

    /// Checked before every later `execute`.
    fn check_valid(&self, _ctx: &DecisionContext<'_>) -> bool {
        true
    }

    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status>;

    /// Called when the node is reset.
    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "task"
    }
}

/// Adapts a [`Task`] to the node hooks.
pub struct TaskNode<T: Task>(pub T);

impl<T: Task> Behavior for TaskNode<T> {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.0.check_precondition(ctx) {
            return Ok(Status::Failure);
        }
        self.0.execute(ctx)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        if !self.0.check_valid(ctx) {
            return Ok(Status::Failure);
        }
        self.0.execute(ctx)
    }

    fn on_reset(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
        self.0.reset();
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.0.name()
    }
}

/// Wrap a task into a boxed tree node.
pub fn task<T: Task + 'static>(t: T) -> Node {
    Node::new(TaskNode(t)).boxed()
}

// ── Closure leaves ────────────────────────────────────────────────────────────

/// Instant predicate: Success if it holds, Failure otherwise.
pub struct Condition<F> {
    name: &'static str,
    predicate: F,
}

impl<F> Condition<F>
where
    F: FnMut(&DecisionContext<'_>) -> bool + Send,
{
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self { name, predicate }
    }
}

impl<F> Task for Condition<F>
where
    F: FnMut(&DecisionContext<'_>) -> bool + Send,
{
    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        Ok(if (self.predicate)(ctx) { Status::Success } else { Status::Failure })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Leaf running a closure on every step; the closure reports the status.
pub struct Action<F> {
    name: &'static str,
    body: F,
}

impl<F> Action<F>
where
    F: FnMut(&mut DecisionContext<'_>) -> Status + Send,
{
    pub fn new(name: &'static str, body: F) -> Self {
        Self { name, body }
    }
}

impl<F> Task for Action<F>
where
    F: FnMut(&mut DecisionContext<'_>) -> Status + Send,
{
    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        Ok((self.body)(ctx))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Shorthand for a boxed [`Condition`] node.
pub fn condition<F>(name: &'static str, predicate: F) -> Node
where
    F: FnMut(&DecisionContext<'_>) -> bool + Send + 'static,
{
    task(Condition::new(name, predicate))
}

/// Shorthand for a boxed [`Action`] node.
pub fn action<F>(name: &'static str, body: F) -> Node
where
    F: FnMut(&mut DecisionContext<'_>) -> Status + Send + 'static,
{
    task(Action::new(name, body))
}

/// Leaf that always reports `status`.
pub fn constant(status: Status) -> Node {
    action(match status {
        Status::Success => "succeed",
        Status::Running => "running",
        Status::Failure => "fail",
    }, move |_| status)
}

// ── Wait ──────────────────────────────────────────────────────────────────────

/// Stays Running until `seconds` of decision time have passed, then
/// succeeds.  Counts down with the context's `dt`.
pub struct Wait {
    seconds: f32,
    remaining: f32,
}

impl Wait {
    pub fn new(seconds: f32) -> Self {
        Self { seconds, remaining: seconds }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Behavior for Wait {
    fn on_start(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.remaining = self.seconds;
        Ok(if self.remaining > 0.0 { Status::Running } else { Status::Success })
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.remaining -= ctx.dt;
        Ok(if self.remaining > 0.0 { Status::Running } else { Status::Success })
    }

    fn name(&self) -> &'static str {
        "wait"
    }
}
