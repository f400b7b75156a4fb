//! Unit tests for pt-behavior.

#[cfg(test)]
mod helpers {
    use std::sync::{Arc, Mutex};

    use pt_agent::{ParticleHandle, ParticleStore, ParticleStoreBuilder};
    use pt_core::{ParticleId, ParticleKind, Rect, SimRng, TeamId, Vec2};
    use pt_spatial::QuadTree;

    use crate::{Behavior, BtResult, DecisionContext, Node, Status, collect_neighbors};

    /// A store, an index over it and an RNG, with one cell at the origin
    /// doing the deciding.
    pub struct World {
        pub store: ParticleStore,
        pub index: QuadTree<ParticleHandle>,
        pub rng: SimRng,
        pub me: ParticleId,
    }

    impl World {
        pub fn new() -> Self {
            Self::with_pool(64)
        }

        pub fn with_pool(pool_size: usize) -> Self {
            let mut store = ParticleStoreBuilder::new(pool_size).build();
            let me = store.spawn_at(ParticleKind::Cell, Vec2::ZERO).unwrap();
            let index = QuadTree::new(Rect::centered(500.0), 8, 8).unwrap();
            let mut world = Self { store, index, rng: SimRng::new(7), me };
            world.rebuild();
            world
        }

        /// Add a particle and re-index.
        pub fn add(&mut self, kind: ParticleKind, at: Vec2) -> ParticleId {
            let id = self.store.spawn_at(kind, at).unwrap();
            self.rebuild();
            id
        }

        pub fn add_enemy(&mut self, at: Vec2, energy: f32) -> ParticleId {
            let id = self.add(ParticleKind::Cell, at);
            self.store.team[id.index()] = TeamId(1);
            self.store.energy[id.index()] = energy;
            id
        }

        pub fn rebuild(&mut self) {
            self.index.clear();
            for &id in self.store.population() {
                if self.store.is_alive(id) {
                    let at = self.store.position[id.index()];
                    self.index.insert(self.store.handle(id), at).unwrap();
                }
            }
        }

        pub fn ctx(&mut self) -> DecisionContext<'_> {
            self.ctx_dt(0.1)
        }

        pub fn ctx_dt(&mut self, dt: f32) -> DecisionContext<'_> {
            let mut neighbors = Vec::new();
            let radius = self.store.sight_range[self.me.index()];
            collect_neighbors(&self.store, &self.index, self.me, radius, &mut neighbors);
            DecisionContext::new(&mut self.store, &self.index, &mut self.rng, self.me, neighbors, dt)
        }

        pub fn mine(&self) -> usize {
            self.me.index()
        }
    }

    pub type Log = Arc<Mutex<Vec<String>>>;

    pub fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn count(log: &Log, event: &str) -> usize {
        log.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    /// Leaf that plays back a fixed list of results, one per start or
    /// continue, repeating the last one.  The position in the script carries
    /// over across restarts.
    pub struct Scripted {
        tag: &'static str,
        script: Vec<Status>,
        step: usize,
        log: Log,
    }

    impl Scripted {
        pub fn new(tag: &'static str, script: &[Status], log: &Log) -> Self {
            Self { tag, script: script.to_vec(), step: 0, log: Arc::clone(log) }
        }

        pub fn node(tag: &'static str, script: &[Status], log: &Log) -> Node {
            Node::new(Self::new(tag, script, log)).boxed()
        }

        fn record(&self, event: &str) {
            self.log.lock().unwrap().push(format!("{}:{event}", self.tag));
        }

        fn next(&mut self, event: &str) -> Status {
            self.record(event);
            let status = self.script[self.step.min(self.script.len() - 1)];
            self.step += 1;
            status
        }
    }

    impl Behavior for Scripted {
        fn on_start(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
            Ok(self.next("start"))
        }

        fn on_continue(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
            Ok(self.next("continue"))
        }

        fn on_reset(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
            self.record("reset");
            Ok(())
        }

        fn on_interrupt(&mut self, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
            self.record("interrupt");
            Ok(())
        }

        fn on_complete(&mut self, status: Status, _ctx: &mut DecisionContext<'_>) -> BtResult<()> {
            self.record(&format!("complete({status})"));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    pub use crate::Status::{Failure as F, Running as R, Success as S};
}

// ── Node lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::helpers::{F, R, S, Scripted, World, count, log};
    use crate::{BehaviorError, Node, NodeState};

    #[test]
    fn reset_then_start_completes() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[S], &log));
        assert_eq!(node.state(), NodeState::New);

        let mut ctx = w.ctx();
        node.reset(&mut ctx).unwrap();
        assert_eq!(node.state(), NodeState::Ready);
        assert_eq!(node.start(&mut ctx).unwrap(), S);
        assert_eq!(node.state(), NodeState::Successful);
        assert_eq!(count(&log, "a:complete(success)"), 1);
    }

    #[test]
    fn running_node_is_resumed() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[R, R, F], &log));
        let mut ctx = w.ctx();

        assert_eq!(node.restart(&mut ctx).unwrap(), R);
        assert_eq!(node.state(), NodeState::Running);
        assert_eq!(node.resume(&mut ctx).unwrap(), R);
        assert_eq!(node.resume(&mut ctx).unwrap(), F);
        assert_eq!(node.state(), NodeState::Failed);
        assert_eq!(count(&log, "a:start"), 1);
        assert_eq!(count(&log, "a:continue"), 2);
    }

    #[test]
    fn start_from_new_is_rejected() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[S], &log));
        let err = node.start(&mut w.ctx()).unwrap_err();
        assert!(matches!(
            err,
            BehaviorError::InvalidTransition { op: "start", state: NodeState::New, .. }
        ));
    }

    #[test]
    fn continue_requires_running() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[S], &log));
        let mut ctx = w.ctx();
        node.restart(&mut ctx).unwrap();
        let err = node.resume(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            BehaviorError::InvalidTransition { op: "continue", state: NodeState::Successful, .. }
        ));
    }

    #[test]
    fn reset_while_running_is_rejected() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[R], &log));
        let mut ctx = w.ctx();
        node.restart(&mut ctx).unwrap();
        assert!(node.reset(&mut ctx).is_err());
        assert_eq!(node.state(), NodeState::Running);
    }

    #[test]
    fn interrupt_fails_a_running_node() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[R], &log));
        let mut ctx = w.ctx();
        node.restart(&mut ctx).unwrap();
        node.interrupt(&mut ctx).unwrap();
        assert_eq!(node.state(), NodeState::Failed);
        assert_eq!(count(&log, "a:interrupt"), 1);
        // Completion hooks only fire for start / continue results.
        assert_eq!(count(&log, "a:complete(failure)"), 0);
    }

    #[test]
    fn interrupt_is_a_noop_when_complete() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[S], &log));
        let mut ctx = w.ctx();
        node.restart(&mut ctx).unwrap();
        node.interrupt(&mut ctx).unwrap();
        assert_eq!(node.state(), NodeState::Successful);
        assert_eq!(count(&log, "a:interrupt"), 0);
    }

    #[test]
    fn interrupt_before_start_is_rejected() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[S], &log));
        let mut ctx = w.ctx();
        node.reset(&mut ctx).unwrap();
        assert!(node.interrupt(&mut ctx).is_err());
    }

    #[test]
    fn force_restart_interrupts_first() {
        let mut w = World::new();
        let log = log();
        let mut node = Node::new(Scripted::new("a", &[R, S], &log));
        let mut ctx = w.ctx();
        node.restart(&mut ctx).unwrap();
        assert_eq!(node.force_restart(&mut ctx).unwrap(), S);
        assert_eq!(count(&log, "a:interrupt"), 1);
        assert_eq!(count(&log, "a:start"), 2);
    }
}

// ── Composites ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod composites {
    use super::helpers::{F, R, S, Scripted, World, count, log};
    use crate::{BehaviorError, Node, NodeState, Parallel, PriorityParallel, Selector, Sequence, Status};

    #[test]
    fn sequence_suspends_on_running_child() {
        let mut w = World::new();
        let log = log();
        let mut seq = Node::new(
            Sequence::new(vec![
                Scripted::node("a", &[S], &log),
                Scripted::node("b", &[S], &log),
                Scripted::node("c", &[R, S], &log),
            ])
            .unwrap(),
        );
        let mut ctx = w.ctx();
        assert_eq!(seq.restart(&mut ctx).unwrap(), R);
        assert_eq!(seq.behavior().active(), 2);
        assert_eq!(seq.state(), NodeState::Running);

        assert_eq!(seq.resume(&mut ctx).unwrap(), S);
        assert_eq!(count(&log, "a:start"), 1);
        assert_eq!(count(&log, "c:continue"), 1);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut w = World::new();
        let log = log();
        let mut seq = Node::new(
            Sequence::new(vec![
                Scripted::node("a", &[S], &log),
                Scripted::node("b", &[F], &log),
                Scripted::node("c", &[S], &log),
            ])
            .unwrap(),
        );
        assert_eq!(seq.restart(&mut w.ctx()).unwrap(), F);
        assert_eq!(seq.behavior().active(), 1);
        assert_eq!(count(&log, "c:start"), 0);
    }

    #[test]
    fn selector_takes_first_success() {
        let mut w = World::new();
        let log = log();
        let mut sel = Node::new(
            Selector::new(vec![Scripted::node("a", &[F], &log), Scripted::node("b", &[S], &log)]).unwrap(),
        );
        assert_eq!(sel.restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(sel.behavior().selected(), 1);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let mut w = World::new();
        let log = log();
        let mut sel = Node::new(
            Selector::new(vec![Scripted::node("a", &[F], &log), Scripted::node("b", &[F], &log)]).unwrap(),
        );
        assert_eq!(sel.restart(&mut w.ctx()).unwrap(), F);
        assert_eq!(sel.behavior().selected(), 2);
    }

    #[test]
    fn selector_moves_on_when_running_child_fails() {
        let mut w = World::new();
        let log = log();
        let mut sel = Node::new(
            Selector::new(vec![Scripted::node("a", &[R, F], &log), Scripted::node("b", &[S], &log)]).unwrap(),
        );
        let mut ctx = w.ctx();
        assert_eq!(sel.restart(&mut ctx).unwrap(), R);
        assert_eq!(sel.behavior().selected(), 0);
        assert_eq!(sel.resume(&mut ctx).unwrap(), S);
        assert_eq!(sel.behavior().selected(), 1);
    }

    #[test]
    fn empty_composites_are_rejected() {
        assert!(matches!(Sequence::new(vec![]), Err(BehaviorError::EmptyComposite("sequence"))));
        assert!(matches!(Selector::new(vec![]), Err(BehaviorError::EmptyComposite("selector"))));
        assert!(matches!(PriorityParallel::new(vec![]), Err(BehaviorError::EmptyComposite("priority"))));
        assert!(matches!(Parallel::all(vec![]), Err(BehaviorError::EmptyComposite("parallel"))));
    }

    #[test]
    fn parallel_waits_for_every_child() {
        let mut w = World::new();
        let log = log();
        let mut par = Node::new(
            Parallel::all(vec![Scripted::node("a", &[S], &log), Scripted::node("b", &[R, S], &log)]).unwrap(),
        );
        let mut ctx = w.ctx();
        assert_eq!(par.restart(&mut ctx).unwrap(), R);
        assert_eq!(par.resume(&mut ctx).unwrap(), S);
        assert_eq!(par.behavior().successes(), 2);
        // The finished child is not driven again.
        assert_eq!(count(&log, "a:start") + count(&log, "a:continue"), 1);
    }

    #[test]
    fn parallel_success_threshold() {
        let mut w = World::new();
        let log = log();
        let children = || vec![Scripted::node("a", &[S], &log), Scripted::node("b", &[F], &log)];
        let mut ctx = w.ctx();

        let mut lenient = Node::new(Parallel::new(children(), 1, 1).unwrap());
        assert_eq!(lenient.restart(&mut ctx).unwrap(), S);

        let mut strict = Node::new(Parallel::all(children()).unwrap());
        assert_eq!(strict.restart(&mut ctx).unwrap(), F);
        assert_eq!(strict.behavior().failures(), 1);
    }

    #[test]
    fn parallel_two_of_three() {
        let mut w = World::new();
        let log = log();
        let mut ctx = w.ctx();
        let mut run = |results: [Status; 3]| {
            let children = results.iter().map(|r| Scripted::node("c", &[*r], &log)).collect();
            let mut par = Node::new(Parallel::new(children, 2, 2).unwrap());
            par.restart(&mut ctx).unwrap()
        };
        assert_eq!(run([S, S, F]), S);
        assert_eq!(run([S, F, F]), F);
    }

    #[test]
    fn parallel_counters_reset_between_runs() {
        let mut w = World::new();
        let log = log();
        let mut par = Node::new(
            Parallel::new(vec![Scripted::node("a", &[S], &log), Scripted::node("b", &[F], &log)], 1, 1).unwrap(),
        );
        let mut ctx = w.ctx();
        par.restart(&mut ctx).unwrap();
        par.restart(&mut ctx).unwrap();
        assert_eq!(par.behavior().successes(), 1);
        assert_eq!(par.behavior().failures(), 1);
    }

    #[test]
    fn parallel_rejects_unreachable_threshold() {
        let log = log();
        let r = Parallel::new(vec![Scripted::node("a", &[S], &log)], 2, 1);
        assert!(matches!(r, Err(BehaviorError::InvalidParam { .. })));
    }

    #[test]
    fn priority_preempts_lower_running_child() {
        let mut w = World::new();
        let log = log();
        let mut pri = Node::new(
            PriorityParallel::new(vec![Scripted::node("hi", &[F, S], &log), Scripted::node("lo", &[R], &log)])
                .unwrap(),
        );
        let mut ctx = w.ctx();
        assert_eq!(pri.restart(&mut ctx).unwrap(), R);
        assert_eq!(pri.behavior().winner(), Some(1));

        assert_eq!(pri.resume(&mut ctx).unwrap(), S);
        assert_eq!(pri.behavior().winner(), Some(0));
        assert_eq!(count(&log, "lo:interrupt"), 1);
        assert_eq!(pri.behavior().children()[1].state(), NodeState::Failed);
    }

    #[test]
    fn priority_keeps_running_winner() {
        let mut w = World::new();
        let log = log();
        let mut pri = Node::new(
            PriorityParallel::new(vec![Scripted::node("hi", &[F], &log), Scripted::node("lo", &[R], &log)])
                .unwrap(),
        );
        let mut ctx = w.ctx();
        pri.restart(&mut ctx).unwrap();
        pri.resume(&mut ctx).unwrap();
        assert_eq!(count(&log, "lo:start"), 1);
        assert_eq!(count(&log, "lo:continue"), 1);
        assert_eq!(count(&log, "lo:interrupt"), 0);
    }
}

// ── Decorators ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decorators {
    use std::sync::{Arc, Mutex};

    use pt_core::{ParticleKind, Vec2};

    use super::helpers::{F, R, S, Scripted, World, count, log};
    use crate::{
        BehaviorError, Filter, Interrupter, Invert, Nearest, Node, NodeState, OnlyKinds, Repeat, RepeatPolicy,
        Status, Wait, action,
    };

    #[test]
    fn invert_swaps_outcomes() {
        let mut w = World::new();
        let log = log();
        let mut ctx = w.ctx();
        let mut inv = Node::new(Invert::new(Scripted::node("a", &[S], &log)));
        assert_eq!(inv.restart(&mut ctx).unwrap(), F);
        let mut inv = Node::new(Invert::new(Scripted::node("b", &[F], &log)));
        assert_eq!(inv.restart(&mut ctx).unwrap(), S);
        let mut inv = Node::new(Invert::new(Scripted::node("c", &[R, S], &log)));
        assert_eq!(inv.restart(&mut ctx).unwrap(), R);
        assert_eq!(inv.resume(&mut ctx).unwrap(), F);
    }

    #[test]
    fn repeat_forever_until_interrupted() {
        let mut w = World::new();
        let log = log();
        let mut rep = Node::new(Repeat::forever(Scripted::node("a", &[S], &log)));
        let mut ctx = w.ctx();
        assert_eq!(rep.restart(&mut ctx).unwrap(), R);
        for _ in 0..3 {
            assert_eq!(rep.resume(&mut ctx).unwrap(), R);
        }
        assert_eq!(rep.behavior().completed(), 3);
        assert_eq!(count(&log, "a:start"), 4);

        rep.interrupt(&mut ctx).unwrap();
        assert_eq!(rep.state(), NodeState::Failed);
    }

    #[test]
    fn repeat_times_stops_with_success() {
        let mut w = World::new();
        let log = log();
        let mut rep = Node::new(Repeat::new(Scripted::node("a", &[F], &log), RepeatPolicy::Times(2)));
        let mut ctx = w.ctx();
        assert_eq!(rep.restart(&mut ctx).unwrap(), R);
        assert_eq!(rep.resume(&mut ctx).unwrap(), R);
        assert_eq!(rep.resume(&mut ctx).unwrap(), S);
        assert_eq!(rep.state(), NodeState::Successful);
        assert_eq!(count(&log, "a:start"), 2);
    }

    #[test]
    fn repeat_until_failure() {
        let mut w = World::new();
        let log = log();
        let mut rep = Node::new(Repeat::new(Scripted::node("a", &[S, S, F], &log), RepeatPolicy::UntilFailure));
        let mut ctx = w.ctx();
        rep.restart(&mut ctx).unwrap();
        assert_eq!(rep.resume(&mut ctx).unwrap(), R);
        assert_eq!(rep.resume(&mut ctx).unwrap(), R);
        assert_eq!(rep.resume(&mut ctx).unwrap(), S);
        assert_eq!(rep.behavior().completed(), 3);
    }

    #[test]
    fn repeat_resumes_running_child() {
        let mut w = World::new();
        let log = log();
        let mut rep = Node::new(Repeat::forever(Scripted::node("a", &[R, R, S], &log)));
        let mut ctx = w.ctx();
        rep.restart(&mut ctx).unwrap();
        rep.resume(&mut ctx).unwrap();
        rep.resume(&mut ctx).unwrap();
        assert_eq!(count(&log, "a:continue"), 2);
        assert_eq!(rep.behavior().completed(), 0);
    }

    #[test]
    fn interrupter_guard_failure_interrupts_child() {
        let mut w = World::new();
        let log = log();
        let mut int = Node::new(Interrupter::new(
            Scripted::node("guard", &[S, F], &log),
            Scripted::node("work", &[R], &log),
        ));
        let mut ctx = w.ctx();
        assert_eq!(int.restart(&mut ctx).unwrap(), R);
        assert_eq!(int.resume(&mut ctx).unwrap(), S);
        assert_eq!(count(&log, "work:interrupt"), 1);
        assert_eq!(int.behavior().child().state(), NodeState::Failed);
        assert_eq!(int.state(), NodeState::Successful);
    }

    #[test]
    fn interrupter_checks_guard_on_start() {
        let mut w = World::new();
        let log = log();
        let mut int = Node::new(
            Interrupter::with_fallback(
                Scripted::node("guard", &[F], &log),
                Scripted::node("work", &[R], &log),
                Status::Failure,
            )
            .unwrap(),
        );
        assert_eq!(int.restart(&mut w.ctx()).unwrap(), F);
        assert_eq!(count(&log, "work:start"), 0);
    }

    #[test]
    fn interrupter_rejects_running_fallback() {
        let log = log();
        let r = Interrupter::with_fallback(
            Scripted::node("guard", &[S], &log),
            Scripted::node("work", &[S], &log),
            Status::Running,
        );
        assert!(matches!(r, Err(BehaviorError::InvalidParam { .. })));
    }

    #[test]
    fn filter_narrows_and_restores_neighbors() {
        let mut w = World::new();
        w.add(ParticleKind::Food, Vec2::new(20.0, 0.0));
        w.add(ParticleKind::Food, Vec2::new(30.0, 0.0));
        w.add(ParticleKind::Cell, Vec2::new(40.0, 0.0));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let probe = {
            let seen = Arc::clone(&seen);
            action("probe", move |ctx| {
                let kinds: Vec<ParticleKind> = ctx.neighbors.iter().map(|n| ctx.kind_of(n)).collect();
                seen.lock().unwrap().push(kinds);
                Status::Success
            })
        };
        let mut filter = Node::new(Filter::new(OnlyKinds::cells(), probe));
        let mut ctx = w.ctx();
        assert_eq!(ctx.neighbors.len(), 3);
        assert_eq!(filter.restart(&mut ctx).unwrap(), S);
        assert_eq!(ctx.neighbors.len(), 3);
        assert_eq!(seen.lock().unwrap()[0], vec![ParticleKind::Cell]);
    }

    #[test]
    fn nearest_keeps_closest() {
        let mut w = World::new();
        w.add(ParticleKind::Food, Vec2::new(50.0, 0.0));
        let close = w.add(ParticleKind::Food, Vec2::new(0.0, 20.0));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let probe = {
            let seen = Arc::clone(&seen);
            action("probe", move |ctx| {
                seen.lock().unwrap().extend(ctx.neighbors.iter().map(|n| n.id()));
                Status::Success
            })
        };
        let mut filter = Node::new(Filter::new(Nearest(1), probe));
        filter.restart(&mut w.ctx()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![close]);
    }

    #[test]
    fn wait_counts_down_with_dt() {
        let mut w = World::new();
        let mut wait = Node::new(Wait::new(0.25));
        let mut ctx = w.ctx_dt(0.1);
        assert_eq!(wait.restart(&mut ctx).unwrap(), R);
        assert_eq!(wait.resume(&mut ctx).unwrap(), R);
        assert_eq!(wait.resume(&mut ctx).unwrap(), R);
        assert_eq!(wait.resume(&mut ctx).unwrap(), S);

        let mut instant = Node::new(Wait::new(0.0));
        assert_eq!(instant.restart(&mut ctx).unwrap(), S);
    }
}

// ── Factory & registry ────────────────────────────────────────────────────────

#[cfg(test)]
mod factory {
    use crate::{
        BehaviorError, Node, NodeFactory, NodeRegistry, NodeState, Status, TreeDefinition, build_factory, constant,
    };

    use super::helpers::{World, R};

    fn leaf(kind: &str) -> TreeDefinition {
        TreeDefinition::leaf(kind)
    }

    fn node(kind: &str, children: Vec<TreeDefinition>) -> TreeDefinition {
        TreeDefinition::node(kind, children)
    }

    fn compile(def: &TreeDefinition) -> Result<NodeFactory, BehaviorError> {
        build_factory(&NodeRegistry::with_stock(), def)
    }

    #[test]
    fn stock_cell_tree_compiles() {
        let def = TreeDefinition::stock_cell();
        assert_eq!(def.size(), 6);
        let factory = compile(&def).unwrap();
        assert_eq!(factory.make().name(), "priority");
        assert_eq!(factory.make().state(), NodeState::New);
    }

    #[test]
    fn instances_are_independent() {
        let mut w = World::new();
        let factory = compile(&node("sequence", vec![leaf("wait").with_param("seconds", 1.0)])).unwrap();
        let mut a = factory.make();
        let b = factory.make();
        assert_eq!(a.restart(&mut w.ctx()).unwrap(), R);
        assert_eq!(a.state(), NodeState::Running);
        assert_eq!(b.state(), NodeState::New);
    }

    #[test]
    fn unknown_kind() {
        let err = compile(&node("sequence", vec![leaf("teleport")])).unwrap_err();
        assert!(matches!(err, BehaviorError::UnknownKind(k) if k == "teleport"));
    }

    #[test]
    fn empty_composite() {
        let err = compile(&node("selector", vec![])).unwrap_err();
        assert!(matches!(err, BehaviorError::EmptyComposite("selector")));
    }

    #[test]
    fn decorator_arity() {
        let err = compile(&node("invert", vec![leaf("succeed"), leaf("fail")])).unwrap_err();
        assert!(matches!(err, BehaviorError::Arity { got: 2, .. }));

        let err = compile(&node("interrupter", vec![leaf("succeed")])).unwrap_err();
        assert!(matches!(err, BehaviorError::Arity { got: 1, .. }));

        let err = compile(&node("freeze", vec![leaf("succeed")])).unwrap_err();
        assert!(matches!(err, BehaviorError::Arity { got: 1, .. }));
    }

    #[test]
    fn parameter_validation() {
        let bad = [
            leaf("wait"),
            leaf("wait").with_param("seconds", -1.0),
            node("repeat", vec![leaf("succeed")]).with_param("times", 1.5),
            node("nearest", vec![leaf("succeed")]),
            node("parallel", vec![leaf("succeed")]).with_param("min_successful", 2.0),
            node("interrupter", vec![leaf("succeed"), leaf("succeed")]).with_param("fallback", 0.5),
        ];
        for def in &bad {
            let err = compile(def).unwrap_err();
            assert!(matches!(err, BehaviorError::InvalidParam { .. }), "{def:?} gave {err}");
        }
    }

    #[test]
    fn parameterised_decorators_build() {
        let mut w = World::new();
        let def = node("repeat", vec![leaf("succeed")]).with_param("times", 2.0);
        let mut rep = compile(&def).unwrap().make();
        let mut ctx = w.ctx();
        assert_eq!(rep.restart(&mut ctx).unwrap(), Status::Running);
        assert_eq!(rep.resume(&mut ctx).unwrap(), Status::Running);
        assert_eq!(rep.resume(&mut ctx).unwrap(), Status::Success);

        let def = node("interrupter", vec![leaf("fail"), leaf("random_walk")]).with_param("fallback", 0.0);
        let mut int = compile(&def).unwrap().make();
        assert_eq!(int.restart(&mut ctx).unwrap(), Status::Failure);
    }

    #[test]
    fn every_built_in_kind_makes_a_fresh_node() {
        let one = || vec![leaf("succeed")];
        let defs = [
            ("sequence", node("sequence", one())),
            ("selector", node("selector", one())),
            ("priority", node("priority", one())),
            ("parallel", node("parallel", vec![leaf("succeed"), leaf("succeed"), leaf("fail")])),
            ("repeat", node("repeat_until_failure", one())),
            ("invert", node("invert", one())),
            ("interrupter", node("interrupter", vec![leaf("succeed"), leaf("succeed")])),
            ("nearest", node("nearest", one()).with_param("count", 1.0)),
            ("only_kinds", node("only_cells", one())),
        ];
        for (name, def) in &defs {
            let made = compile(def).unwrap().make();
            assert_eq!(made.name(), *name, "{def:?}");
            assert_eq!(made.state(), NodeState::New);
        }
    }

    #[test]
    fn compiled_parallel_keeps_its_thresholds() {
        let mut w = World::new();
        let def = node("parallel", vec![leaf("succeed"), leaf("succeed"), leaf("fail")])
            .with_param("min_successful", 2.0)
            .with_param("max_failed", 2.0);
        assert_eq!(compile(&def).unwrap().make().restart(&mut w.ctx()).unwrap(), Status::Success);
    }

    #[test]
    fn custom_leaves_can_be_registered() {
        let mut registry = NodeRegistry::with_stock();
        registry.register_simple("idle", || constant(Status::Running));
        assert!(registry.kinds().contains(&"idle"));
        let factory = build_factory(&registry, &node("selector", vec![leaf("fail"), leaf("idle")])).unwrap();

        let mut w = World::new();
        assert_eq!(factory.make().restart(&mut w.ctx()).unwrap(), Status::Running);
    }

    #[test]
    fn registry_lists_stock_kinds() {
        let registry = NodeRegistry::with_stock();
        for kind in ["freeze", "seek_food", "fight", "split", "wait", "can_split"] {
            assert!(registry.contains(kind), "{kind}");
        }
        assert!(NodeRegistry::new().kinds().is_empty());
    }

    #[test]
    fn factory_from_closure() {
        let factory = NodeFactory::from_fn(|| constant(Status::Success));
        let copy = factory.clone();
        let a: Node = factory.make();
        let b: Node = copy.make();
        assert_eq!(a.state(), NodeState::New);
        assert_eq!(b.name(), "succeed");
    }
}

// ── Decision context ──────────────────────────────────────────────────────────

#[cfg(test)]
mod context {
    use pt_core::{ParticleKind, Vec2};

    use super::helpers::World;

    #[test]
    fn neighbors_sorted_and_exclude_self() {
        let mut w = World::new();
        let far = w.add(ParticleKind::Food, Vec2::new(80.0, 0.0));
        let near = w.add(ParticleKind::Food, Vec2::new(0.0, -10.0));
        w.add(ParticleKind::Food, Vec2::new(400.0, 0.0));

        let ctx = w.ctx();
        let ids: Vec<_> = ctx.neighbors.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![near, far]);
        assert_eq!(ctx.neighbors[0].dist_sq, 100.0);
    }

    #[test]
    fn dead_particles_are_not_neighbors() {
        let mut w = World::new();
        let food = w.add(ParticleKind::Food, Vec2::new(10.0, 0.0));
        // Killed after the index was built.
        w.store.kill(food).unwrap();
        assert!(w.ctx().neighbors.is_empty());
    }

    #[test]
    fn reinitialised_particles_are_not_neighbors_until_reindexed() {
        let mut w = World::new();
        let food = w.add(ParticleKind::Food, Vec2::new(10.0, 0.0));
        w.store.init_with_type(food, ParticleKind::DeadFood).unwrap();
        assert!(w.ctx().neighbors.is_empty());
        w.rebuild();
        assert_eq!(w.ctx().neighbors.len(), 1);
    }

    #[test]
    fn radius_query() {
        let mut w = World::new();
        w.add(ParticleKind::Food, Vec2::new(30.0, 0.0));
        w.add(ParticleKind::Food, Vec2::new(60.0, 0.0));
        let ctx = w.ctx();
        assert_eq!(ctx.neighbors_within_radius(45.0).len(), 1);
        assert_eq!(ctx.neighbors_within_radius(0.0).len(), 0);
    }
}

// ── Stock tasks ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod stock_tasks {
    use pt_core::{ParticleKind, Vec2};

    use super::helpers::{F, R, S, World};
    use crate::tasks::{Eat, Fight, Freeze, HuntWeak, RandomWalk, SeekFood, Split};
    use crate::{Node, NodeRegistry, Status, TreeDefinition, build_factory, task};

    /// Goal picking commits to each candidate with some probability; retry
    /// until it does.
    fn restart_until_running(node: &mut Node, w: &mut World) -> Status {
        for _ in 0..100 {
            let status = node.restart(&mut w.ctx()).unwrap();
            if status == R {
                return status;
            }
        }
        F
    }

    #[test]
    fn seek_food_heads_for_food() {
        let mut w = World::new();
        let food = w.add(ParticleKind::Food, Vec2::new(60.0, 0.0));
        let mut seek = task(SeekFood);
        assert_eq!(restart_until_running(&mut seek, &mut w), R);

        let me = w.mine();
        assert!(w.store.velocity[me].x > 0.0);
        assert!(w.store.velocity[me].y.abs() < 1e-4);
        assert_eq!(w.store.food_goal[me], Some(w.store.handle(food)));
    }

    #[test]
    fn seek_food_needs_food_in_sight() {
        let mut w = World::new();
        w.add(ParticleKind::Cell, Vec2::new(30.0, 0.0));
        assert_eq!(task(SeekFood).restart(&mut w.ctx()).unwrap(), F);
    }

    #[test]
    fn eating_food_grows_the_cell() {
        let mut w = World::new();
        let food = w.add(ParticleKind::Food, Vec2::new(5.0, 0.0));
        let me = w.mine();
        let (energy, size, max) = (w.store.energy[me], w.store.size[me], w.store.max_energy[me]);
        let value = w.store.food_value[food.index()];

        assert_eq!(task(Eat).restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(w.store.energy[me], energy + value);
        assert_eq!(w.store.size[me], size + 1.0);
        assert_eq!(w.store.max_energy[me], max + 1.0);
        assert_eq!(w.store.kind[food.index()], ParticleKind::DeadFood);
        assert!(w.store.is_alive(food));
    }

    #[test]
    fn oversized_cells_bank_energy() {
        let mut w = World::new();
        let me = w.mine();
        w.store.size[me] = crate::tasks::MAX_CELL_SIZE;
        let food = w.add(ParticleKind::Food, Vec2::new(5.0, 0.0));
        let before = w.store.energy[me];
        let value = w.store.food_value[food.index()];

        task(Eat).restart(&mut w.ctx()).unwrap();
        assert_eq!(w.store.size[me], crate::tasks::MAX_CELL_SIZE);
        assert_eq!(w.store.energy[me], before + value + crate::tasks::OVERSIZE_BONUS);
    }

    #[test]
    fn eating_a_corpse_removes_it() {
        let mut w = World::new();
        let corpse = w.add(ParticleKind::Corpse, Vec2::new(5.0, 0.0));
        assert_eq!(task(Eat).restart(&mut w.ctx()).unwrap(), S);
        assert!(!w.store.is_alive(corpse));
    }

    #[test]
    fn eat_without_contact_fails() {
        let mut w = World::new();
        w.add(ParticleKind::Food, Vec2::new(80.0, 0.0));
        assert_eq!(task(Eat).restart(&mut w.ctx()).unwrap(), F);
    }

    #[test]
    fn fight_turns_weak_enemy_into_corpse() {
        let mut w = World::new();
        let enemy = w.add_enemy(Vec2::new(5.0, 0.0), 9.0);
        let me = w.mine();
        let before = w.store.energy[me];

        assert_eq!(task(Fight).restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(w.store.kind[enemy.index()], ParticleKind::Corpse);
        assert!((w.store.energy[me] - (before - 3.0)).abs() < 1e-4);
    }

    #[test]
    fn fight_spares_teammates_and_strong_enemies() {
        let mut w = World::new();
        let mate = w.add(ParticleKind::Cell, Vec2::new(5.0, 0.0));
        w.store.energy[mate.index()] = 1.0;
        let strong = w.add_enemy(Vec2::new(-5.0, 0.0), 50.0);

        assert_eq!(task(Fight).restart(&mut w.ctx()).unwrap(), F);
        assert_eq!(w.store.kind[mate.index()], ParticleKind::Cell);
        assert_eq!(w.store.kind[strong.index()], ParticleKind::Cell);
    }

    #[test]
    fn hunt_weak_chases_prey() {
        let mut w = World::new();
        let prey = w.add_enemy(Vec2::new(0.0, 30.0), 5.0);
        let mut hunt = task(HuntWeak);
        assert_eq!(restart_until_running(&mut hunt, &mut w), R);

        let me = w.mine();
        assert!(w.store.velocity[me].y > 0.0);
        assert_eq!(w.store.hunt_goal[me], Some(w.store.handle(prey)));
    }

    #[test]
    fn split_shares_energy() {
        let mut w = World::new();
        let me = w.mine();
        w.store.energy[me] = 80.0;

        assert_eq!(task(Split).restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(w.store.alive_count(), 2);
        let child = *w.store.population().last().unwrap();
        assert_eq!(w.store.energy[me], 40.0);
        assert_eq!(w.store.energy[child.index()], 40.0);
        assert_eq!(w.store.team[child.index()], w.store.team[me]);
        assert_eq!(w.store.kind[child.index()], ParticleKind::Cell);
    }

    #[test]
    fn split_needs_energy_and_room() {
        let mut w = World::new();
        let me = w.mine();
        w.store.energy[me] = 30.0;
        assert_eq!(task(Split).restart(&mut w.ctx()).unwrap(), F);

        let mut full = World::with_pool(1);
        let me = full.mine();
        full.store.energy[me] = 80.0;
        assert_eq!(task(Split).restart(&mut full.ctx()).unwrap(), F);
        assert_eq!(full.store.energy[me], 80.0);
    }

    #[test]
    fn random_walk_runs_for_a_while() {
        let mut w = World::new();
        let mut walk = Node::new(RandomWalk::default()).boxed();
        let me = w.mine();
        assert_eq!(walk.restart(&mut w.ctx_dt(0.5)).unwrap(), R);
        let speed = w.store.speed[me];
        assert!((w.store.velocity[me].length() - speed).abs() < 1e-3);

        assert_eq!(walk.resume(&mut w.ctx_dt(0.5)).unwrap(), R);
        assert_eq!(walk.resume(&mut w.ctx_dt(0.5)).unwrap(), R);
        assert_eq!(walk.resume(&mut w.ctx_dt(0.5)).unwrap(), S);
    }

    #[test]
    fn freeze_stops() {
        let mut w = World::new();
        let me = w.mine();
        w.store.velocity[me] = Vec2::new(3.0, 4.0);
        assert_eq!(task(Freeze).restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(w.store.velocity[me], Vec2::ZERO);
    }

    #[test]
    fn stock_tree_wanders_when_idle() {
        let mut w = World::new();
        let me = w.mine();
        // Too poor to split, nothing in sight.
        w.store.energy[me] = 40.0;
        let factory = build_factory(&NodeRegistry::with_stock(), &TreeDefinition::stock_cell()).unwrap();
        let mut tree = factory.make();
        assert_eq!(tree.restart(&mut w.ctx()).unwrap(), R);
        assert!(w.store.velocity[me].length() > 0.0);
    }

    #[test]
    fn stock_tree_splits_first() {
        let mut w = World::new();
        let me = w.mine();
        w.store.energy[me] = 90.0;
        let factory = build_factory(&NodeRegistry::with_stock(), &TreeDefinition::stock_cell()).unwrap();
        assert_eq!(factory.make().restart(&mut w.ctx()).unwrap(), S);
        assert_eq!(w.store.alive_count(), 2);
    }

    #[test]
    fn condition_leaves() {
        let mut w = World::new();
        let me = w.mine();
        let registry = NodeRegistry::with_stock();
        let hungry = build_factory(&registry, &TreeDefinition::leaf("is_hungry")).unwrap();

        w.store.energy[me] = 10.0;
        assert_eq!(hungry.make().restart(&mut w.ctx()).unwrap(), S);
        w.store.energy[me] = 90.0;
        assert_eq!(hungry.make().restart(&mut w.ctx()).unwrap(), F);
    }
}
