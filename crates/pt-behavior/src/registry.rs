//! Leaf registry: maps definition kind names to leaf constructors.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::task::{condition, constant, task};
use crate::tasks::{self, Eat, Fight, Freeze, HuntWeak, RandomWalk, SeekFood, Split};
use crate::{BehaviorError, BtResult, Node, Params, Status, Wait};

/// Produces a fresh leaf node.  Shared by every tree instantiated from one
/// compiled definition.
pub type LeafMaker = Arc<dyn Fn() -> Node + Send + Sync>;

/// Validates a leaf's parameters and returns its maker.
pub type LeafCompiler = Box<dyn Fn(&Params) -> BtResult<LeafMaker> + Send + Sync>;

/// String kind → leaf constructor.
///
/// Composite and decorator kinds are built into the compiler and cannot be
/// overridden here.
#[derive(Default)]
pub struct NodeRegistry {
    leaves: FxHashMap<String, LeafCompiler>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every stock particle task and condition:
    ///
    /// | Kind              | Leaf                                         |
    /// |-------------------|----------------------------------------------|
    /// | `freeze`          | [`Freeze`]                                   |
    /// | `random_walk`     | [`RandomWalk`]                               |
    /// | `seek_food`       | [`SeekFood`]                                 |
    /// | `eat`             | [`Eat`]                                      |
    /// | `hunt_weak`       | [`HuntWeak`]                                 |
    /// | `fight`           | [`Fight`]                                    |
    /// | `split`           | [`Split`]                                    |
    /// | `sees_food`       | condition                                    |
    /// | `sees_weak_enemy` | condition                                    |
    /// | `is_hungry`       | condition                                    |
    /// | `can_split`       | condition                                    |
    /// | `wait`            | [`Wait`] (param `seconds`, required)         |
    /// | `succeed`, `fail` | constant result                              |
    pub fn with_stock() -> Self {
        let mut r = Self::new();
        r.register_simple("freeze", || task(Freeze));
        r.register_simple("random_walk", || Node::new(RandomWalk::default()).boxed());
        r.register_simple("seek_food", || task(SeekFood));
        r.register_simple("eat", || task(Eat));
        r.register_simple("hunt_weak", || task(HuntWeak));
        r.register_simple("fight", || task(Fight));
        r.register_simple("split", || task(Split));
        r.register_simple("sees_food", || condition("sees_food", tasks::sees_food));
        r.register_simple("sees_weak_enemy", || condition("sees_weak_enemy", tasks::sees_weak_enemy));
        r.register_simple("is_hungry", || condition("is_hungry", tasks::is_hungry));
        r.register_simple("can_split", || condition("can_split", tasks::can_split));
        r.register_simple("succeed", || constant(Status::Success));
        r.register_simple("fail", || constant(Status::Failure));
        r.register("wait", |params| {
            let seconds = require_param("wait", params, "seconds")?;
            if !(seconds >= 0.0 && seconds.is_finite()) {
                return Err(invalid("wait", "seconds", format!("must be a non-negative number, got {seconds}")));
            }
            Ok(Arc::new(move || Node::new(Wait::new(seconds)).boxed()))
        });
        r
    }

    /// Register a leaf kind whose constructor inspects its parameters.
    /// Replaces any previous registration of `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, compile: F)
    where
        F: Fn(&Params) -> BtResult<LeafMaker> + Send + Sync + 'static,
    {
        self.leaves.insert(kind.into(), Box::new(compile));
    }

    /// Register a parameterless leaf kind.
    pub fn register_simple<F>(&mut self, kind: impl Into<String>, make: F)
    where
        F: Fn() -> Node + Send + Sync + 'static,
    {
        let make: LeafMaker = Arc::new(make);
        self.register(kind, move |_| Ok(Arc::clone(&make)));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.leaves.contains_key(kind)
    }

    /// Registered leaf kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.leaves.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub(crate) fn compile_leaf(&self, kind: &str, params: &Params) -> BtResult<LeafMaker> {
        let compile = self
            .leaves
            .get(kind)
            .ok_or_else(|| BehaviorError::UnknownKind(kind.to_owned()))?;
        compile(params)
    }
}

// ── Parameter helpers ─────────────────────────────────────────────────────────

pub(crate) fn invalid(kind: &str, param: &str, reason: String) -> BehaviorError {
    BehaviorError::InvalidParam { kind: kind.to_owned(), param: param.to_owned(), reason }
}

pub(crate) fn require_param(kind: &str, params: &Params, name: &str) -> BtResult<f32> {
    params
        .get(name)
        .copied()
        .ok_or_else(|| invalid(kind, name, "missing".into()))
}

/// Read an optional non-negative integer parameter.
pub(crate) fn count_param(kind: &str, params: &Params, name: &str) -> BtResult<Option<usize>> {
    let Some(&v) = params.get(name) else {
        return Ok(None);
    };
    if v < 0.0 || v.fract() != 0.0 || !v.is_finite() {
        return Err(invalid(kind, name, format!("must be a non-negative integer, got {v}")));
    }
    Ok(Some(v as usize))
}
