//! Definition compiler and the shareable node factory it produces.
//!
//! [`build_factory`] checks a whole [`TreeDefinition`] up front (kind
//! names, child counts, parameter values) and turns it into an immutable
//! `Blueprint`.  Instantiating a blueprint cannot fail, so
//! [`NodeFactory::make`] returns a plain [`Node`].

use std::sync::Arc;

use tracing::debug;

use crate::composite::{Parallel, PriorityParallel, Selector, Sequence};
use crate::decorator::{Filter, Interrupter, Invert, Nearest, OnlyKinds, Repeat, RepeatPolicy};
use crate::registry::{count_param, invalid, LeafMaker};
use crate::{BehaviorError, BtResult, Node, NodeRegistry, Status, TreeDefinition};

/// Compiled, immutable form of a definition node.
enum Blueprint {
    Sequence(Vec<Blueprint>),
    Selector(Vec<Blueprint>),
    Parallel {
        children: Vec<Blueprint>,
        min_successful: usize,
        max_failed: usize,
    },
    Priority(Vec<Blueprint>),
    Repeat {
        policy: RepeatPolicy,
        child: Box<Blueprint>,
    },
    Invert(Box<Blueprint>),
    Interrupter {
        condition: Box<Blueprint>,
        child: Box<Blueprint>,
        fallback: Status,
    },
    Nearest {
        count: usize,
        child: Box<Blueprint>,
    },
    OnlyKinds {
        filter: OnlyKinds,
        child: Box<Blueprint>,
    },
    Leaf(LeafMaker),
}

impl Blueprint {
    /// Every check happened in [`compile`], so nothing here can fail.
    fn make(&self) -> Node {
        match self {
            Blueprint::Sequence(c) => Node::new(Sequence::new_unchecked(make_all(c))).boxed(),
            Blueprint::Selector(c) => Node::new(Selector::new_unchecked(make_all(c))).boxed(),
            Blueprint::Parallel { children, min_successful, max_failed } => {
                Node::new(Parallel::new_unchecked(make_all(children), *min_successful, *max_failed)).boxed()
            }
            Blueprint::Priority(c) => Node::new(PriorityParallel::new_unchecked(make_all(c))).boxed(),
            Blueprint::Repeat { policy, child } => Node::new(Repeat::new(child.make(), *policy)).boxed(),
            Blueprint::Invert(child) => Node::new(Invert::new(child.make())).boxed(),
            Blueprint::Interrupter { condition, child, fallback } => {
                Node::new(Interrupter::new_unchecked(condition.make(), child.make(), *fallback)).boxed()
            }
            Blueprint::Nearest { count, child } => Node::new(Filter::new(Nearest(*count), child.make())).boxed(),
            Blueprint::OnlyKinds { filter, child } => Node::new(Filter::new(filter.clone(), child.make())).boxed(),
            Blueprint::Leaf(make) => make(),
        }
    }
}

fn make_all(children: &[Blueprint]) -> Vec<Node> {
    children.iter().map(Blueprint::make).collect()
}

// ── NodeFactory ───────────────────────────────────────────────────────────────

/// Cheaply clonable handle to a compiled definition.
///
/// Every call to [`make`](Self::make) builds an independent node tree; many
/// particles share one factory but never a node.
#[derive(Clone)]
pub struct NodeFactory {
    root: Arc<Blueprint>,
}

impl NodeFactory {
    /// Factory around an arbitrary constructor.  Useful for trees built in
    /// code rather than from a definition.
    pub fn from_fn<F>(make: F) -> Self
    where
        F: Fn() -> Node + Send + Sync + 'static,
    {
        Self { root: Arc::new(Blueprint::Leaf(Arc::new(make))) }
    }

    /// A fresh tree in state New.
    pub fn make(&self) -> Node {
        self.root.make()
    }
}

impl std::fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeFactory").finish_non_exhaustive()
    }
}

// ── Compiler ──────────────────────────────────────────────────────────────────

/// Validate `definition` against `registry` and compile it.
///
/// Built-in kinds:
///
/// | Kind                   | Children            | Params                            |
/// |------------------------|---------------------|-----------------------------------|
/// | `sequence`             | ≥ 1                 |                                   |
/// | `selector`             | ≥ 1                 |                                   |
/// | `parallel`             | ≥ 1                 | `min_successful` (all), `max_failed` (1) |
/// | `priority`             | ≥ 1                 |                                   |
/// | `repeat`               | 1                   | `times` (forever if absent)       |
/// | `repeat_until_failure` | 1                   |                                   |
/// | `repeat_until_success` | 1                   |                                   |
/// | `invert`               | 1                   |                                   |
/// | `interrupter`          | 2: condition, child | `fallback` (1 = success, 0 = failure) |
/// | `nearest`              | 1                   | `count` (required)                |
/// | `only_food`            | 1                   |                                   |
/// | `only_cells`           | 1                   |                                   |
///
/// Any other kind is looked up in `registry` as a leaf and must have no
/// children.
pub fn build_factory(registry: &NodeRegistry, definition: &TreeDefinition) -> BtResult<NodeFactory> {
    let root = compile(registry, definition)?;
    debug!(root = %definition.kind, nodes = definition.size(), "compiled behavior definition");
    Ok(NodeFactory { root: Arc::new(root) })
}

fn compile(registry: &NodeRegistry, def: &TreeDefinition) -> BtResult<Blueprint> {
    let kind = def.kind.as_str();
    let params = &def.params;
    Ok(match kind {
        "sequence" => Blueprint::Sequence(compile_many(registry, def)?),
        "selector" => Blueprint::Selector(compile_many(registry, def)?),
        "priority" => Blueprint::Priority(compile_many(registry, def)?),
        "parallel" => {
            let children = compile_many(registry, def)?;
            let min_successful = count_param(kind, params, "min_successful")?.unwrap_or(children.len());
            if min_successful > children.len() {
                return Err(invalid(
                    kind,
                    "min_successful",
                    format!("{min_successful} exceeds the {} children", children.len()),
                ));
            }
            let max_failed = count_param(kind, params, "max_failed")?.unwrap_or(1);
            Blueprint::Parallel { children, min_successful, max_failed }
        }
        "repeat" => {
            let policy = match count_param(kind, params, "times")? {
                Some(n) => RepeatPolicy::Times(u32::try_from(n).map_err(|_| {
                    invalid(kind, "times", format!("{n} is too large"))
                })?),
                None => RepeatPolicy::Forever,
            };
            Blueprint::Repeat { policy, child: compile_one(registry, def)? }
        }
        "repeat_until_failure" => {
            Blueprint::Repeat { policy: RepeatPolicy::UntilFailure, child: compile_one(registry, def)? }
        }
        "repeat_until_success" => {
            Blueprint::Repeat { policy: RepeatPolicy::UntilSuccess, child: compile_one(registry, def)? }
        }
        "invert" => Blueprint::Invert(compile_one(registry, def)?),
        "interrupter" => {
            let [condition, child] = def.children.as_slice() else {
                return Err(arity(kind, "exactly 2", def));
            };
            let fallback = match params.get("fallback").copied() {
                None => Status::Success,
                Some(v) if v == 1.0 => Status::Success,
                Some(v) if v == 0.0 => Status::Failure,
                Some(v) => return Err(invalid(kind, "fallback", format!("must be 0 or 1, got {v}"))),
            };
            Blueprint::Interrupter {
                condition: Box::new(compile(registry, condition)?),
                child: Box::new(compile(registry, child)?),
                fallback,
            }
        }
        "nearest" => {
            let count = count_param(kind, params, "count")?
                .ok_or_else(|| invalid(kind, "count", "missing".into()))?;
            Blueprint::Nearest { count, child: compile_one(registry, def)? }
        }
        "only_food" => Blueprint::OnlyKinds { filter: OnlyKinds::food(), child: compile_one(registry, def)? },
        "only_cells" => Blueprint::OnlyKinds { filter: OnlyKinds::cells(), child: compile_one(registry, def)? },
        leaf => {
            if !registry.contains(leaf) {
                return Err(BehaviorError::UnknownKind(leaf.to_owned()));
            }
            if !def.children.is_empty() {
                return Err(arity(leaf, "no", def));
            }
            Blueprint::Leaf(registry.compile_leaf(leaf, params)?)
        }
    })
}

fn compile_many(registry: &NodeRegistry, def: &TreeDefinition) -> BtResult<Vec<Blueprint>> {
    if def.children.is_empty() {
        return Err(BehaviorError::EmptyComposite(composite_name(&def.kind)));
    }
    def.children.iter().map(|c| compile(registry, c)).collect()
}

fn compile_one(registry: &NodeRegistry, def: &TreeDefinition) -> BtResult<Box<Blueprint>> {
    match def.children.as_slice() {
        [child] => Ok(Box::new(compile(registry, child)?)),
        _ => Err(arity(&def.kind, "exactly 1", def)),
    }
}

fn arity(kind: &str, expected: &'static str, def: &TreeDefinition) -> BehaviorError {
    BehaviorError::Arity { kind: kind.to_owned(), expected, got: def.children.len() }
}

fn composite_name(kind: &str) -> &'static str {
    match kind {
        "sequence" => "sequence",
        "selector" => "selector",
        "parallel" => "parallel",
        _ => "priority",
    }
}
