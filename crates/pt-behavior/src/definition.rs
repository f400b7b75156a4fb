//! Declarative tree definitions.
//!
//! A `TreeDefinition` is the plain-data form of a tree, as produced by an
//! editor or read from a file.  It is compiled once with
//! [`build_factory`](crate::build_factory) and then instantiated per
//! particle.

use std::collections::BTreeMap;

/// Numeric parameters of one definition node.
pub type Params = BTreeMap<String, f32>;

/// One node of a tree definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeDefinition {
    /// Node kind, e.g. `"sequence"` or `"seek_food"`.
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<TreeDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Params,
}

impl TreeDefinition {
    /// A node without children.
    pub fn leaf(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), ..Self::default() }
    }

    pub fn node(kind: impl Into<String>, children: Vec<TreeDefinition>) -> Self {
        Self { kind: kind.into(), children, params: Params::new() }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Number of nodes in this definition, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeDefinition::size).sum::<usize>()
    }

    /// The stock cell tree: split when rich, fight what we touch, hunt weak
    /// enemies, look for food, and wander when nothing else applies.
    /// Re-evaluated by priority on every decision.
    pub fn stock_cell() -> Self {
        Self::node(
            "priority",
            vec![
                Self::leaf("split"),
                Self::leaf("fight"),
                Self::leaf("hunt_weak"),
                Self::leaf("seek_food"),
                Self::leaf("random_walk"),
            ],
        )
    }
}
