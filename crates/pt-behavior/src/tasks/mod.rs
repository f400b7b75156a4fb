//! Stock particle tasks and the perception predicates they share.
//!
//! | Module       | Tasks                                                 |
//! |--------------|-------------------------------------------------------|
//! | [`movement`] | `Freeze`, `RandomWalk`, `SeekFood`, `Eat`             |
//! | [`combat`]   | `HuntWeak`, `Fight`                                   |
//! | [`split`]    | `Split`                                               |
//!
//! The predicates below double as the condition leaves `sees_food`,
//! `sees_weak_enemy`, `is_hungry` and `can_split`.

pub mod combat;
pub mod movement;
pub mod split;

pub use combat::{Fight, HuntWeak};
pub use movement::{Eat, Freeze, RandomWalk, SeekFood};
pub use split::Split;

use pt_core::ParticleKind;

use crate::{DecisionContext, Neighbor};

/// A prey must have this much less energy than the hunter.
pub const WEAK_ENERGY_MARGIN: f32 = 40.0;
/// Extra reach beyond touching within which a weak enemy is worth chasing.
pub const HUNT_REACH: f32 = 40.0;
/// Chance to commit to each candidate goal, in neighbor order.
pub const PICK_CHANCE: f64 = 0.3;
/// Cells stop growing at this size and bank extra energy instead.
pub const MAX_CELL_SIZE: f32 = 40.0;
pub const OVERSIZE_BONUS: f32 = 10.0;
/// How long one random-walk leg lasts.
pub const RANDOM_WALK_SECS: f32 = 1.5;

// ── Predicates ────────────────────────────────────────────────────────────────

/// The two particles overlap: `dist² <= (size_a + size_b)²`.
pub fn touches(ctx: &DecisionContext<'_>, n: &Neighbor) -> bool {
    let reach = ctx.particles.size[ctx.me()] + ctx.particles.size[n.id().index()];
    n.dist_sq <= reach * reach
}

/// Alive and edible (food or a corpse).
pub fn is_food(ctx: &DecisionContext<'_>, n: &Neighbor) -> bool {
    ctx.is_live(n) && ctx.kind_of(n).is_edible()
}

/// A live cell of another team, much weaker than us and close enough to
/// chase.
pub fn is_weak_enemy(ctx: &DecisionContext<'_>, n: &Neighbor) -> bool {
    let p = &*ctx.particles;
    let (me, other) = (ctx.me(), n.id().index());
    let reach = p.size[me] + p.size[other] + HUNT_REACH;
    ctx.is_live(n)
        && n.id() != ctx.entity
        && p.kind[other] == ParticleKind::Cell
        && p.team[other] != p.team[me]
        && p.energy[other] < p.energy[me] - WEAK_ENERGY_MARGIN
        && n.dist_sq < reach * reach
}

pub fn sees_food(ctx: &DecisionContext<'_>) -> bool {
    ctx.neighbors.iter().any(|n| is_food(ctx, n))
}

pub fn sees_weak_enemy(ctx: &DecisionContext<'_>) -> bool {
    ctx.neighbors.iter().any(|n| is_weak_enemy(ctx, n))
}

/// Below half of the maximum energy.
pub fn is_hungry(ctx: &DecisionContext<'_>) -> bool {
    let me = ctx.me();
    ctx.particles.energy[me] < ctx.particles.max_energy[me] / 2.0
}

/// Above half of the maximum energy.
pub fn can_split(ctx: &DecisionContext<'_>) -> bool {
    let me = ctx.me();
    ctx.particles.energy[me] > ctx.particles.max_energy[me] / 2.0
}

// ── Goal picking ──────────────────────────────────────────────────────────────

/// Walk the neighbors nearest-first and commit to each one matching `pred`
/// with probability [`PICK_CHANCE`].  `None` if every candidate was skipped.
pub(crate) fn pick(
    ctx: &mut DecisionContext<'_>,
    pred: fn(&DecisionContext<'_>, &Neighbor) -> bool,
) -> Option<Neighbor> {
    let view: &DecisionContext<'_> = ctx;
    let candidates: Vec<Neighbor> = view.neighbors.iter().filter(|n| pred(view, n)).copied().collect();
    candidates.into_iter().find(|_| ctx.rng.gen_bool(PICK_CHANCE))
}

/// The neighbor entry of a remembered goal, if it is still visible and
/// still satisfies `pred`.
pub(crate) fn visible_goal(
    ctx: &DecisionContext<'_>,
    goal: Option<pt_agent::ParticleHandle>,
    pred: fn(&DecisionContext<'_>, &Neighbor) -> bool,
) -> Option<Neighbor> {
    let goal = goal?;
    ctx.neighbors.iter().find(|n| n.handle == goal && pred(ctx, n)).copied()
}
