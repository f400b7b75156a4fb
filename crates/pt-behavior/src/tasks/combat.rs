//! Hunting and fighting weaker cells of other teams.

use pt_core::ParticleKind;

use super::{is_weak_enemy, pick, sees_weak_enemy, touches, visible_goal};
use crate::{BtResult, DecisionContext, Neighbor, Status, Task};

/// Chase a weak enemy.  Running while the prey stays visible and weak.
#[derive(Default)]
pub struct HuntWeak;

impl Task for HuntWeak {
    fn check_precondition(&self, ctx: &DecisionContext<'_>) -> bool {
        sees_weak_enemy(ctx)
    }

    fn check_valid(&self, ctx: &DecisionContext<'_>) -> bool {
        visible_goal(ctx, ctx.particles.hunt_goal[ctx.me()], is_weak_enemy).is_some()
    }

    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let me = ctx.me();
        let remembered = ctx.particles.hunt_goal[me];
        let prey = match visible_goal(ctx, remembered, is_weak_enemy) {
            Some(prey) => Some(prey),
            None => pick(ctx, is_weak_enemy),
        };
        ctx.particles.hunt_goal[me] = prey.map(|p| p.handle);

        let Some(prey) = prey else {
            return Ok(Status::Failure);
        };
        let target = ctx.particles.position[prey.id().index()];
        ctx.head_towards(target);
        Ok(Status::Running)
    }

    fn name(&self) -> &'static str {
        "hunt_weak"
    }
}

/// Instant: kill every weak enemy we touch.
///
/// Each victim is turned into a corpse in place, and the fight costs a third
/// of the victim's remaining energy.  Fails if nobody was in reach.
#[derive(Default)]
pub struct Fight;

impl Task for Fight {
    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let view: &DecisionContext<'_> = ctx;
        let victims: Vec<Neighbor> = view
            .neighbors
            .iter()
            .filter(|n| is_weak_enemy(view, n) && touches(view, n))
            .copied()
            .collect();
        if victims.is_empty() {
            return Ok(Status::Failure);
        }

        let me = ctx.me();
        for victim in victims {
            let p = &mut *ctx.particles;
            let cost = p.energy[victim.id().index()] / 3.0;
            p.init_with_type(victim.id(), ParticleKind::Corpse)?;
            p.energy[me] -= cost;
        }
        ctx.particles.hunt_goal[me] = None;
        Ok(Status::Success)
    }

    fn name(&self) -> &'static str {
        "fight"
    }
}
