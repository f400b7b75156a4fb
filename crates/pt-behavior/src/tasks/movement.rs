//! Movement and feeding.

use pt_core::{ParticleKind, Vec2};

use super::{MAX_CELL_SIZE, OVERSIZE_BONUS, RANDOM_WALK_SECS, is_food, pick, sees_food, touches, visible_goal};
use crate::{Behavior, BtResult, DecisionContext, Neighbor, Status, Task};

/// Stop in place.
#[derive(Default)]
pub struct Freeze;

impl Task for Freeze {
    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let me = ctx.me();
        ctx.particles.velocity[me] = Vec2::ZERO;
        Ok(Status::Success)
    }

    fn name(&self) -> &'static str {
        "freeze"
    }
}

/// Head in a random direction for [`RANDOM_WALK_SECS`], then succeed.
pub struct RandomWalk {
    remaining: f32,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self { remaining: RANDOM_WALK_SECS }
    }
}

impl Behavior for RandomWalk {
    fn on_start(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let me = ctx.me();
        let dir = ctx.rng.direction();
        ctx.particles.velocity[me] = dir * ctx.particles.speed[me];
        self.remaining = RANDOM_WALK_SECS;
        Ok(Status::Running)
    }

    fn on_continue(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        self.remaining -= ctx.dt;
        Ok(if self.remaining > 0.0 { Status::Running } else { Status::Success })
    }

    fn name(&self) -> &'static str {
        "random_walk"
    }
}

/// Eat every edible neighbor the particle touches.  Returns how many were
/// eaten.
///
/// Each meal adds the food's value to energy and grows the cell by one unit
/// (and its maximum energy by one).  Past [`MAX_CELL_SIZE`] the growth turns
/// into an energy bonus.  Food becomes dead food; corpses are removed.
pub fn eat_touching(ctx: &mut DecisionContext<'_>) -> BtResult<usize> {
    let view: &DecisionContext<'_> = ctx;
    let meals: Vec<Neighbor> = view
        .neighbors
        .iter()
        .filter(|n| is_food(view, n) && touches(view, n))
        .copied()
        .collect();

    let me = ctx.me();
    let mut eaten = 0;
    for meal in meals {
        let p = &mut *ctx.particles;
        let food = meal.id().index();
        p.energy[me] += p.food_value[food];
        p.size[me] += 1.0;
        if p.size[me] > MAX_CELL_SIZE {
            p.size[me] = MAX_CELL_SIZE;
            p.energy[me] += OVERSIZE_BONUS;
        }
        p.max_energy[me] += 1.0;
        match p.kind[food] {
            ParticleKind::Food => p.init_with_type(meal.id(), ParticleKind::DeadFood)?,
            _ => p.kill(meal.id())?,
        }
        eaten += 1;
    }
    Ok(eaten)
}

/// Instant: eat whatever is touching.  Fails if nothing was eaten.
#[derive(Default)]
pub struct Eat;

impl Task for Eat {
    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        Ok(if eat_touching(ctx)? > 0 { Status::Success } else { Status::Failure })
    }

    fn name(&self) -> &'static str {
        "eat"
    }
}

/// Walk to visible food and eat it.
///
/// Needs food in sight to start.  While the remembered goal stays visible
/// the task keeps heading for it and reports Running; once the goal is
/// gone (eaten by us or anyone else) a new one is picked.  Completes with
/// Success if it ate something on its last step and no food is left to
/// pick, and with Failure if it found nothing at all.
#[derive(Default)]
pub struct SeekFood;

impl Task for SeekFood {
    fn check_precondition(&self, ctx: &DecisionContext<'_>) -> bool {
        sees_food(ctx)
    }

    fn check_valid(&self, ctx: &DecisionContext<'_>) -> bool {
        visible_goal(ctx, ctx.particles.food_goal[ctx.me()], is_food).is_some()
    }

    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let eaten = eat_touching(ctx)?;
        let me = ctx.me();

        let remembered = ctx.particles.food_goal[me];
        let goal = match visible_goal(ctx, remembered, is_food) {
            Some(goal) => Some(goal),
            None => pick(ctx, is_food),
        };
        ctx.particles.food_goal[me] = goal.map(|g| g.handle);

        match goal {
            Some(goal) => {
                let target = ctx.particles.position[goal.id().index()];
                ctx.head_towards(target);
                Ok(Status::Running)
            }
            None if eaten > 0 => Ok(Status::Success),
            None => Ok(Status::Failure),
        }
    }

    fn name(&self) -> &'static str {
        "seek_food"
    }
}
