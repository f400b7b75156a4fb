//! Reproduction by division.

use tracing::debug;

use pt_core::ParticleKind;

use super::can_split;
use crate::{BtResult, DecisionContext, Status, Task};

/// Instant: divide into two cells of the same team sharing the energy.
///
/// Needs more than half of the maximum energy.  The offspring appears one
/// body length away in a random direction.  Fails when the particle pool is
/// full.
#[derive(Default)]
pub struct Split;

impl Task for Split {
    fn check_precondition(&self, ctx: &DecisionContext<'_>) -> bool {
        can_split(ctx)
    }

    fn execute(&mut self, ctx: &mut DecisionContext<'_>) -> BtResult<Status> {
        let me = ctx.me();
        let offset = ctx.rng.direction() * ctx.particles.size[me];
        let at = ctx.index.bounds().wrap(ctx.position() + offset);

        let p = &mut *ctx.particles;
        let Some(child) = p.spawn_at(ParticleKind::Cell, at) else {
            return Ok(Status::Failure);
        };
        let c = child.index();
        let half = p.energy[me] / 2.0;
        p.energy[me] = half;
        p.energy[c] = half;
        p.team[c] = p.team[me];
        p.color[c] = p.color[me];
        debug!(parent = %ctx.entity, %child, "split");
        Ok(Status::Success)
    }

    fn name(&self) -> &'static str {
        "split"
    }
}
