//! Per-tick bookkeeping that does not go through a behavior tree: aging,
//! metabolism and the kind-transition table.

use tracing::debug;

use pt_agent::{ParticleStore, StoreResult};
use pt_core::{Fate, ParticleId, ParticleKind};

/// What the bookkeeping did to a particle this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed kind or died.
    Unchanged,
    /// Ran out of energy and was killed.
    Starved,
    /// The lifetime elapsed and the particle was re-initialised.
    Became(ParticleKind),
    /// The lifetime elapsed and the particle was removed.
    Expired,
}

impl Outcome {
    pub fn is_death(self) -> bool {
        matches!(self, Outcome::Starved | Outcome::Expired)
    }
}

/// Advance the clocks of a living particle by `dt` and apply metabolism or
/// its lifetime transition.
///
/// Runs after the particle's decision and movement.  Cells burn
/// `metabolism × dt` energy and starve once energy reaches zero, whatever
/// brought it there.  Passive kinds follow their profile's [`Lifetime`](pt_core::Lifetime)
/// once `kind_timer` reaches it.
pub fn advance(store: &mut ParticleStore, id: ParticleId, dt: f32) -> StoreResult<Outcome> {
    let i = id.index();
    store.age[i] += dt;
    store.kind_timer[i] += dt;

    let kind = store.kind[i];
    if kind.decides() {
        store.energy[i] -= store.metabolism[i] * dt;
        if store.energy[i] <= 0.0 {
            debug!(%id, age = store.age[i], "starved");
            store.kill(id)?;
            return Ok(Outcome::Starved);
        }
        return Ok(Outcome::Unchanged);
    }

    let Some(lifetime) = store.profiles().get(kind).lifetime else {
        return Ok(Outcome::Unchanged);
    };
    if store.kind_timer[i] < lifetime.after_secs {
        return Ok(Outcome::Unchanged);
    }
    match lifetime.then {
        Fate::Become(next) => {
            store.init_with_type(id, next)?;
            Ok(Outcome::Became(next))
        }
        Fate::Remove => {
            store.kill(id)?;
            Ok(Outcome::Expired)
        }
    }
}
