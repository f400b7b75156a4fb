//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use pt_agent::ParticleStore;
use pt_core::Tick;
use pt_sim::{SimObserver, TickSummary};

use crate::row::{ParticleSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes particle snapshots and tick summaries to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        let row = TickSummaryRow {
            tick:         tick.0,
            elapsed_secs: summary.elapsed_secs,
            alive:        summary.alive as u64,
            cells:        summary.cells as u64,
            food:         summary.food as u64,
            decisions:    summary.decisions as u64,
            deaths:       summary.deaths as u64,
            spawns:       summary.spawns as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, particles: &ParticleStore) {
        let rows: Vec<ParticleSnapshotRow> = particles
            .population()
            .iter()
            .filter(|&&id| particles.is_alive(id))
            .map(|&id| {
                let i = id.index();
                let at = particles.position[i];
                ParticleSnapshotRow {
                    particle_id: id.0,
                    tick:        tick.0,
                    kind:        particles.kind[i],
                    x:           at.x,
                    y:           at.y,
                    size:        particles.size[i],
                    color:       particles.color[i],
                    energy:      particles.energy[i],
                    team:        particles.team[i].0,
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
