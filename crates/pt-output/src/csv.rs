//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `particle_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{OutputResult, ParticleSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 12] =
    ["id", "tick", "kind", "x", "y", "size", "r", "g", "b", "a", "energy", "team"];

pub const SUMMARY_HEADER: [&str; 8] =
    ["tick", "elapsed_secs", "alive", "cells", "food", "decisions", "deaths", "spawns"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` (which must exist) and write the
    /// header rows.  Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("particle_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        debug!(dir = %dir.display(), "csv output opened");
        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[ParticleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            let [r, g, b, a] = row.color.0;
            self.snapshots.write_record(&[
                row.particle_id.to_string(),
                row.tick.to_string(),
                row.kind.as_str().to_owned(),
                row.x.to_string(),
                row.y.to_string(),
                row.size.to_string(),
                r.to_string(),
                g.to_string(),
                b.to_string(),
                a.to_string(),
                row.energy.to_string(),
                row.team.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.4}", row.elapsed_secs),
            row.alive.to_string(),
            row.cells.to_string(),
            row.food.to_string(),
            row.decisions.to_string(),
            row.deaths.to_string(),
            row.spawns.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
