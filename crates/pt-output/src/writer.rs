//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, ParticleSnapshotRow, TickSummaryRow};

/// Sink for simulation output.
///
/// The observer never sees these errors directly; they are stored and
/// retrieved with [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of particle snapshots.
    fn write_snapshots(&mut self, rows: &[ParticleSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
