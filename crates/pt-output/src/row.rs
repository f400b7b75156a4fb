//! Plain data row types written by output backends.

use pt_core::{Color, ParticleKind};

/// One living particle at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshotRow {
    pub particle_id: u32,
    pub tick:        u64,
    pub kind:        ParticleKind,
    pub x:           f32,
    pub y:           f32,
    pub size:        f32,
    pub color:       Color,
    pub energy:      f32,
    pub team:        u16,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub alive:        u64,
    pub cells:        u64,
    pub food:         u64,
    pub decisions:    u64,
    pub deaths:       u64,
    pub spawns:       u64,
}
