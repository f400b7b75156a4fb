//! petri — headless petri-dish demo.
//!
//! Scatters food around the dish, drops two teams of cells in the middle and
//! lets them forage, fight and split.  Output goes to `output/petri/`.
//!
//! ```text
//! petri [TREE.json] [OUTPUT_DIR]
//! ```
//!
//! When a tree definition is given, team 1 runs it instead of the stock
//! cell tree.  Set `RUST_LOG=debug` to follow spawns, deaths and tree
//! attachment.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use pt_agent::ParticleStore;
use pt_behavior::{NodeRegistry, TreeDefinition, build_factory};
use pt_core::{Color, ParticleKind, SimConfig, TeamId, Tick, Vec2};
use pt_output::{CsvWriter, OutputWriter, SimOutputObserver};
use pt_sim::{Sim, SimBuilder, SimObserver, TickSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const FOOD_COUNT:       usize = 100;
const CELLS_PER_TEAM:   usize = 12;
const TEAMS:            u16   = 2;
const SEED:             u64   = 42;
const SIM_SECONDS:      u64   = 120;
const TICKS_PER_SECOND: u64   = 60;

// ── Bootstrap ─────────────────────────────────────────────────────────────────

/// Food anywhere in the dish, in assorted greens.
fn scatter_food(sim: &mut Sim) -> usize {
    let half = sim.config.half_extent;
    let mut rng = sim.rng.child(1);
    let mut placed = 0;
    for _ in 0..FOOD_COUNT {
        let at = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        let Some(id) = sim.spawn_at(ParticleKind::Food, at) else {
            break;
        };
        let hue = rng.gen_range(90.0..130.0);
        let saturation = rng.gen_range(0.6..1.0);
        sim.particles.color[id.index()] = Color::from_hsv(hue, saturation, 0.9);
        placed += 1;
    }
    placed
}

/// Cells clustered around the centre, one colour per team.
fn seed_cells(sim: &mut Sim) -> usize {
    const TEAM_COLORS: [Color; 2] = [Color::BLUE, Color([0.9, 0.6, 0.1, 1.0])];
    let spread = sim.config.half_extent * 0.25;
    let mut rng = sim.rng.child(2);
    let mut placed = 0;
    for team in 0..TEAMS {
        for _ in 0..CELLS_PER_TEAM {
            let at = Vec2::new(rng.centered_unit() * spread, rng.centered_unit() * spread);
            let Some(id) = sim.spawn_at(ParticleKind::Cell, at) else {
                break;
            };
            let i = id.index();
            sim.particles.team[i] = TeamId(team);
            sim.particles.color[i] = TEAM_COLORS[usize::from(team) % TEAM_COLORS.len()];
            placed += 1;
        }
    }
    placed
}

fn load_definition(path: &Path) -> Result<TreeDefinition> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer and remembers the last summary.
struct Census<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    last:          TickSummary,
    snapshot_rows: usize,
    peak_cells:    usize,
}

impl<W: OutputWriter> Census<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, last: TickSummary::default(), snapshot_rows: 0, peak_cells: 0 }
    }
}

impl<W: OutputWriter> SimObserver for Census<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.last = *summary;
        self.peak_cells = self.peak_cells.max(summary.cells);
        if tick.is_every(TICKS_PER_SECOND * 10) {
            info!(%tick, cells = summary.cells, food = summary.food, alive = summary.alive, "census");
        }
        self.inner.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, particles: &ParticleStore) {
        self.snapshot_rows += particles.alive_count();
        self.inner.on_snapshot(tick, particles);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let tree_path = args.next().map(PathBuf::from);
    let out_dir = args.next().map_or_else(|| PathBuf::from("output/petri"), PathBuf::from);

    println!("=== petri ===");
    println!("Food: {FOOD_COUNT}  |  Cells: {TEAMS} × {CELLS_PER_TEAM}  |  Seconds: {SIM_SECONDS}  |  Seed: {SEED}");
    println!();

    // 1. Config.
    let config = SimConfig {
        dt:                      1.0 / TICKS_PER_SECOND as f32,
        total_ticks:             SIM_SECONDS * TICKS_PER_SECOND,
        seed:                    SEED,
        snapshot_interval_ticks: TICKS_PER_SECOND,
        ..SimConfig::default()
    };

    // 2. Behaviors.
    let mut builder = SimBuilder::new(config);
    if let Some(path) = &tree_path {
        let definition = load_definition(path)?;
        let factory = build_factory(&NodeRegistry::with_stock(), &definition)
            .with_context(|| format!("compiling {}", path.display()))?;
        println!("Team 1 runs {} ({} nodes)", path.display(), definition.size());
        builder = builder.team_behavior(TeamId(1), factory);
    }
    let mut sim = builder.build()?;

    // 3. Population.
    let food = scatter_food(&mut sim);
    let cells = seed_cells(&mut sim);
    println!("Placed {food} food and {cells} cells");

    // 4. Output.
    std::fs::create_dir_all(&out_dir)?;
    let writer = CsvWriter::new(&out_dir)?;
    let mut obs = Census::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  particle_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv     : {} rows", sim.now().0);
    println!();
    println!("{:<8} {:>8}", "Team", "Cells");
    println!("{}", "-".repeat(17));
    for team in 0..TEAMS {
        let alive = sim
            .particles
            .alive_of_kind(ParticleKind::Cell)
            .filter(|id| sim.particles.team[id.index()] == TeamId(team))
            .count();
        println!("{:<8} {:>8}", team, alive);
    }
    println!();
    println!(
        "Final: {} cells (peak {}), {} food, {} particles",
        obs.last.cells, obs.peak_cells, obs.last.food, obs.last.alive
    );

    Ok(())
}
