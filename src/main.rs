//! Headless N-body gravity simulation
//!
//! Loads parameters, seeds the particle system and advances it for a fixed
//! number of ticks, logging conservation diagnostics along the way.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use gravity_simulation::{Diagnostics, FidelityConfig, Simulation, SimulationParams};

/// Newtonian N-body gravity simulation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file with `key: value` lines
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,
    /// Override max_particles
    #[arg(short, long)]
    particles: Option<usize>,
    /// Override integration_method (0: Euler, 1: Verlet, 2: RK4)
    #[arg(short, long)]
    method: Option<i64>,
    /// Override the initializer seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Re-evaluate forces inside Verlet and RK4
    #[arg(long, default_value_t = false)]
    accurate: bool,
    /// Log diagnostics every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    log_every: u64,
}

impl Args {
    fn params(&self) -> Result<SimulationParams> {
        let mut params = match &self.config {
            Some(path) => SimulationParams::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SimulationParams::default(),
        };

        if let Some(n) = self.particles {
            params.max_particles = n;
        }
        if let Some(method) = self.method {
            params.integration_method = method;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        if self.accurate {
            params.integration_fidelity = FidelityConfig::Accurate;
        }
        Ok(params)
    }
}

fn log_diagnostics(tick: u64, d: &Diagnostics) {
    log::info!(
        "tick {:>6}  E={:+.6e} (K={:.6e} U={:+.6e})  |p|={:.6e}  com=({:.3}, {:.3}, {:.3})",
        tick,
        d.total_energy(),
        d.kinetic_energy,
        d.potential_energy,
        d.momentum.length(),
        d.center_of_mass.x,
        d.center_of_mass.y,
        d.center_of_mass.z
    );
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;

    log::info!("Starting gravity simulation...");
    let mut sim = Simulation::from_params(&params).context("failed to set up simulation")?;

    let initial = sim.diagnostics();
    log_diagnostics(0, &initial);

    let start = Instant::now();
    for _ in 0..args.ticks {
        sim.step();
        if args.log_every > 0 && sim.ticks() % args.log_every == 0 {
            log_diagnostics(sim.ticks(), &sim.diagnostics());
        }
    }
    let wall = start.elapsed();

    let last = sim.diagnostics();
    let drift = if initial.total_energy() != 0.0 {
        (last.total_energy() - initial.total_energy()) / initial.total_energy().abs()
    } else {
        0.0
    };

    log::info!(
        "✓ Ran {} ticks ({:.3}s simulated) in {:.2?} ({:.1} ticks/s)",
        sim.ticks(),
        sim.elapsed(),
        wall,
        sim.ticks() as f64 / wall.as_secs_f64().max(f64::EPSILON)
    );
    log::info!("  Relative energy drift: {:+.3e}", drift);

    Ok(())
}
