//! Per-tick orchestration
//!
//! One tick is: reset accelerations, run the pairwise force pass over every
//! unordered pair `i < j` in ascending order, then integrate every particle.
//! Nothing here paces itself against the wall clock; the host supplies `dt`.

use gravity_physics::{ForceModel, GravitySolver, IntegrationFidelity, IntegrationMethod, Particle};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::initialize::create_initial_particles;
use crate::params::SimulationParams;

/// Advance `particles` by one tick of length `dt`.
///
/// Uses the default solver, the plain pairwise force model and the legacy
/// single-evaluation integrators. The particle count never changes.
pub fn step(particles: &mut [Particle], dt: f32, method: IntegrationMethod) {
    Stepper::new(method).tick(particles, dt);
}

/// Force model, solver and integrator chosen once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    pub solver: GravitySolver,
    pub force_model: ForceModel,
    pub method: IntegrationMethod,
    pub fidelity: IntegrationFidelity,
}

impl Stepper {
    pub fn new(method: IntegrationMethod) -> Self {
        Self {
            solver: GravitySolver::default(),
            force_model: ForceModel::Pairwise,
            method,
            fidelity: IntegrationFidelity::Legacy,
        }
    }

    pub fn with_force_model(mut self, force_model: ForceModel) -> Self {
        self.force_model = force_model;
        self
    }

    pub fn with_fidelity(mut self, fidelity: IntegrationFidelity) -> Self {
        self.fidelity = fidelity;
        self
    }

    pub fn with_solver(mut self, solver: GravitySolver) -> Self {
        self.solver = solver;
        self
    }

    /// Run one tick.
    ///
    /// Under [`ForceModel::DedicatedCentral`] the anchor particle is held at
    /// rest whatever velocity it was given.
    pub fn tick(&self, particles: &mut [Particle], dt: f32) {
        self.solver
            .compute_accelerations(particles, &self.force_model);
        self.force_model.hold_anchor(particles);

        match self.fidelity {
            IntegrationFidelity::Legacy => {
                for particle in particles.iter_mut() {
                    self.method.integrate(particle, dt);
                }
            }
            IntegrationFidelity::Accurate => {
                let solver = self.solver;
                let model = self.force_model;
                self.method.integrate_system(particles, dt, |ps| {
                    solver.compute_accelerations(ps, &model);
                });
            }
        }
    }
}

/// An owned particle system plus the stepper that advances it.
pub struct Simulation {
    particles: Vec<Particle>,
    stepper: Stepper,
    dt: f32,
    ticks: u64,
    elapsed: f64,
}

impl Simulation {
    /// Wrap an existing particle set. The particles are taken as-is.
    pub fn new(particles: Vec<Particle>, stepper: Stepper, dt: f32) -> Self {
        Self {
            particles,
            stepper,
            dt,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Create the initial particles from `params` (validating them) and
    /// configure the stepper to match.
    pub fn from_params(params: &SimulationParams) -> Result<Self> {
        let particles = create_initial_particles(params)?;
        params.log_inert_settings();
        let stepper = Stepper::new(params.integration_method())
            .with_force_model(params.resolved_force_model())
            .with_fidelity(params.fidelity());

        log::info!(
            "Simulation ready: {} particles, dt={}, method={}, fidelity={:?}",
            particles.len(),
            params.time_step,
            stepper.method,
            stepper.fidelity
        );

        Ok(Self::new(particles, stepper, params.time_step))
    }

    /// Advance by one tick.
    pub fn step(&mut self) {
        self.stepper.tick(&mut self.particles, self.dt);
        self.ticks += 1;
        self.elapsed += f64::from(self.dt);
        log::trace!("tick {} t={:.6}", self.ticks, self.elapsed);
    }

    /// Advance by `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle array as raw bytes, ready for a GPU buffer upload.
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total simulated time in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::measure(
            &self.particles,
            &self.stepper.solver,
            &self.stepper.force_model,
        )
    }
}
