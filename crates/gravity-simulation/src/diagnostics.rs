//! Conserved-quantity diagnostics for monitoring a run
//!
//! Sums are accumulated in f64; per-particle terms are still f32.

use glam::DVec3;
use gravity_physics::{ForceModel, GravitySolver, Particle, Vec3};

/// Snapshot of system-wide quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub kinetic_energy: f64,
    /// Softened, using the same ε as the force law
    pub potential_energy: f64,
    pub momentum: Vec3,
    pub center_of_mass: Vec3,
    pub total_mass: f64,
}

impl Diagnostics {
    pub fn measure(particles: &[Particle], solver: &GravitySolver, model: &ForceModel) -> Self {
        let mut kinetic_energy = 0.0f64;
        let mut total_mass = 0.0f64;
        let mut momentum = DVec3::ZERO;
        let mut weighted = DVec3::ZERO;

        for p in particles {
            let mass = f64::from(p.mass);
            kinetic_energy += f64::from(p.kinetic_energy());
            total_mass += mass;
            momentum += p.velocity.as_dvec3() * mass;
            weighted += p.position.as_dvec3() * mass;
        }

        let center_of_mass = if total_mass > 0.0 {
            weighted / total_mass
        } else {
            DVec3::ZERO
        };

        Self {
            kinetic_energy,
            potential_energy: solver.potential_energy(particles, model),
            momentum: momentum.as_vec3(),
            center_of_mass: center_of_mass.as_vec3(),
            total_mass,
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}
