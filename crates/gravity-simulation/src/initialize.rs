//! Initial particle placement
//!
//! Positions are uniform inside the configured space bounds, velocities are
//! small and random, and mass, radius and color are drawn from their ranges.
//! With the central body enabled, particle 0 is replaced by a heavy body at
//! rest.

use gravity_physics::{Particle, Vec3, CENTRAL_BODY_COLOR, CENTRAL_BODY_RADIUS_SCALE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::params::SimulationParams;

/// Largest initial speed along each axis
pub const MAX_INITIAL_SPEED: f32 = 5.0;

/// Build the initial particle set with an RNG seeded from `params.seed`, or
/// from OS entropy when no seed is given.
pub fn create_initial_particles(params: &SimulationParams) -> Result<Vec<Particle>> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    create_particles(params, &mut rng)
}

/// Build `params.max_particles` particles using `rng`.
pub fn create_particles<R: Rng + ?Sized>(
    params: &SimulationParams,
    rng: &mut R,
) -> Result<Vec<Particle>> {
    params.validate()?;

    let space_min = Vec3::from_array(params.space_min);
    let extent = Vec3::from_array(params.space_max) - space_min;

    let mut particles = Vec::with_capacity(params.max_particles);
    for _ in 0..params.max_particles {
        let unit = Vec3::new(rng.random(), rng.random(), rng.random());
        let position = unit * extent + space_min;

        let velocity = Vec3::new(
            rng.random::<f32>() * 2.0 - 1.0,
            rng.random::<f32>() * 2.0 - 1.0,
            rng.random::<f32>() * 2.0 - 1.0,
        ) * MAX_INITIAL_SPEED;

        let mass = lerp_range(rng, params.particle_min_mass, params.particle_max_mass);
        let radius = lerp_range(rng, params.particle_min_radius, params.particle_max_radius);
        let color = Vec3::new(rng.random(), rng.random(), rng.random());

        particles.push(Particle::new(position, velocity, mass, radius, color));
    }

    if params.enable_central_body {
        let sun = &mut particles[0];
        sun.position = Vec3::from_array(params.central_body_position);
        sun.velocity = Vec3::ZERO;
        sun.mass = params.central_body_mass;
        sun.radius = params.particle_max_radius * CENTRAL_BODY_RADIUS_SCALE;
        sun.color = Vec3::from_array(CENTRAL_BODY_COLOR);
    }

    log::info!("✓ Initialized {} particles", particles.len());
    log::debug!(
        "  Particle struct size: {} bytes",
        std::mem::size_of::<Particle>()
    );
    if params.enable_central_body {
        log::info!(
            "  Central body enabled with mass {:e}",
            params.central_body_mass
        );
    }
    for (i, p) in particles.iter().take(5).enumerate() {
        log::debug!(
            "    [{}] pos=({:.2}, {:.2}, {:.2}) mass={:.1} radius={:.2}",
            i,
            p.position.x,
            p.position.y,
            p.position.z,
            p.mass,
            p.radius
        );
    }

    Ok(particles)
}

/// Uniform value in `[min, max]`; returns `min` when the range is empty.
fn lerp_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}
