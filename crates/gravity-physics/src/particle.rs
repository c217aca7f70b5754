//! Particle state for the N-body simulation

use bytemuck::{Pod, Zeroable};

use crate::vector::Vec3;

/// A point mass plus the attributes the renderer needs.
///
/// `radius` and `color` are payload only: gravity and integration never read
/// them. `mass` must be strictly positive; a zero or negative mass turns the
/// force-to-acceleration conversion into `inf`/`NaN` and is not checked here.
///
/// Laid out as `repr(C)` so the whole particle array can be uploaded to a GPU
/// buffer as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in 3D space
    pub position: Vec3,
    /// Velocity vector
    pub velocity: Vec3,
    /// Acceleration accumulated during the current tick
    pub acceleration: Vec3,
    /// Mass of the particle
    pub mass: f32,
    /// Visual radius for rendering
    pub radius: f32,
    /// RGB color for rendering
    pub color: Vec3,
}

impl Particle {
    /// Create a particle at rest in terms of forces (acceleration zeroed).
    pub fn new(position: Vec3, velocity: Vec3, mass: f32, radius: f32, color: Vec3) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            mass,
            radius,
            color,
        }
    }

    /// Clear the accumulated acceleration before a new force pass
    pub fn reset_forces(&mut self) {
        self.acceleration = Vec3::ZERO;
    }

    /// 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// m v
    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }
}
