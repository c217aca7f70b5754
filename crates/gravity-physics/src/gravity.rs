//! Newtonian gravity with softening
//!
//! F = G * m1 * m2 / (r² + ε)
//!
//! Each contribution is written straight into the particles' `acceleration`
//! fields, so a pass must start from zeroed accelerations (see
//! [`GravitySolver::compute_accelerations`]). Pairs are visited in ascending
//! `(i, j)` order; the summation order is part of the observable result.

use crate::constants::{G, SOFTENING};
use crate::particle::Particle;
use crate::vector::Vec3;

/// A fixed, immovable attractor outside the pairwise loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralBody {
    pub mass: f32,
    pub position: Vec3,
    /// Index of a particle that represents the central body in the particle
    /// array. That particle is left out of the pairwise pass and never
    /// accelerates.
    pub anchor: Option<usize>,
}

/// How the per-tick force pass treats the central body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ForceModel {
    /// Every particle, a heavy central one included, interacts through the
    /// ordinary pairwise loop.
    #[default]
    Pairwise,
    /// Pairwise loop over all non-anchor particles, plus a one-way pull from
    /// the central body on each of them.
    DedicatedCentral(CentralBody),
}

impl ForceModel {
    /// Index of the particle standing in for the dedicated central body.
    pub fn anchor(&self) -> Option<usize> {
        match self {
            ForceModel::Pairwise => None,
            ForceModel::DedicatedCentral(central) => central.anchor,
        }
    }

    /// Pin the anchor particle in place: zero velocity and acceleration, so
    /// no integrator can move it.
    pub fn hold_anchor(&self, particles: &mut [Particle]) {
        if let Some(anchor) = self.anchor().and_then(|i| particles.get_mut(i)) {
            anchor.velocity = Vec3::ZERO;
            anchor.acceleration = Vec3::ZERO;
        }
    }
}

/// Evaluates gravitational acceleration contributions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySolver {
    /// Gravitational constant
    pub gravity: f32,
    /// Added to the squared distance before the force law is applied
    pub softening: f32,
}

impl Default for GravitySolver {
    fn default() -> Self {
        Self {
            gravity: G,
            softening: SOFTENING,
        }
    }
}

impl GravitySolver {
    pub fn new(gravity: f32, softening: f32) -> Self {
        Self { gravity, softening }
    }

    /// Softened squared distance and unit direction from `from` to `to`.
    fn separation(&self, from: Vec3, to: Vec3) -> (f32, Vec3) {
        let r = to - from;
        let dist_sq = r.dot(r) + self.softening;
        let dist = dist_sq.sqrt();
        (dist_sq, r.map(|c| c / dist))
    }

    /// Apply mutual gravity between two particles.
    ///
    /// The force is equal and opposite; the accelerations are not, since each
    /// side divides by its own mass. `p1` is pulled towards `p2` and vice
    /// versa.
    pub fn pairwise(&self, p1: &mut Particle, p2: &mut Particle) {
        let (dist_sq, dir) = self.separation(p1.position, p2.position);

        let force_mag = self.gravity * p1.mass * p2.mass / dist_sq;

        let a1 = force_mag / p1.mass;
        let a2 = force_mag / p2.mass;

        p1.acceleration += dir * a1;
        p2.acceleration -= dir * a2;
    }

    /// Pull `particle` towards a fixed mass at `center_pos`. Only `particle`
    /// is updated.
    pub fn central_body(&self, particle: &mut Particle, center_pos: Vec3, center_mass: f32) {
        let (dist_sq, dir) = self.separation(particle.position, center_pos);

        let force_mag = self.gravity * particle.mass * center_mass / dist_sq;
        let acc = force_mag / particle.mass;

        particle.acceleration += dir * acc;
    }

    /// Apply [`pairwise`](Self::pairwise) between particle `index` and every
    /// other particle, in ascending order.
    ///
    /// Both sides of each pair are updated, so calling this for every index
    /// counts each pair twice. Meant for recomputing one particle in
    /// isolation, not for the per-tick pass.
    pub fn all_pairs_for_index(&self, particles: &mut [Particle], index: usize) {
        for other in 0..particles.len() {
            if other == index {
                continue;
            }
            let (current, other) = pair_mut(particles, index, other);
            self.pairwise(current, other);
        }
    }

    /// Accumulate one force pass on top of the current accelerations.
    pub fn accumulate(&self, particles: &mut [Particle], model: &ForceModel) {
        let anchor = model.anchor();
        let count = particles.len();

        for i in 0..count {
            if Some(i) == anchor {
                continue;
            }
            for j in (i + 1)..count {
                if Some(j) == anchor {
                    continue;
                }
                let (p1, p2) = pair_mut(particles, i, j);
                self.pairwise(p1, p2);
            }
        }

        if let ForceModel::DedicatedCentral(central) = model {
            for (i, particle) in particles.iter_mut().enumerate() {
                if Some(i) == anchor {
                    continue;
                }
                self.central_body(particle, central.position, central.mass);
            }
        }
    }

    /// Zero every acceleration, then run a full force pass.
    pub fn compute_accelerations(&self, particles: &mut [Particle], model: &ForceModel) {
        for particle in particles.iter_mut() {
            particle.reset_forces();
        }
        self.accumulate(particles, model);
    }

    /// Softened gravitational potential energy of the whole system, summed
    /// in f64.
    pub fn potential_energy(&self, particles: &[Particle], model: &ForceModel) -> f64 {
        let anchor = model.anchor();
        let mut energy = 0.0f64;

        for (i, p1) in particles.iter().enumerate() {
            if Some(i) == anchor {
                continue;
            }
            for (j, p2) in particles.iter().enumerate().skip(i + 1) {
                if Some(j) == anchor {
                    continue;
                }
                let (dist_sq, _) = self.separation(p1.position, p2.position);
                energy -= f64::from(self.gravity * p1.mass * p2.mass / dist_sq.sqrt());
            }
            if let ForceModel::DedicatedCentral(central) = model {
                let (dist_sq, _) = self.separation(p1.position, central.position);
                energy -= f64::from(self.gravity * p1.mass * central.mass / dist_sq.sqrt());
            }
        }

        energy
    }
}

/// Two distinct mutable particles, returned in argument order.
fn pair_mut(particles: &mut [Particle], a: usize, b: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = particles.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = particles.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
