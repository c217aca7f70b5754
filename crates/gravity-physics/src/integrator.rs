//! Fixed-step time integrators
//!
//! Two families are provided:
//!
//! - **Legacy** ([`IntegrationMethod::integrate`]): one particle at a time,
//!   using only the acceleration already stored on the particle. Velocity
//!   Verlet and RK4 reuse that single sample for every sub-stage.
//! - **Accurate** ([`IntegrationMethod::integrate_system`]): the whole system
//!   at once, with a force callback that re-evaluates accelerations at each
//!   intermediate position (two passes per tick for Verlet, four for RK4).
//!
//! Both expect the accelerations for the current positions to be populated
//! before they are called.

use crate::particle::Particle;
use crate::vector::Vec3;

/// Integration scheme, stored in configuration as an integer.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationMethod {
    /// Semi-implicit (symplectic) Euler
    Euler = 0,
    /// Velocity Verlet
    VelocityVerlet = 1,
    /// Runge-Kutta 4th order
    Rk4 = 2,
}

impl IntegrationMethod {
    pub const ALL: [IntegrationMethod; 3] = [
        IntegrationMethod::Euler,
        IntegrationMethod::VelocityVerlet,
        IntegrationMethod::Rk4,
    ];

    /// Map a configuration value to a method. Anything unknown is Euler.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => IntegrationMethod::VelocityVerlet,
            2 => IntegrationMethod::Rk4,
            _ => IntegrationMethod::Euler,
        }
    }

    pub fn index(self) -> i64 {
        self as u32 as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            IntegrationMethod::Euler => "euler",
            IntegrationMethod::VelocityVerlet => "velocity-verlet",
            IntegrationMethod::Rk4 => "rk4",
        }
    }

    /// Advance one particle by `dt` using its stored acceleration.
    pub fn integrate(self, particle: &mut Particle, dt: f32) {
        match self {
            IntegrationMethod::Euler => euler(particle, dt),
            IntegrationMethod::VelocityVerlet => velocity_verlet(particle, dt),
            IntegrationMethod::Rk4 => rk4(particle, dt),
        }
    }

    /// Advance every particle by `dt`, calling `evaluate` whenever a fresh
    /// acceleration sample is needed at intermediate positions.
    ///
    /// `evaluate` must overwrite (not add to) every particle's acceleration
    /// for the positions it is handed.
    pub fn integrate_system<F>(self, particles: &mut [Particle], dt: f32, evaluate: F)
    where
        F: FnMut(&mut [Particle]),
    {
        match self {
            IntegrationMethod::Euler => {
                for particle in particles.iter_mut() {
                    euler(particle, dt);
                }
            }
            IntegrationMethod::VelocityVerlet => velocity_verlet_system(particles, dt, evaluate),
            IntegrationMethod::Rk4 => rk4_system(particles, dt, evaluate),
        }
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether multi-stage schemes re-evaluate forces within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationFidelity {
    /// Single force evaluation per tick; Verlet and RK4 reuse it for every
    /// sub-stage.
    #[default]
    Legacy,
    /// Forces are recomputed at every intermediate position.
    Accurate,
}

/// Semi-implicit Euler: velocity first, then position with the new velocity.
pub fn euler(p: &mut Particle, dt: f32) {
    p.velocity += p.acceleration * dt;
    p.position += p.velocity * dt;
}

/// Velocity Verlet with a single acceleration sample.
///
/// There is no force evaluation between the position and velocity updates,
/// so the "average" of old and new acceleration collapses to the old one.
pub fn velocity_verlet(p: &mut Particle, dt: f32) {
    let old_acc = p.acceleration;

    p.position += p.velocity * dt + old_acc * 0.5 * dt * dt;

    p.velocity += (old_acc + p.acceleration) * 0.5 * dt;
}

/// Four-stage Runge-Kutta blend over a single acceleration sample.
///
/// The position stages follow RK4; the velocity-derivative stages
/// `k2..k4` all reuse the pre-step acceleration.
pub fn rk4(p: &mut Particle, dt: f32) {
    let k1_vel = p.acceleration;
    let k1_pos = p.velocity;

    let k2_pos = p.velocity + k1_vel * (0.5 * dt);
    let k2_vel = p.acceleration;

    let k3_pos = p.velocity + k2_vel * (0.5 * dt);
    let k3_vel = p.acceleration;

    let k4_pos = p.velocity + k3_vel * dt;
    let k4_vel = p.acceleration;

    p.position += (k1_pos + k2_pos * 2.0 + k3_pos * 2.0 + k4_pos) * (dt / 6.0);
    p.velocity += (k1_vel + k2_vel * 2.0 + k3_vel * 2.0 + k4_vel) * (dt / 6.0);
}

fn accelerations(particles: &[Particle]) -> Vec<Vec3> {
    particles.iter().map(|p| p.acceleration).collect()
}

/// Velocity Verlet with a second force evaluation at the drifted positions.
fn velocity_verlet_system<F>(particles: &mut [Particle], dt: f32, mut evaluate: F)
where
    F: FnMut(&mut [Particle]),
{
    let old_acc = accelerations(particles);

    for (p, a) in particles.iter_mut().zip(old_acc.iter()) {
        p.position += p.velocity * dt + *a * 0.5 * dt * dt;
    }

    // a_{n+1} at x_{n+1}
    evaluate(particles);

    for (p, a) in particles.iter_mut().zip(old_acc.iter()) {
        p.velocity += (*a + p.acceleration) * 0.5 * dt;
    }
}

/// Classical RK4 over the whole system: forces are sampled at each stage.
///
/// On return each particle's acceleration holds the stage-4 sample.
fn rk4_system<F>(particles: &mut [Particle], dt: f32, mut evaluate: F)
where
    F: FnMut(&mut [Particle]),
{
    let x0: Vec<Vec3> = particles.iter().map(|p| p.position).collect();
    let v0: Vec<Vec3> = particles.iter().map(|p| p.velocity).collect();

    // k1
    let k1_vel = accelerations(particles);
    let k1_pos = v0.clone();

    // k2 at x0 + dt/2 * k1
    for (i, p) in particles.iter_mut().enumerate() {
        p.position = x0[i] + k1_pos[i] * (0.5 * dt);
    }
    evaluate(particles);
    let k2_pos: Vec<Vec3> = (0..v0.len()).map(|i| v0[i] + k1_vel[i] * (0.5 * dt)).collect();
    let k2_vel = accelerations(particles);

    // k3 at x0 + dt/2 * k2
    for (i, p) in particles.iter_mut().enumerate() {
        p.position = x0[i] + k2_pos[i] * (0.5 * dt);
    }
    evaluate(particles);
    let k3_pos: Vec<Vec3> = (0..v0.len()).map(|i| v0[i] + k2_vel[i] * (0.5 * dt)).collect();
    let k3_vel = accelerations(particles);

    // k4 at x0 + dt * k3
    for (i, p) in particles.iter_mut().enumerate() {
        p.position = x0[i] + k3_pos[i] * dt;
    }
    evaluate(particles);
    let k4_pos: Vec<Vec3> = (0..v0.len()).map(|i| v0[i] + k3_vel[i] * dt).collect();
    let k4_vel = accelerations(particles);

    for (i, p) in particles.iter_mut().enumerate() {
        let mut position = x0[i];
        let mut velocity = v0[i];
        position += (k1_pos[i] + k2_pos[i] * 2.0 + k3_pos[i] * 2.0 + k4_pos[i]) * (dt / 6.0);
        velocity += (k1_vel[i] + k2_vel[i] * 2.0 + k3_vel[i] * 2.0 + k4_vel[i]) * (dt / 6.0);
        p.position = position;
        p.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn moving(acceleration: Vec3) -> Particle {
        let mut p = Particle::new(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(3.0, 0.25, -1.0),
            2.0,
            0.1,
            Vec3::ZERO,
        );
        p.acceleration = acceleration;
        p
    }

    #[test]
    fn test_from_index_falls_back_to_euler() {
        assert_eq!(IntegrationMethod::from_index(0), IntegrationMethod::Euler);
        assert_eq!(IntegrationMethod::from_index(1), IntegrationMethod::VelocityVerlet);
        assert_eq!(IntegrationMethod::from_index(2), IntegrationMethod::Rk4);
        assert_eq!(IntegrationMethod::from_index(3), IntegrationMethod::Euler);
        assert_eq!(IntegrationMethod::from_index(-1), IntegrationMethod::Euler);
        assert_eq!(IntegrationMethod::from_index(i64::MAX), IntegrationMethod::Euler);
    }

    #[test]
    fn test_index_round_trip() {
        for method in IntegrationMethod::ALL {
            assert_eq!(IntegrationMethod::from_index(method.index()), method);
        }
    }

    #[test]
    fn test_euler_without_acceleration() {
        let mut p = moving(Vec3::ZERO);
        let (x0, v0) = (p.position, p.velocity);
        let dt = 0.01;
        euler(&mut p, dt);

        assert_eq!(p.velocity, v0);
        assert_eq!(p.position, x0 + v0 * dt);
    }

    #[test]
    fn test_euler_uses_updated_velocity() {
        let a = Vec3::new(0.0, -9.8, 0.0);
        let mut p = moving(a);
        let (x0, v0) = (p.position, p.velocity);
        let dt = 0.1;
        euler(&mut p, dt);

        let v1 = v0 + a * dt;
        assert_eq!(p.velocity, v1);
        assert_eq!(p.position, x0 + v1 * dt);
    }

    #[test]
    fn test_verlet_closed_form() {
        let a = Vec3::new(0.5, -1.5, 2.0);
        let mut p = moving(a);
        let (x0, v0) = (p.position, p.velocity);
        let dt = 0.001;
        velocity_verlet(&mut p, dt);

        assert_eq!(p.position, x0 + (v0 * dt + a * 0.5 * dt * dt));
        assert_eq!(p.velocity, v0 + a * dt);
    }

    #[test]
    fn test_rk4_single_sample_closed_form() {
        let a = Vec3::new(0.5, -1.5, 2.0);
        let mut p = moving(a);
        let (x0, v0) = (p.position, p.velocity);
        let dt = 0.01;
        rk4(&mut p, dt);

        let expected_x = x0 + v0 * dt + a * (0.5 * dt * dt);
        let expected_v = v0 + a * dt;
        assert_relative_eq!(p.position.x, expected_x.x, epsilon = 1e-5);
        assert_relative_eq!(p.position.y, expected_x.y, epsilon = 1e-5);
        assert_relative_eq!(p.position.z, expected_x.z, epsilon = 1e-5);
        assert_relative_eq!(p.velocity.x, expected_v.x, epsilon = 1e-5);
        assert_relative_eq!(p.velocity.y, expected_v.y, epsilon = 1e-5);
        assert_relative_eq!(p.velocity.z, expected_v.z, epsilon = 1e-5);
    }

    #[test]
    fn test_rk4_single_sample_weighted_blend_is_exact() {
        let a = Vec3::new(0.5, -1.5, 2.0);
        let mut p = moving(a);
        let (x0, v0) = (p.position.to_array(), p.velocity.to_array());
        let acc = a.to_array();
        let dt = 0.01f32;
        rk4(&mut p, dt);

        // One axis of the blend, evaluated in scalar arithmetic
        let blend = |x: f32, v: f32, a: f32| {
            let k2 = v + a * (0.5 * dt);
            let k3 = v + a * (0.5 * dt);
            let k4 = v + a * dt;
            (
                x + (v + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0),
                v + (a + a * 2.0 + a * 2.0 + a) * (dt / 6.0),
            )
        };
        for axis in 0..3 {
            let (x, v) = blend(x0[axis], v0[axis], acc[axis]);
            assert_eq!(p.position.to_array()[axis], x);
            assert_eq!(p.velocity.to_array()[axis], v);
        }
    }

    #[test]
    fn test_dispatch_matches_free_functions() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let dt = 0.02;
        let cases: [(IntegrationMethod, fn(&mut Particle, f32)); 3] = [
            (IntegrationMethod::Euler, euler),
            (IntegrationMethod::VelocityVerlet, velocity_verlet),
            (IntegrationMethod::Rk4, rk4),
        ];
        for (method, f) in cases {
            let mut via_enum = moving(a);
            let mut direct = moving(a);
            method.integrate(&mut via_enum, dt);
            f(&mut direct, dt);
            assert_eq!(via_enum, direct, "{method}");
        }
    }

    #[test]
    fn test_accurate_matches_legacy_under_constant_field() {
        let a = Vec3::new(-0.3, 0.7, 1.1);
        let dt = 0.05;
        for method in IntegrationMethod::ALL {
            let mut legacy = vec![moving(a), moving(a * 2.0)];
            let mut accurate = legacy.clone();
            let field: Vec<Vec3> = legacy.iter().map(|p| p.acceleration).collect();

            for p in legacy.iter_mut() {
                method.integrate(p, dt);
            }
            method.integrate_system(&mut accurate, dt, |ps| {
                for (p, a) in ps.iter_mut().zip(field.iter()) {
                    p.acceleration = *a;
                }
            });

            assert_eq!(legacy, accurate, "{method}");
        }
    }

    fn spring(ps: &mut [Particle]) {
        for p in ps.iter_mut() {
            p.acceleration = -p.position;
        }
    }

    /// Integrate x'' = -x for one period and return the position error.
    fn oscillator_error(method: IntegrationMethod, fidelity: IntegrationFidelity) -> f32 {
        let steps = 628;
        let dt = std::f32::consts::TAU / steps as f32;
        let mut ps = vec![Particle::new(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
            1.0,
            Vec3::ZERO,
        )];
        for _ in 0..steps {
            spring(&mut ps);
            match fidelity {
                IntegrationFidelity::Legacy => method.integrate(&mut ps[0], dt),
                IntegrationFidelity::Accurate => method.integrate_system(&mut ps, dt, spring),
            }
        }
        (ps[0].position - Vec3::new(1.0, 0.0, 0.0)).length()
    }

    #[test]
    fn test_accurate_rk4_beats_legacy_on_oscillator() {
        let legacy = oscillator_error(IntegrationMethod::Rk4, IntegrationFidelity::Legacy);
        let accurate = oscillator_error(IntegrationMethod::Rk4, IntegrationFidelity::Accurate);
        assert!(accurate < 1e-3, "accurate rk4 error {accurate}");
        assert!(accurate < legacy);
    }

    #[test]
    fn test_accurate_verlet_stays_on_orbit() {
        let accurate =
            oscillator_error(IntegrationMethod::VelocityVerlet, IntegrationFidelity::Accurate);
        assert!(accurate < 1e-2, "accurate verlet error {accurate}");
    }
}
