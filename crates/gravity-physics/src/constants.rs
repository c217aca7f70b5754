//! Physical constants for the gravity simulation
//!
//! Both values are fixed for the run. Scale particle masses rather than `G`
//! to make interactions visible at simulation scale.

/// Gravitational constant
pub const G: f32 = 6.67430e-11;

/// Softening added to the squared separation before the force law is applied.
/// Bounds the force as two particles approach the same position.
pub const SOFTENING: f32 = 1e-5;

/// Color given to the central body by the initializer (yellow, like a sun)
pub const CENTRAL_BODY_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// Central body radius relative to the largest ordinary particle radius
pub const CENTRAL_BODY_RADIUS_SCALE: f32 = 5.0;
