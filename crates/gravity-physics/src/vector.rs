//! Vector math for particle state
//!
//! All particle state is [`glam::Vec3`]. On top of it, [`VectorMath`] adds the
//! two guarded operations the simulation relies on: division and
//! normalization hand back the input untouched instead of producing
//! `NaN`/`inf`.

pub use glam::Vec3;

/// Below this length a vector is left as-is by [`VectorMath::normalize_or_self`].
pub const NORMALIZE_EPSILON: f32 = 1e-8;

pub trait VectorMath: Sized {
    /// Divide every component by `scalar`.
    ///
    /// Dividing by exactly `0.0` returns `self` unchanged. Any other divisor
    /// is applied as a multiplication by its reciprocal.
    fn divide(self, scalar: f32) -> Self;

    /// Unit vector in the same direction.
    ///
    /// Vectors shorter than [`NORMALIZE_EPSILON`] (including the zero vector)
    /// are returned unchanged.
    fn normalize_or_self(self) -> Self;
}

impl VectorMath for Vec3 {
    fn divide(self, scalar: f32) -> Self {
        if scalar == 0.0 {
            return self;
        }
        self * (1.0 / scalar)
    }

    fn normalize_or_self(self) -> Self {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            return self;
        }
        self.map(|c| c / length)
    }
}
