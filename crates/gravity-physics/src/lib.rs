//! # Gravity Physics Engine
//!
//! CPU reference physics for an N-body gravity simulation: vector math, the
//! particle record, softened Newtonian gravity and the time integrators.

pub mod constants;
pub mod gravity;
pub mod integrator;
pub mod particle;
pub mod vector;

pub use constants::*;
pub use gravity::*;
pub use integrator::*;
pub use particle::*;
pub use vector::*;
