//! # Gravity Simulation
//!
//! Configuration, initial conditions and the per-tick stepper built on
//! `gravity-physics`.

pub mod diagnostics;
pub mod error;
pub mod initialize;
pub mod params;
pub mod stepper;

pub use diagnostics::*;
pub use error::{Error, Result};
pub use initialize::*;
pub use params::*;
pub use stepper::*;
