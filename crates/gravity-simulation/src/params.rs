//! Simulation parameters, loadable from a `key: value` file
//!
//! The file is read as YAML, so the flat `key: value` layout works as-is:
//!
//! ```yaml
//! max_particles: 500
//! time_step: 0.001
//! integration_method: 1        # 0 euler, 1 velocity verlet, 2 rk4
//! integration_fidelity: legacy # or accurate
//! force_model: pairwise        # or dedicated_central
//! particle_min_mass: 100.0
//! particle_max_mass: 1000.0
//! enable_central_body: 1
//! central_body_mass: 1.0e6
//! central_body_position: [0.0, 0.0, 0.0]
//! space_min: [-100.0, -100.0, -100.0]
//! space_max: [100.0, 100.0, 100.0]
//! ```
//!
//! Missing keys keep their defaults. Unknown keys (window size, shader paths
//! and other presentation settings) are ignored.

use std::path::Path;

use gravity_physics::{CentralBody, ForceModel, IntegrationFidelity, IntegrationMethod, Vec3};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Force-model selection as written in configuration.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForceModelConfig {
    /// Central body takes part in the ordinary pairwise loop
    #[default]
    Pairwise,
    /// Central body is an immovable one-way attractor
    DedicatedCentral,
}

/// Integrator fidelity as written in configuration.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FidelityConfig {
    #[default]
    Legacy,
    Accurate,
}

impl From<FidelityConfig> for IntegrationFidelity {
    fn from(value: FidelityConfig) -> Self {
        match value {
            FidelityConfig::Legacy => IntegrationFidelity::Legacy,
            FidelityConfig::Accurate => IntegrationFidelity::Accurate,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationParams {
    // Simulation
    pub max_particles: usize,
    pub time_step: f32,
    /// 0: Euler, 1: Verlet, 2: RK4. Anything else runs Euler.
    pub integration_method: i64,
    pub integration_fidelity: FidelityConfig,
    pub force_model: ForceModelConfig,
    pub seed: Option<u64>,

    // Particle ranges
    pub particle_min_mass: f32,
    pub particle_max_mass: f32,
    pub particle_min_radius: f32,
    pub particle_max_radius: f32,

    // Central body
    #[serde(deserialize_with = "deserialize_flag")]
    pub enable_central_body: bool,
    pub central_body_mass: f32,
    pub central_body_position: [f32; 3],

    // Collision (no effect on the physics)
    #[serde(deserialize_with = "deserialize_flag")]
    pub enable_collision: bool,
    pub collision_damping: f32,

    // Space bounds (initial placement only; not enforced while stepping)
    #[serde(deserialize_with = "deserialize_flag")]
    pub enable_bounded_space: bool,
    pub space_min: [f32; 3],
    pub space_max: [f32; 3],
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_particles: 1000,
            time_step: 0.001, // 1ms
            integration_method: IntegrationMethod::VelocityVerlet.index(),
            integration_fidelity: FidelityConfig::Legacy,
            force_model: ForceModelConfig::Pairwise,
            seed: None,

            particle_min_mass: 100.0,
            particle_max_mass: 1000.0,
            particle_min_radius: 0.1,
            particle_max_radius: 0.5,

            enable_central_body: true,
            central_body_mass: 1.0e6,
            central_body_position: [0.0, 0.0, 0.0],

            enable_collision: true,
            collision_damping: 0.8,

            enable_bounded_space: true,
            space_min: [-100.0, -100.0, -100.0],
            space_max: [100.0, 100.0, 100.0],
        }
    }
}

impl SimulationParams {
    /// Parse parameters from `key: value` text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load parameters from a file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let params = Self::from_yaml_str(&text)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(params)
    }

    pub fn integration_method(&self) -> IntegrationMethod {
        IntegrationMethod::from_index(self.integration_method)
    }

    pub fn fidelity(&self) -> IntegrationFidelity {
        self.integration_fidelity.into()
    }

    /// Force model used by the stepper.
    ///
    /// `dedicated_central` needs the central body to be enabled, since the
    /// initializer places it at index 0; otherwise this falls back to
    /// [`ForceModel::Pairwise`].
    pub fn resolved_force_model(&self) -> ForceModel {
        match self.force_model {
            ForceModelConfig::Pairwise => ForceModel::Pairwise,
            ForceModelConfig::DedicatedCentral if self.enable_central_body => {
                ForceModel::DedicatedCentral(CentralBody {
                    mass: self.central_body_mass,
                    position: Vec3::from_array(self.central_body_position),
                    anchor: Some(0),
                })
            }
            ForceModelConfig::DedicatedCentral => {
                log::warn!("force_model dedicated_central requires enable_central_body; using pairwise");
                ForceModel::Pairwise
            }
        }
    }

    /// Check the ranges the initializer relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_particles == 0 {
            return Err(Error::InvalidParam("max_particles must be > 0".into()));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(Error::InvalidParam("time_step must be finite and > 0".into()));
        }
        if !(self.particle_min_mass > 0.0) || self.particle_min_mass > self.particle_max_mass {
            return Err(Error::InvalidParam(format!(
                "particle mass range [{}, {}] must be positive and ordered",
                self.particle_min_mass, self.particle_max_mass
            )));
        }
        if self.particle_min_radius < 0.0 || self.particle_min_radius > self.particle_max_radius {
            return Err(Error::InvalidParam(format!(
                "particle radius range [{}, {}] must be non-negative and ordered",
                self.particle_min_radius, self.particle_max_radius
            )));
        }
        if self.enable_central_body && !(self.central_body_mass > 0.0) {
            return Err(Error::InvalidParam("central_body_mass must be > 0".into()));
        }
        if (0..3).any(|i| self.space_min[i] > self.space_max[i]) {
            return Err(Error::InvalidParam(format!(
                "space_min {:?} must not exceed space_max {:?}",
                self.space_min, self.space_max
            )));
        }
        Ok(())
    }

    /// Warn about settings that are accepted but have no effect on stepping.
    pub fn log_inert_settings(&self) {
        if self.enable_collision {
            log::warn!(
                "enable_collision is set (damping {}) but collisions are not simulated",
                self.collision_damping
            );
        }
        if self.enable_bounded_space {
            log::info!("space bounds are used for initial placement only");
        }
        if self.integration_method().index() != self.integration_method {
            log::warn!(
                "unknown integration_method {}, falling back to {}",
                self.integration_method,
                IntegrationMethod::Euler
            );
        }
    }
}

/// Accept `true`/`false` as well as the `1`/`0` style flags.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SimulationParams::default();
        assert_eq!(params.max_particles, 1000);
        assert_eq!(params.time_step, 0.001);
        assert_eq!(params.integration_method(), IntegrationMethod::VelocityVerlet);
        assert_eq!(params.fidelity(), IntegrationFidelity::Legacy);
        assert_eq!(params.resolved_force_model(), ForceModel::Pairwise);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_empty_text_is_default() {
        let params = SimulationParams::from_yaml_str("  \n").unwrap();
        assert_eq!(params, SimulationParams::default());
    }

    #[test]
    fn test_key_value_overrides() {
        let text = "\
window_width: 1920
window_height: 1080
max_particles: 42
time_step: 0.01
integration_method: 2
integration_fidelity: accurate
enable_central_body: 0
enable_collision: false
central_body_mass: 2.5e5
space_min: [-10, -10, -10]
space_max: [10, 10, 10]
";
        let params = SimulationParams::from_yaml_str(text).unwrap();
        assert_eq!(params.max_particles, 42);
        assert_eq!(params.time_step, 0.01);
        assert_eq!(params.integration_method(), IntegrationMethod::Rk4);
        assert_eq!(params.fidelity(), IntegrationFidelity::Accurate);
        assert!(!params.enable_central_body);
        assert!(!params.enable_collision);
        assert_eq!(params.central_body_mass, 2.5e5);
        assert_eq!(params.space_min, [-10.0; 3]);
        // Untouched keys keep defaults
        assert_eq!(params.particle_max_mass, 1000.0);
    }

    #[test]
    fn test_unknown_method_falls_back() {
        let params = SimulationParams::from_yaml_str("integration_method: 7").unwrap();
        assert_eq!(params.integration_method(), IntegrationMethod::Euler);
    }

    #[test]
    fn test_dedicated_central_model() {
        let params = SimulationParams::from_yaml_str("force_model: dedicated_central").unwrap();
        match params.resolved_force_model() {
            ForceModel::DedicatedCentral(central) => {
                assert_eq!(central.mass, 1.0e6);
                assert_eq!(central.anchor, Some(0));
            }
            other => panic!("unexpected model {other:?}"),
        }

        let params = SimulationParams::from_yaml_str(
            "force_model: dedicated_central\nenable_central_body: false",
        )
        .unwrap();
        assert_eq!(params.resolved_force_model(), ForceModel::Pairwise);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut params = SimulationParams {
            particle_min_mass: 10.0,
            particle_max_mass: 1.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("mass"));

        params = SimulationParams {
            max_particles: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        params = SimulationParams {
            space_min: [0.0, 5.0, 0.0],
            space_max: [1.0, 1.0, 1.0],
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = SimulationParams::from_yaml_str("max_particles: lots").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
