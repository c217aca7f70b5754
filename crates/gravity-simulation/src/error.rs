use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or seeding a simulation.
///
/// The per-tick physics never fails; these only come from loading
/// configuration and building the initial particle set.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The configuration file is not valid `key: value` YAML.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
