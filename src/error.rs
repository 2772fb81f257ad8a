//! Error types for configuration and octree construction.

/// Errors raised while loading or validating a planner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
