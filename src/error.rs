//! Error types for the attractor engine.
//!
//! Only requests coming from outside the engine can fail: looking up an
//! attractor by name, validating the catalog, and loading configuration.
//! Numerical trouble inside the simulation (runaway or non-finite particles)
//! is repaired in place and never surfaces here.

use std::fmt;

/// Errors that can occur when configuring or driving the engine.
#[derive(Debug)]
pub enum MorphError {
    /// The given id does not name an attractor in the catalog.
    UnknownField(String),
    /// An attractor's parameters failed validation.
    InvalidField {
        /// Attractor id.
        id: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorphError::UnknownField(id) => write!(f, "Unknown attractor field: '{}'", id),
            MorphError::InvalidField { id, reason } => {
                write!(f, "Invalid attractor field '{}': {}", id, reason)
            }
            MorphError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for MorphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MorphError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for MorphError {
    fn from(e: ConfigError) -> Self {
        MorphError::Config(e)
    }
}

/// Errors that can occur while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    Io(std::io::Error),
    /// The file is not valid JSON for the config schema.
    Parse(serde_json::Error),
    /// The values parsed but violate a constraint.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MorphError>;
