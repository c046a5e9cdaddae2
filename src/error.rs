//! Error types for the particle field host

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
