//! Error types for ollabench

use thiserror::Error;

/// Result type alias using BenchError
pub type Result<T> = std::result::Result<T, BenchError>;

/// Error type alias for convenience
pub type Error = BenchError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
    pub const UNHEALTHY: i32 = 4;
}

/// Main error type for ollabench
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Host unhealthy: {0}")]
    Unhealthy(String),

    #[error("Health sampling error: {0}")]
    Health(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BenchError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ModelUnavailable(_) => exit_codes::NOT_FOUND,
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            Self::Unhealthy(_) => exit_codes::UNHEALTHY,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
