// Error types for benchmark setup
//
// Request failures are never errors: they are classified into an ErrorKind and
// returned as AttemptOutcome values. This type only covers the setup surface
// (bad configuration, HTTP client construction, unknown scenario ids).

use thiserror::Error;

/// Result type alias for benchmark setup operations
pub type Result<T> = std::result::Result<T, NetBenchError>;

/// Errors that can occur before or around a benchmark run
#[derive(Debug, Error)]
pub enum NetBenchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport could not be constructed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unknown scenario identifier
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

impl NetBenchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        NetBenchError::Configuration(msg.into())
    }

    /// Create a transport construction error
    pub fn transport(msg: impl Into<String>) -> Self {
        NetBenchError::Transport(msg.into())
    }
}
