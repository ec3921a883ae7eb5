//! CLI errors.

use jobboard_admin::{ConfigError, MutationError, RemoteError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded; only needed for remote-backed kinds.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend client error: {0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Mutation(#[from] MutationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A flag the chosen kind needs was not given.
    #[error("Missing argument for {kind}: {flag}")]
    MissingArgument { kind: &'static str, flag: &'static str },

    /// The kind does not support this command.
    #[error("{command} is not available for {kind}")]
    Unsupported { command: &'static str, kind: &'static str },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
