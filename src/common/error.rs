//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Failed to serialize config: {message}")]
    SerializeError { message: String },
}

/// Operator command failures.
///
/// The display strings are shown to the operator verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown subcommand: {0} (try /wwc help)")]
    UnknownSubcommand(String),

    #[error("Unknown sound type: {0}")]
    UnknownSound(String),

    #[error("Territory not found: {0}")]
    TerritoryNotFound(String),

    #[error("Territory is not on cooldown: {0}")]
    NotOnCooldown(String),

    #[error("No cooldown found for: {0}")]
    NoCooldown(String),

    #[error("Could not start cooldown for: {0}")]
    NotStarted(String),

    #[error("This host cannot change the current territory")]
    PositioningUnsupported,
}

/// Result type alias for operator commands.
pub type CommandResult<T> = std::result::Result<T, CommandError>;
