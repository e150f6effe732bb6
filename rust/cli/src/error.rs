//! Error types for the CLI application.
//!
//! Every command handler returns `Result<(), CliError>`; [`crate::run`] maps
//! any error to exit code `2`.

use std::fmt;

use jokerpoker_engine::errors::{ActionError, CardError, ConfigError, ProcessingError};

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine-related error
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<CardError> for CliError {
    fn from(error: CardError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<ActionError> for CliError {
    fn from(error: ActionError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<ProcessingError> for CliError {
    fn from(error: ProcessingError) -> Self {
        CliError::Engine(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_errors_are_reported_as_input_errors() {
        let error: CliError = "Ace|Q".parse::<jokerpoker_engine::cards::Card>().unwrap_err().into();
        assert!(matches!(error, CliError::InvalidInput(_)));
        assert!(error.to_string().starts_with("Invalid input:"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;
        let error = CliError::from(std::io::Error::other("disk full"));
        assert!(error.source().is_some());
        assert_eq!(error.to_string(), "I/O error: disk full");
    }
}
