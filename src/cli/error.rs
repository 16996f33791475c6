//! CLI-level errors (wraps domain and settings errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("serialize entries: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Serialize(_) | CliError::Settings(SettingsError::Serialize(_)) => {
                crate::exitcode::SOFTWARE
            }
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Domain(e) => match e {
                DomainError::InvalidInput => crate::exitcode::USAGE,
                DomainError::InvariantViolated { .. } => crate::exitcode::DATAERR,
                DomainError::OutOfBounds { .. }
                | DomainError::InvalidParent(_)
                | DomainError::DuplicateRoot => crate::exitcode::SOFTWARE,
            },
        }
    }
}
