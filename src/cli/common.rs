//! Shared CLI error and exit-code handling.

use std::fmt;

/// Result type for CLI command execution.
pub type CliResult<T> = Result<T, CliError>;

/// Process exit codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Invalid arguments or configuration
    Validation = 2,
    /// File system failure
    Io = 3,
    /// Backend request failure
    Network = 4,
}

/// An error carrying a user-facing message and an exit code.
#[derive(Debug)]
pub struct CliError {
    message: String,
    exit_code: ExitCode,
}

impl CliError {
    /// Creates a validation error (exit code 2).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::Validation,
        }
    }

    /// Creates an I/O error (exit code 3).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::Io,
        }
    }

    /// Creates a network error (exit code 4).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::Network,
        }
    }

    /// The process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("x").exit_code(), 2);
        assert_eq!(CliError::io("x").exit_code(), 3);
        assert_eq!(CliError::network("x").exit_code(), 4);
    }

    #[test]
    fn test_display_is_message() {
        assert_eq!(CliError::validation("bad input").to_string(), "bad input");
    }
}
