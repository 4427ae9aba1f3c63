//! Parse-time errors.
//!
//! Every variant ends the current invocation with the program's usage-error
//! exit code, except [`ParseError::SetterExit`], which carries its own code.
//! None of them abort the host process.

use cmdtree_core::ProgramSettings;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An option name matched nothing visible at that point.
    #[error("Unknown option: '{token}'")]
    UnknownOption { token: String, position: usize },

    /// A group has no child with this name and no default or hidden command.
    #[error("Unknown command: '{token}'")]
    UnknownCommand { token: String, position: usize },

    /// A value-taking option was the last element.
    #[error("Option '{option}' requires a value")]
    MissingOptionValue { option: String, position: usize },

    /// A combined short form contains a non-flag before its last character.
    #[error("Option '-{alias}' in '{token}' takes a value and must come last")]
    InvalidShortCombination {
        token: String,
        alias: char,
        position: usize,
    },

    #[error("Expected at least {expected} arguments, but only got {got}")]
    MissingArguments { expected: usize, got: usize },

    #[error("Expected at most {max} arguments, but got {got}")]
    TooManyArguments {
        max: usize,
        got: usize,
        token: String,
    },

    #[error("Missing required option '{option}'")]
    MissingOption { option: String },

    /// A raw string could not be converted.
    #[error("{name}: {message}")]
    Conversion { name: String, message: String },

    /// A converted value failed a validator.
    #[error("{name}: {message}")]
    Validation { name: String, message: String },

    /// An auto-handled setter returned a non-zero exit code.
    #[error("{name}: exited with code {code}")]
    SetterExit { name: String, code: i32 },
}

impl ParseError {
    /// Number of required arguments left unfilled, for arity errors.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            ParseError::MissingArguments { expected, got } => Some(expected - got),
            _ => None,
        }
    }

    pub fn exit_code(&self, settings: &ProgramSettings) -> i32 {
        match self {
            ParseError::SetterExit { code, .. } => *code,
            _ => settings.usage_error_code,
        }
    }

    /// Whether the error is written to the diagnostic stream.
    pub fn is_reported(&self) -> bool {
        !matches!(self, ParseError::SetterExit { .. })
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arguments_message() {
        let err = ParseError::MissingArguments {
            expected: 2,
            got: 0,
        };
        assert_eq!(err.to_string(), "Expected at least 2 arguments, but only got 0");
        assert_eq!(err.shortfall(), Some(2));
    }

    #[test]
    fn test_exit_codes() {
        let settings = ProgramSettings {
            usage_error_code: 64,
            ..Default::default()
        };
        let usage = ParseError::MissingOption {
            option: "--name".into(),
        };
        assert_eq!(usage.exit_code(&settings), 64);

        let setter = ParseError::SetterExit {
            name: "--level".into(),
            code: 7,
        };
        assert_eq!(setter.exit_code(&settings), 7);
        assert!(!setter.is_reported());
    }
}
