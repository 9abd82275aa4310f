//! CLI error types with exit code handling
//!
//! Every command returns [`CliError`]; `main` renders it through miette and
//! exits with the code the variant maps to.

use miette::Diagnostic;
use thiserror::Error;
use timeconv_core::CoreError;
use timeconv_engine::{EngineError, TemplateError};

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// A conversion rejected its input
    #[error("{message}")]
    #[diagnostic(code(timeconv::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Template rendering failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(TemplateError),

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(timeconv::cli::io))]
    Io { message: String },

    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(timeconv::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(timeconv::cli::error))]
    Other { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Template(_) => exit_codes::TEMPLATE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn usage(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(io) => io.into(),
            err if err.is_input_error() => CliError::Input {
                message: err.to_string(),
                help: None,
            },
            err => CliError::Other {
                message: err.to_string(),
            },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Template(te) => CliError::Template(te),
            EngineError::Io(io) => io.into(),
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
