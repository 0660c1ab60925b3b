//! CLI-level errors (wraps domain and config errors)

use std::io;

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid tree literal: {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a JSON error with context.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::NotFound(_) => crate::exitcode::NOT_FOUND,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Json { .. } => crate::exitcode::DATAERR,
            CliError::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => crate::exitcode::NOINPUT,
                io::ErrorKind::PermissionDenied => crate::exitcode::CANTCREAT,
                _ => crate::exitcode::IOERR,
            },
            CliError::Tree(_) => crate::exitcode::SOFTWARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_file_error_when_mapping_then_returns_noinput() {
        let err = CliError::io("read tree.json", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_unresolved_path_when_mapping_then_returns_not_found() {
        let err = CliError::NotFound("root/missing".into());
        assert_eq!(err.exit_code(), crate::exitcode::NOT_FOUND);
        assert_eq!(err.to_string(), "not found: root/missing");
    }
}
