//! CLI-level errors (wraps the lower layers)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;
use crate::render::RenderError;
use crate::service::ServiceError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Config(#[from] SettingsError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("cannot read {path}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not valid JSON: {path}")]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Domain(e) => match e {
                DomainError::EmptySubmission
                | DomainError::UnsupportedFileType(_)
                | DomainError::UnknownNode(_) => crate::exitcode::USAGE,
                DomainError::DepthExceeded { .. } | DomainError::UnrecognizedPayload => {
                    crate::exitcode::DATAERR
                }
            },
            CliError::Service(_) => crate::exitcode::UNAVAILABLE,
            CliError::Render(_) => crate::exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Clipboard { .. } | InfraError::NoClipboardTool { .. } => {
                    crate::exitcode::UNAVAILABLE
                }
            },
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::ReadInput { .. } => crate::exitcode::NOINPUT,
            CliError::ParseInput { .. } => crate::exitcode::DATAERR,
            CliError::Io { .. } => crate::exitcode::IOERR,
        }
    }
}
