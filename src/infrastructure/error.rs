//! Infrastructure-level errors

use thiserror::Error;

/// Infrastructure errors cover I/O and external-process concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("clipboard command failed: {message}")]
    Clipboard {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("no clipboard tool found (tried {tried}); configure export.clipboard_command")]
    NoClipboardTool { tried: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
