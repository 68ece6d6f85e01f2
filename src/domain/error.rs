//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent business rule violations.
/// These are independent of transport and rendering concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("nothing to submit: provide a concept text or a file")]
    EmptySubmission,

    #[error("payload nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    #[error("payload matches neither the central/branches nor the name/children shape")]
    UnrecognizedPayload,

    #[error("unsupported file type: {0} (expected PDF or image)")]
    UnsupportedFileType(PathBuf),

    #[error("no node named {0:?} in the tree")]
    UnknownNode(String),
}
