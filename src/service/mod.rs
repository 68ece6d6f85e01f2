//! External mind-map generation boundary
//!
//! [`MindMapService`] is the capability seam in front of the HTTP endpoint;
//! tests substitute fakes. [`submit`] is the full submission flow of the
//! view: validate → request → normalize, with the local placeholder tree as
//! transport fallback so the view is always populated.

pub mod http;

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::domain::{self, ConceptTree, DomainError};

pub use http::HttpMindMapService;

/// Transport-level errors from the generation endpoint.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("transport failure")]
    Transport(#[source] Box<ureq::Error>),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Uploaded document or image accompanying (or replacing) the concept text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// MIME type for an attachment path; only PDF and image files are accepted,
/// matching what the service understands.
pub fn mime_for_path(path: &Path) -> Result<&'static str, DomainError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(DomainError::UnsupportedFileType(path.to_path_buf())),
    }
}

/// One submission: concept text and/or a file.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub concept: Option<String>,
    pub file: Option<FileAttachment>,
}

impl GenerateRequest {
    pub fn from_concept(concept: impl Into<String>) -> Self {
        Self {
            concept: Some(concept.into()),
            file: None,
        }
    }

    /// Rejects empty submissions before any request is made.
    pub fn validate(&self) -> Result<(), DomainError> {
        let has_text = self
            .concept
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_text && self.file.is_none() {
            return Err(DomainError::EmptySubmission);
        }
        Ok(())
    }

    /// Seed label for the placeholder tree when the service is unreachable
    /// or skipped (offline mode).
    pub fn fallback_seed(&self) -> &str {
        match self.concept.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => self
                .file
                .as_ref()
                .map(|f| f.name.as_str())
                .unwrap_or("Uploaded Content"),
        }
    }
}

/// Produces mind-map payloads for submissions.
pub trait MindMapService: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<Value, ServiceError>;
}

/// Full submission flow. Input errors are the caller's to handle; transport
/// and malformed-response errors are recovered locally so the result is
/// always a renderable tree.
pub fn submit(
    service: &dyn MindMapService,
    request: &GenerateRequest,
) -> Result<ConceptTree, DomainError> {
    request.validate()?;
    match service.generate(request) {
        Ok(payload) => Ok(domain::normalize(&payload)),
        Err(e) => {
            warn!("mind map service unavailable, using placeholder tree: {e}");
            Ok(domain::placeholder_tree(request.fallback_seed()))
        }
    }
}

/// Guard against rapid resubmission races: each submission begins a new
/// generation, and only the newest token's response may be applied.
#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
}

/// Token handed out per submission; stale tokens fail [`Session::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new submission, invalidating all earlier tokens.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    /// True only for the token of the newest submission; superseded
    /// in-flight responses are discarded on arrival.
    pub fn accept(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }
}
