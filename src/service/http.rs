//! HTTP implementation of the mind-map service
//!
//! Posts a multipart/form-data submission (text field `concept`, binary
//! field `file`) to the generation endpoint and parses the JSON body. The
//! multipart body is assembled by hand; the endpoint only needs the two
//! well-known parts.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::service::{GenerateRequest, MindMapService, ServiceError};

pub struct HttpMindMapService {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpMindMapService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }
}

impl MindMapService for HttpMindMapService {
    #[instrument(level = "debug", skip(self, request))]
    fn generate(&self, request: &GenerateRequest) -> Result<Value, ServiceError> {
        let boundary = format!("conceptmap-{}", Uuid::new_v4().simple());
        let body = encode_multipart(request, &boundary);
        debug!(endpoint = %self.endpoint, bytes = body.len(), "submitting mind map request");

        let response = self
            .agent
            .post(&self.endpoint)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => ServiceError::Status(code),
                other => ServiceError::Transport(Box::new(other)),
            })?;

        response
            .into_json::<Value>()
            .map_err(|e| ServiceError::Body(e.to_string()))
    }
}

fn encode_multipart(request: &GenerateRequest, boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(concept) = request.concept.as_deref().filter(|c| !c.trim().is_empty()) {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"concept\"\r\n\r\n");
        body.extend_from_slice(concept.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = &request.file {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file.name.replace('"', "_")
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime).as_bytes());
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
