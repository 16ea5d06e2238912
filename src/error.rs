//! Error taxonomy for the proxy handler.
//!
//! Every variant is terminal for the current request and surfaces to the
//! caller as a `400 Bad Request` with a `{"error": "..."}` body. There is no
//! distinction between transient and permanent upstream failures.

use axum::extract::rejection::BytesRejection;
use axum::http::{Method, StatusCode};

/// Errors produced while handling a single proxied request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The first path segment (document ID) is missing.
    #[error("Missing document ID. Expected a path like '/{{docId}}/{{gridId}}'")]
    MissingDocId,

    /// The second path segment is missing or lacks the `grid-` prefix.
    #[error("Invalid grid ID. Should be in the format of 'grid-123abc'")]
    InvalidGridId,

    /// A form submission arrived without a body.
    #[error("Missing request body")]
    MissingBody,

    /// The request body could not be read (too large, aborted mid-stream).
    #[error("Unreadable request body: {0}")]
    UnreadableBody(#[from] BytesRejection),

    /// A form submission body could not be parsed as JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The row listing response did not contain an `items` array.
    #[error("Unexpected response from upstream: {body}")]
    UpstreamShape { body: String },

    /// The form endpoint answered with a non-success status. `reason` is the
    /// phrase the upstream sent, or the canonical one when it sent none.
    #[error("Failed to submit form: upstream responded with {}", status_line(.status, .reason))]
    UpstreamStatus { status: StatusCode, reason: String },

    /// The upstream could not be reached or the body could not be read.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The whole request outlived `timeouts.request_secs`.
    #[error("Upstream did not answer within {secs}s")]
    Timeout { secs: u64 },

    /// Pagination kept returning continuation tokens past the configured bound.
    #[error("Upstream returned more than {max_pages} pages")]
    PageLimit { max_pages: usize },

    /// Method and path combination the proxy does not serve.
    #[error("Unsupported request method: {method}")]
    Unsupported { method: Method },
}

impl ProxyError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Whether the failure originated upstream rather than in the inbound request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ProxyError::UpstreamShape { .. }
                | ProxyError::UpstreamStatus { .. }
                | ProxyError::Transport(_)
                | ProxyError::PageLimit { .. }
                | ProxyError::Timeout { .. }
        )
    }
}

fn status_line(status: &StatusCode, reason: &str) -> String {
    if reason.is_empty() {
        status.as_u16().to_string()
    } else {
        format!("{} {reason}", status.as_u16())
    }
}
