//! Response shaping.
//!
//! Every response built here carries the permissive CORS headers. Only row
//! listings carry a cache directive.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;
use crate::security::headers::{cors_headers, shared_cache};

/// JSON error body returned for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"error": message}` with the given status.
pub fn error_response(message: impl Into<String>, status: StatusCode) -> Response {
    (
        status,
        cors_headers(),
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Aggregated rows as a JSON array, cacheable by shared caches.
pub fn rows_response(rows: Vec<Value>, max_age_secs: u64) -> Response {
    (
        StatusCode::OK,
        cors_headers(),
        [shared_cache(max_age_secs)],
        Json(rows),
    )
        .into_response()
}

/// Acknowledgement for a successful form submission.
pub fn submitted_response() -> Response {
    (StatusCode::OK, cors_headers(), Json("ok")).into_response()
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            tracing::warn!(error = %self, "Upstream failure");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
        error_response(self.to_string(), self.status())
    }
}
