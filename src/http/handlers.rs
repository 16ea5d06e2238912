//! Proxy request handlers.
//!
//! - `/` (any method): redirect to the documentation
//! - `GET /{docId}/{gridId}`: aggregated row listing
//! - `POST /{docId}`: form submission
//! - anything else: 400

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::error::ProxyError;
use crate::http::response::{rows_response, submitted_response};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::PathSegments;
use crate::upstream::{collect_rows, QueryParams};

/// `302 Found` to the project documentation.
pub async fn root_redirect(State(state): State<AppState>) -> Response {
    (StatusCode::FOUND, [(LOCATION, state.docs_location.clone())]).into_response()
}

/// Classify a non-root request by method and run the matching operation.
///
/// The whole operation, pagination included, is bounded by
/// `timeouts.request_secs`; running out of time is reported like any other
/// upstream failure.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let segments = PathSegments::parse(uri.path());
    let secs = state.config.timeouts.request_secs;

    let operation = async {
        match method {
            Method::GET => ("rows", fetch_rows(&state, &segments, uri.query()).await),
            Method::POST => ("submit", submit_form(&state, &segments, body).await),
            method => ("unsupported", Err(ProxyError::Unsupported { method })),
        }
    };
    let (operation, result) = tokio::time::timeout(Duration::from_secs(secs), operation)
        .await
        .unwrap_or(("timeout", Err(ProxyError::Timeout { secs })));

    let response = result.unwrap_or_else(IntoResponse::into_response);
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}

async fn fetch_rows(
    state: &AppState,
    segments: &PathSegments<'_>,
    query: Option<&str>,
) -> Result<Response, ProxyError> {
    let (doc, grid) = segments.table()?;
    let params = QueryParams::parse(query);

    let client = &state.client;
    let (doc_ref, grid_ref, params_ref) = (&doc, &grid, &params);
    let collected = collect_rows(state.config.upstream.max_pages, move |token| {
        client.fetch_page(doc_ref, grid_ref, params_ref.for_page(token.as_deref()))
    })
    .await?;

    tracing::info!(
        doc_id = %doc,
        grid_id = %grid,
        pages = collected.pages,
        rows = collected.rows.len(),
        "Rows fetched"
    );
    Ok(rows_response(collected.rows, state.config.cache.max_age_secs))
}

async fn submit_form(
    state: &AppState,
    segments: &PathSegments<'_>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ProxyError> {
    let doc = segments.doc_id()?;
    let row = parse_body(&body?)?;

    state.client.submit_form(&doc, &row).await?;

    tracing::info!(doc_id = %doc, "Form submitted");
    Ok(submitted_response())
}

/// Parse a submission body; empty or `null` counts as missing.
fn parse_body(body: &[u8]) -> Result<Value, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProxyError::MissingBody);
    }
    match serde_json::from_slice(body)? {
        Value::Null => Err(ProxyError::MissingBody),
        value => Ok(value),
    }
}
