//! HTTP client for the upstream document service.

use std::sync::Arc;
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::observability::metrics;
use crate::routing::{DocId, GridId};
use crate::security::CredentialSource;
use crate::upstream::pagination::Page;
use crate::upstream::query::QueryParams;

/// Error building the upstream client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid {field}: {source}")]
    Url {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{field} cannot be used as a base URL: {value}")]
    NotABase { field: &'static str, value: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct FormSubmission<'a> {
    row: &'a Value,
}

/// Client for row listings and form submissions.
///
/// Cheap to share: wraps a pooled `reqwest::Client` and the injected credential.
pub struct GridClient {
    http: reqwest::Client,
    api_base: Url,
    form_base: Url,
    credential: Arc<dyn CredentialSource>,
}

impl GridClient {
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        credential: Arc<dyn CredentialSource>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("grid-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: parse_base("upstream.api_base", &upstream.api_base)?,
            form_base: parse_base("upstream.form_base", &upstream.form_base)?,
            credential,
        })
    }

    /// `{api_base}/docs/{doc}/tables/{grid}/rows`, segments percent-encoded.
    pub fn rows_url(&self, doc: &DocId, grid: &GridId) -> Url {
        join(
            &self.api_base,
            &["docs", doc.as_str(), "tables", grid.as_str(), "rows"],
        )
    }

    /// `{form_base}/form/{doc}/submit`.
    pub fn form_url(&self, doc: &DocId) -> Url {
        join(&self.form_base, &["form", doc.as_str(), "submit"])
    }

    /// Fetch and parse one page of rows.
    pub async fn fetch_page(
        &self,
        doc: &DocId,
        grid: &GridId,
        params: QueryParams,
    ) -> Result<Page, ProxyError> {
        let response = self
            .http
            .get(self.rows_url(doc, grid))
            .query(&params)
            .bearer_auth(self.credential.credential())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        metrics::record_upstream_page(status.as_u16());
        tracing::debug!(
            doc_id = %doc,
            grid_id = %grid,
            status = status.as_u16(),
            bytes = body.len(),
            "Fetched upstream page"
        );

        Page::from_body(body)
    }

    /// Submit `row` to the document's form as `{"row": row}`.
    pub async fn submit_form(&self, doc: &DocId, row: &Value) -> Result<(), ProxyError> {
        let response = self
            .http
            .post(self.form_url(doc))
            .json(&FormSubmission { row })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(doc_id = %doc, status = status.as_u16(), "Form submitted upstream");
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status,
                reason: reason_phrase(&response),
            });
        }
        Ok(())
    }
}

/// Reason phrase sent on the status line, falling back to the canonical one.
/// Empty when the status has neither.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_string()
}

fn parse_base(field: &'static str, value: &str) -> Result<Url, ClientError> {
    let url = Url::parse(value).map_err(|source| ClientError::Url { field, source })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::NotABase {
            field,
            value: value.to_string(),
        });
    }
    Ok(url)
}

fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
