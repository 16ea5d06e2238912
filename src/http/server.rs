//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the proxy handlers
//! - Wire up middleware (request ID, tracing, CORS)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::handlers::{dispatch, root_redirect};
use crate::http::request::{make_request_span, UuidRequestId};
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::security::headers::cors_layers;
use crate::security::CredentialSource;
use crate::upstream::{ClientError, GridClient};

/// Error building the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid documentation URL: {0}")]
    DocsUrl(String),
}

/// Application state injected into handlers. Read-only for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub client: Arc<GridClient>,
    pub docs_location: HeaderValue,
}

impl AppState {
    pub fn new(
        config: ProxyConfig,
        credential: Arc<dyn CredentialSource>,
    ) -> Result<Self, ServerError> {
        let client = GridClient::new(&config.upstream, &config.timeouts, credential)?;
        let docs_location = HeaderValue::from_str(&config.upstream.docs_url)
            .map_err(|_| ServerError::DocsUrl(config.upstream.docs_url.clone()))?;

        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
            docs_location,
        })
    }
}

/// HTTP server for the grid proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    pub fn new(
        config: ProxyConfig,
        credential: Arc<dyn CredentialSource>,
    ) -> Result<Self, ServerError> {
        let state = AppState::new(config, credential)?;
        let config = state.config.clone();
        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_base = %self.config.upstream.api_base,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root_redirect))
        .route("/{*path}", any(dispatch))
        .with_state(state)
        .layer(cors_layers())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::StaticCredential;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION,
    };
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let mut config = ProxyConfig::default();
        // Nothing listens here; these tests never reach the upstream.
        config.upstream.api_base = "http://127.0.0.1:9/apis/v1".into();
        config.upstream.form_base = "http://127.0.0.1:9".into();
        HttpServer::new(config, Arc::new(StaticCredential::new("test-token")))
            .unwrap()
            .router()
    }

    async fn send(request: Request<Body>) -> Response {
        app().oneshot(request).await.unwrap()
    }

    async fn error_message(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        body["error"].as_str().unwrap().to_string()
    }

    fn assert_cors(response: &Response) {
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            "Origin, X-Requested-With, Content-Type, Accept"
        );
    }

    #[tokio::test]
    async fn test_root_redirects_to_docs() {
        let response = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://github.com/spencerc99/opencoda#readme"
        );
        assert_cors(&response);
    }

    #[tokio::test]
    async fn test_invalid_grid_id() {
        for uri in ["/doc/notgrid-1", "/doc", "/doc/x-grid-1?sortBy=index"] {
            let response = send(Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_cors(&response);
            assert!(error_message(response).await.contains("Invalid grid ID"));
        }
    }

    #[tokio::test]
    async fn test_missing_doc_id() {
        let response = send(Request::get("//").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("Missing document ID"));

        let response = send(Request::post("//").body(Body::from("{}")).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert!(error_message(response).await.contains("Missing document ID"));
    }

    #[tokio::test]
    async fn test_post_without_body() {
        let response = send(Request::post("/doc").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert_eq!(error_message(response).await, "Missing request body");
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let row = format!(r#"{{"Notes":"{}"}}"#, "x".repeat(3 * 1024 * 1024));
        let response = send(Request::post("/doc").body(Body::from(row)).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&response);
        assert!(error_message(response)
            .await
            .starts_with("Unreadable request body"));
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let response = send(
            Request::delete("/doc/grid-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert!(error_message(response).await.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_request_id_assigned_and_propagated() {
        let response = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert!(response.headers().contains_key("x-request-id"));

        let response = send(
            Request::get("/")
                .header("x-request-id", "caller-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.headers()["x-request-id"], "caller-id");
    }

    #[test]
    fn test_rejects_invalid_docs_url() {
        let mut config = ProxyConfig::default();
        config.upstream.docs_url = "https://example.com/\n".into();
        let err = HttpServer::new(config, Arc::new(StaticCredential::new("t")))
            .err()
            .unwrap();
        assert!(matches!(err, ServerError::DocsUrl(_)));
    }
}
