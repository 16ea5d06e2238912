//! Shared utilities for integration tests: a recording mock upstream and a
//! proxy instance bound to an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use grid_proxy::lifecycle::Shutdown;
use grid_proxy::security::StaticCredential;
use grid_proxy::{HttpServer, ProxyConfig};
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// A request as seen by the mock upstream.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path as sent on the wire, still percent-encoded.
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Recorded {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub type Requests = Arc<Mutex<Vec<Recorded>>>;

type Respond = Arc<dyn Fn(&Recorded) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    respond: Respond,
    requests: Requests,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: headers
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect(),
        body,
    };
    let (status, body) = (state.respond)(&request);
    state.requests.lock().unwrap().push(request);

    let status = StatusCode::from_u16(status).unwrap();
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

async fn serve_mock(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a mock upstream whose responses are computed from each request.
#[allow(dead_code)]
pub async fn start_mock_upstream<F>(respond: F) -> (SocketAddr, Requests)
where
    F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
{
    let requests: Requests = Arc::default();
    let state = MockState {
        respond: Arc::new(respond),
        requests: requests.clone(),
    };
    let addr = serve_mock(Router::new().fallback(record).with_state(state)).await;
    (addr, requests)
}

/// Start an upstream that accepts every request and never answers it.
#[allow(dead_code)]
pub async fn start_silent_upstream() -> SocketAddr {
    serve_mock(Router::new().fallback(|| std::future::pending::<()>())).await
}

/// Proxy configuration pointing both upstream endpoints at `upstream`.
#[allow(dead_code)]
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.api_base = format!("http://{upstream}/apis/v1");
    config.upstream.form_base = format!("http://{upstream}");
    config
}

/// Run a proxy on an ephemeral port. Dropping the returned `Shutdown` stops it.
#[allow(dead_code)]
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, Arc::new(StaticCredential::new(TEST_TOKEN))).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
