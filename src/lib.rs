//! Grid proxy library.
//!
//! Republishes rows of a hosted tabular document as a CORS-enabled JSON
//! array and forwards form submissions back to the document, keeping the API
//! credential on the server.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
