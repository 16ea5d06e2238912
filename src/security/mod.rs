//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Process start:
//!     → credentials.rs (read the bearer token once, hand it to the server)
//!
//! Every response:
//!     → headers.rs (permissive CORS headers)
//! ```
//!
//! # Design Decisions
//! - The credential is injected into handler state, never read from ambient globals
//! - The credential never appears in logs or responses

pub mod credentials;
pub mod headers;

pub use credentials::{CredentialError, CredentialSource, EnvCredential, StaticCredential};
