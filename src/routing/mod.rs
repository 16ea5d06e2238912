//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path "/{docId}/{gridId}/..."
//!     → path.rs (split into non-empty segments)
//!     → DocId / GridId (validated identifiers)
//!     → handler for the request method
//! ```
//!
//! # Design Decisions
//! - Empty segments are skipped, so "//doc//grid-1" parses like "/doc/grid-1"
//! - Grid identifiers must begin with "grid-"; a later occurrence does not count
//! - Segments past the ones an operation needs are ignored

pub mod path;

pub use path::{DocId, GridId, PathSegments};
