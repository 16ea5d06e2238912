//! Upstream document service subsystem.
//!
//! # Data Flow
//! ```text
//! Row listing:
//!     caller query string
//!         → query.rs (flatten, merge over defaults, add page token)
//!         → client.rs (GET rows with bearer credential)
//!         → pagination.rs (repeat while a continuation token is returned)
//!         → ordered Vec of row values
//!
//! Form submission:
//!     JSON body → client.rs (POST {"row": body}, no credential)
//! ```
//!
//! # Design Decisions
//! - Pages are fetched strictly one after another
//! - Pagination is bounded by `upstream.max_pages`
//! - No retries: the first failure is reported to the caller

pub mod client;
pub mod pagination;
pub mod query;

pub use client::{ClientError, GridClient};
pub use pagination::{collect_rows, Collected, Page};
pub use query::QueryParams;
