//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the upstream client produce:
//!     → logging.rs (structured tracing events, one span per request)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The request ID is recorded on the request span so every event carries it
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
