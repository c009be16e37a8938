//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and dispatcher produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span via tower-http
//! - Render failure causes are logged here, never returned to clients

pub mod logging;
pub mod metrics;
