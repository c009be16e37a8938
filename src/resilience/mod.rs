//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Render call:
//!     → timeouts.rs (blocking pool + deadline)
//!     → On failure: error mapped by the caller, never retried
//! ```
//!
//! # Design Decisions
//! - Every CPU-bound call has a deadline
//! - No retries: rendering is deterministic, a failure would repeat

pub mod timeouts;
