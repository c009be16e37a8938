//! Timeout enforcement.
//!
//! # Responsibilities
//! - Move CPU-bound work off the async workers
//! - Bound that work with a deadline
//!
//! # Design Decisions
//! - Uses Tokio's blocking pool and timeout facilities
//! - Timeout errors are distinct from other errors
//! - A timed-out blocking task is detached, not cancelled; it finishes in the background

use std::time::Duration;

use tokio::task::JoinError;

/// Failure of a bounded blocking call.
#[derive(Debug, thiserror::Error)]
pub enum BlockingError {
    #[error("operation exceeded {0:?}")]
    TimedOut(Duration),
    #[error("blocking task failed: {0}")]
    Join(#[from] JoinError),
}

/// Run `f` on the blocking pool, giving up after `limit`.
pub async fn run_blocking_with_timeout<T, F>(limit: Duration, f: F) -> Result<T, BlockingError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(f)).await {
        Ok(joined) => Ok(joined?),
        Err(_) => Err(BlockingError::TimedOut(limit)),
    }
}
