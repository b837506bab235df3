//! Bounded-wait acquisition: poll a condition until it yields or time runs out.

use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("condition not met within {0:?}")]
    Timeout(Duration),
}

/// Calls `probe` immediately and then every `interval` until it returns
/// `Some`, or fails once `timeout` has elapsed.
pub fn wait_for<T>(
    timeout: Duration,
    interval: Duration,
    mut probe: impl FnMut() -> Option<T>,
) -> Result<T, WaitError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(v) = probe() {
            return Ok(v);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout(timeout));
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}
