use core::time::Duration;

use derive_more::{Display, Error};

/// Returned by [`TaskGroup::wait_timeout`](crate::TaskGroup::wait_timeout)
/// when the outstanding tasks did not finish in time.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("task group wait timed out after {timeout:?}")]
pub struct WaitTimeoutError {
    timeout: Duration,
}

impl WaitTimeoutError {
    #[inline]
    pub(crate) fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The timeout that elapsed.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
