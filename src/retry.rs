//! Retry bookkeeping accessor.
//!
//! 重试簿记访问器。
//!
//! The bearer stores one retry policy object per connection on behalf of its
//! owner, but never reads or interprets it: the handle only forwards the
//! owner's calls.

use std::time::Duration;

/// Retry counters and timers owned by the tracker.
///
/// Methods take `&self`; implementations pick their own interior mutability
/// since the owner may call them from any task.
pub trait RetryPolicy: Send + Sync + 'static {
    fn retry_count(&self) -> u32;
    fn set_retry_count(&self, count: u32);
    /// Delay before the next retry.
    fn retry_timer(&self) -> Duration;
    fn increase_retry_count(&self);
    fn is_retry_needed(&self) -> bool;
    fn reset_retry_count(&self);
    fn retry_forever_using_last_timeout(&self);
    fn is_retry_forever(&self) -> bool;
    /// Configures a fixed retry schedule. Returns whether it was accepted.
    fn configure(
        &self,
        max_retry_count: u32,
        retry_time: Duration,
        randomization: Duration,
    ) -> bool;
    /// Configures the schedule from its textual form. Returns whether it was accepted.
    fn configure_from_str(&self, config: &str) -> bool;
}

/// A policy that never asks for a retry and rejects any configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn retry_count(&self) -> u32 {
        0
    }

    fn set_retry_count(&self, _count: u32) {}

    fn retry_timer(&self) -> Duration {
        Duration::ZERO
    }

    fn increase_retry_count(&self) {}

    fn is_retry_needed(&self) -> bool {
        false
    }

    fn reset_retry_count(&self) {}

    fn retry_forever_using_last_timeout(&self) {}

    fn is_retry_forever(&self) -> bool {
        false
    }

    fn configure(&self, _max: u32, _retry_time: Duration, _randomization: Duration) -> bool {
        false
    }

    fn configure_from_str(&self, _config: &str) -> bool {
        false
    }
}
