//! Injectable bring-up failure strategies.
//!
//! 可注入的建立失败策略。
//!
//! The state machine asks its injector before every real setup command. The
//! production injector never intervenes; the countdown injector is only
//! compiled for tests or with the `fault-injection` feature.

use crate::radio::{SetupParams, SetupResponse};

/// Decides whether a bring-up should fail without reaching the radio.
pub trait FailureInjector: Send + Sync + 'static {
    /// Returns a synthetic failed response to use instead of calling the
    /// radio, or `None` to proceed normally.
    fn intercept(&self, params: &SetupParams, radio_version: i32) -> Option<SetupResponse>;
}

/// The production injector: never intervenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFailureInjection;

impl FailureInjector for NoFailureInjection {
    fn intercept(&self, _params: &SetupParams, _radio_version: i32) -> Option<SetupResponse> {
        None
    }
}

#[cfg(any(test, feature = "fault-injection"))]
pub use countdown::BringUpFailure;

#[cfg(any(test, feature = "fault-injection"))]
mod countdown {
    use super::FailureInjector;
    use crate::{
        fail_cause::FailCause,
        radio::{SetupParams, SetupResponse},
    };
    use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
    use tracing::debug;

    /// Fails the next `counter` bring-ups with a configurable cause.
    ///
    /// 使接下来的 `counter` 次建立以可配置的原因失败。
    #[derive(Debug)]
    pub struct BringUpFailure {
        counter: AtomicU32,
        cause: AtomicI32,
        suggested_retry_time: AtomicI32,
    }

    impl Default for BringUpFailure {
        fn default() -> Self {
            Self {
                counter: AtomicU32::new(0),
                cause: AtomicI32::new(FailCause::ErrorUnspecified.code()),
                suggested_retry_time: AtomicI32::new(-1),
            }
        }
    }

    impl BringUpFailure {
        /// Creates an injector that fails the next `counter` bring-ups.
        pub fn new(counter: u32, cause: FailCause, suggested_retry_time: i32) -> Self {
            let injector = Self::default();
            injector.arm(counter, cause, suggested_retry_time);
            injector
        }

        /// Re-arms the injector.
        pub fn arm(&self, counter: u32, cause: FailCause, suggested_retry_time: i32) {
            self.cause.store(cause.code(), Ordering::SeqCst);
            self.suggested_retry_time
                .store(suggested_retry_time, Ordering::SeqCst);
            self.counter.store(counter, Ordering::SeqCst);
        }

        /// Number of bring-ups still to be failed.
        pub fn remaining(&self) -> u32 {
            self.counter.load(Ordering::SeqCst)
        }
    }

    impl FailureInjector for BringUpFailure {
        fn intercept(&self, _params: &SetupParams, radio_version: i32) -> Option<SetupResponse> {
            self.counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .ok()?;
            let cause = FailCause::from_code(self.cause.load(Ordering::SeqCst));
            let retry = self.suggested_retry_time.load(Ordering::SeqCst);
            debug!(%cause, retry, remaining = self.remaining(), "Injecting bring-up failure");
            Some(SetupResponse::failure(radio_version, cause, retry))
        }
    }
}
