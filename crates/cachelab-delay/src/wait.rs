//! The delay primitive.

use std::time::Duration;

use tracing::debug;

use crate::delay::Delay;
use crate::scheduler::{Scheduler, TokioScheduler};

/// Wait `ms` milliseconds on the tokio timer, then resolve to `true`.
///
/// There is no failure path and no cancellation: the returned future only
/// ever completes with `true`, no sooner than `ms` after it is first polled.
pub async fn wait(ms: u64) -> bool {
    Waiter::new(TokioScheduler::new()).wait(ms).await
}

/// Record of a finished wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The delay that was asked for.
    pub requested: Delay,
    /// Time that actually passed on the scheduler's clock.
    pub elapsed: Duration,
    /// Always `true`.
    pub completed: bool,
}

impl Completion {
    /// How far past the requested delay the wait resolved.
    pub fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.requested.as_duration())
    }
}

/// Runs delays against an injected scheduler.
///
/// Each call is independent: concurrent waits share nothing but the
/// scheduler's clock.
#[derive(Debug, Clone, Default)]
pub struct Waiter<S = TokioScheduler> {
    scheduler: S,
}

impl<S: Scheduler> Waiter<S> {
    /// Create a waiter over `scheduler`.
    pub fn new(scheduler: S) -> Self {
        Self { scheduler }
    }

    /// The scheduler this waiter runs on.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Suspend for `delay`, then resolve to `true`.
    pub async fn wait(&self, delay: impl Into<Delay>) -> bool {
        let delay = delay.into();
        debug!(delay_ms = delay.as_millis(), "waiting");
        self.scheduler.sleep(delay.as_duration()).await;
        true
    }

    /// Like [`Waiter::wait`], also reporting how long the wait took.
    pub async fn wait_timed(&self, delay: impl Into<Delay>) -> Completion {
        let delay = delay.into();
        let started = self.scheduler.now();
        let completed = self.wait(delay).await;
        let elapsed = self.scheduler.now().saturating_sub(started);
        debug!(
            delay_ms = delay.as_millis(),
            elapsed_ms = elapsed.as_millis() as u64,
            "wait completed"
        );

        Completion {
            requested: delay,
            elapsed,
            completed,
        }
    }
}
