//! Timer schedulers: the seam between a delay and the clock that ends it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::BoxFuture;
use tracing::trace;

/// Capability to resume a caller after some amount of time.
pub trait Scheduler: Send + Sync {
    /// Returns a future that completes once `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;

    /// Time elapsed since this scheduler's epoch.
    fn now(&self) -> Duration;
}

/// Type-erased scheduler shared across segments.
pub type SharedScheduler = Arc<dyn Scheduler>;

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        (**self).sleep(duration)
    }

    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Scheduler backed by the tokio timer.
///
/// Under `tokio::time::pause` the clock is virtual, so tests built on this
/// scheduler do not spend real time.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    epoch: tokio::time::Instant,
}

impl TokioScheduler {
    /// Create a scheduler whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: tokio::time::Instant::now(),
        }
    }

    /// Wrap in an `Arc` for sharing.
    pub fn shared() -> SharedScheduler {
        Arc::new(Self::new())
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        if duration.is_zero() {
            // Resolve on the next tick, never inline.
            return Box::pin(tokio::task::yield_now());
        }
        Box::pin(tokio::time::sleep(duration))
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

#[derive(Debug)]
struct PendingTimer {
    deadline: Duration,
    seq: u64,
    fire: oneshot::Sender<()>,
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    timers: Vec<PendingTimer>,
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same clock. Timers fire in deadline order, ties broken
/// by registration order. A timer whose clock is dropped never fires.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create a clock at time zero with no timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a clone in an `Arc` for sharing.
    pub fn shared(&self) -> SharedScheduler {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move the clock forward and fire every timer now due.
    ///
    /// Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut state = self.lock();
            state.now = state.now.saturating_add(by);
            let now = state.now;

            let (mut due, rest): (Vec<_>, Vec<_>) = state
                .timers
                .drain(..)
                .partition(|t| t.deadline <= now);
            state.timers = rest;
            due.sort_by_key(|t| (t.deadline, t.seq));
            due
        };

        let fired = due.len();
        for timer in due {
            trace!(deadline_ms = timer.deadline.as_millis() as u64, "firing virtual timer");
            // A dropped receiver means the waiter went away; nothing to wake.
            let _ = timer.fire.send(());
        }
        fired
    }

    /// Fire timers already due without moving the clock.
    pub fn tick(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Jump to the earliest pending deadline and fire everything due there.
    ///
    /// Returns the new time, or `None` when no timers are pending.
    pub fn advance_to_next(&self) -> Option<Duration> {
        let (now, next) = {
            let state = self.lock();
            (state.now, state.timers.iter().map(|t| t.deadline).min()?)
        };
        self.advance(next.saturating_sub(now));
        Some(self.now())
    }

    /// Number of timers not yet fired.
    pub fn pending(&self) -> usize {
        self.lock().timers.len()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.lock().timers.iter().map(|t| t.deadline).min()
    }
}

impl Scheduler for ManualScheduler {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let (fire, fired) = oneshot::channel();
        {
            let mut state = self.lock();
            let deadline = state.now.saturating_add(duration);
            let seq = state.next_seq;
            state.next_seq += 1;
            state.timers.push(PendingTimer { deadline, seq, fire });
        }

        Box::pin(async move {
            if fired.await.is_err() {
                // Clock dropped: the deadline can never be reached.
                futures::future::pending::<()>().await;
            }
        })
    }

    fn now(&self) -> Duration {
        self.lock().now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_manual_starts_at_zero() {
        let clock = ManualScheduler::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.next_deadline(), None);
    }

    #[test]
    fn test_manual_fires_only_when_due() {
        let clock = ManualScheduler::new();
        let mut sleep = clock.sleep(Duration::from_millis(100));

        assert!((&mut sleep).now_or_never().is_none());
        assert_eq!(clock.advance(Duration::from_millis(99)), 0);
        assert!((&mut sleep).now_or_never().is_none());

        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
        assert!(sleep.now_or_never().is_some());
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_manual_zero_needs_tick() {
        let clock = ManualScheduler::new();
        let mut sleep = clock.sleep(Duration::ZERO);

        assert!((&mut sleep).now_or_never().is_none());
        assert_eq!(clock.tick(), 1);
        assert!(sleep.now_or_never().is_some());
    }

    #[test]
    fn test_manual_clones_share_clock() {
        let clock = ManualScheduler::new();
        let other = clock.clone();
        let _sleep = other.sleep(Duration::from_millis(5));

        assert_eq!(clock.pending(), 1);
        clock.advance(Duration::from_millis(5));
        assert_eq!(other.pending(), 0);
        assert_eq!(other.now(), Duration::from_millis(5));
    }

    #[test]
    fn test_manual_advance_to_next() {
        let clock = ManualScheduler::new();
        let _a = clock.sleep(Duration::from_millis(30));
        let _b = clock.sleep(Duration::from_millis(10));

        assert_eq!(clock.next_deadline(), Some(Duration::from_millis(10)));
        assert_eq!(clock.advance_to_next(), Some(Duration::from_millis(10)));
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.advance_to_next(), Some(Duration::from_millis(30)));
        assert_eq!(clock.advance_to_next(), None);
    }

    #[test]
    fn test_manual_dropped_clock_never_fires() {
        let clock = ManualScheduler::new();
        let mut sleep = clock.sleep(Duration::from_millis(1));
        drop(clock);

        assert!((&mut sleep).now_or_never().is_none());
    }

    #[test]
    fn test_manual_advance_saturates() {
        let clock = ManualScheduler::new();
        let mut sleep = clock.sleep(Duration::from_millis(5));

        assert_eq!(clock.advance(Duration::MAX), 1);
        assert_eq!(clock.advance(Duration::from_millis(1)), 0);
        assert_eq!(clock.now(), Duration::MAX);
        assert!((&mut sleep).now_or_never().is_some());
    }

    #[test]
    fn test_shared_scheduler_delegates() {
        let clock = ManualScheduler::new();
        let shared = clock.shared();
        let _sleep = shared.sleep(Duration::from_millis(7));

        assert_eq!(clock.pending(), 1);
        clock.advance(Duration::from_millis(3));
        assert_eq!(shared.now(), Duration::from_millis(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_uses_paused_clock() {
        let scheduler = TokioScheduler::new();
        scheduler.sleep(Duration::from_secs(60)).await;
        assert!(scheduler.now() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_zero_yields() {
        let scheduler = TokioScheduler::new();
        scheduler.sleep(Duration::ZERO).await;
        assert_eq!(scheduler.now(), Duration::ZERO);
    }
}
