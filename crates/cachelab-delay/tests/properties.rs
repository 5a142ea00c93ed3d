//! Latency, outcome and independence checks for the delay primitive,
//! run against both the virtual clock and tokio's paused clock.

use std::time::Duration;

use cachelab_delay::{wait, Delay, DurationPolicy, ManualScheduler, Scheduler, Waiter};
use futures::future::join_all;
use futures::FutureExt;
use tokio::time::{timeout, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_virtual_minimum_latency() {
    for d in [0u64, 1, 15, 1000, 60_000] {
        let clock = ManualScheduler::new();
        let waiter = Waiter::new(clock.clone());
        let mut pending = Box::pin(waiter.wait_timed(d));

        assert!((&mut pending).now_or_never().is_none(), "resolved before {}ms", d);
        if d > 0 {
            clock.advance(ms(d - 1));
            assert!((&mut pending).now_or_never().is_none(), "resolved before {}ms", d);
            clock.advance(ms(1));
        } else {
            clock.tick();
        }

        let completion = pending.now_or_never().expect("resolved at deadline");
        assert!(completion.elapsed >= ms(d));
        assert!(completion.completed);
    }
}

#[test]
fn test_virtual_fractional_request_is_not_shortened() {
    let clock = ManualScheduler::new();
    let waiter = Waiter::new(clock.clone());
    let delay = DurationPolicy::Reject.parse("0.5").unwrap();
    let mut pending = Box::pin(waiter.wait_timed(delay));

    assert!((&mut pending).now_or_never().is_none());
    clock.tick();
    assert!((&mut pending).now_or_never().is_none());
    clock.advance(Duration::from_micros(499));
    assert!((&mut pending).now_or_never().is_none());
    clock.advance(Duration::from_micros(1));

    let completion = pending.now_or_never().expect("resolved at deadline");
    assert!(completion.elapsed >= Duration::from_micros(500));
}

#[test]
fn test_virtual_independent_waits() {
    let clock = ManualScheduler::new();
    let waiter = Waiter::new(clock.clone());
    let mut short = Box::pin(waiter.wait(10u64));
    let mut medium = Box::pin(waiter.wait(20u64));
    let mut long = Box::pin(waiter.wait(30u64));

    for fut in [&mut short, &mut medium, &mut long] {
        assert!(fut.now_or_never().is_none());
    }
    assert_eq!(clock.pending(), 3);

    clock.advance(ms(10));
    assert_eq!((&mut short).now_or_never(), Some(true));
    assert!((&mut medium).now_or_never().is_none());
    assert!((&mut long).now_or_never().is_none());

    clock.advance(ms(10));
    assert_eq!((&mut medium).now_or_never(), Some(true));
    assert!((&mut long).now_or_never().is_none());

    clock.advance(ms(10));
    assert_eq!(long.now_or_never(), Some(true));
    assert_eq!(clock.pending(), 0);
}

#[test]
fn test_virtual_equal_waits_resolve_together() {
    let clock = ManualScheduler::new();
    let waiter = Waiter::new(clock.clone());
    let mut both = Box::pin(join_all([waiter.wait(1000u64), waiter.wait(1000u64)]));

    assert!((&mut both).now_or_never().is_none());
    assert_eq!(clock.advance(ms(1000)), 2);
    assert_eq!(both.now_or_never(), Some(vec![true, true]));
    assert_eq!(clock.now(), ms(1000));
}

#[test]
fn test_virtual_large_duration_has_no_early_signal() {
    let clock = ManualScheduler::new();
    let waiter = Waiter::new(clock.clone());
    let mut pending = Box::pin(waiter.wait(60_000u64));

    for _ in 0..59 {
        assert!((&mut pending).now_or_never().is_none());
        clock.advance(ms(1000));
    }
    clock.advance(ms(999));
    assert!((&mut pending).now_or_never().is_none());

    clock.advance(ms(1));
    assert_eq!(pending.now_or_never(), Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_always_true() {
    for d in [0u64, 1, 250, 1000] {
        let start = Instant::now();
        assert!(wait(d).await);
        assert!(start.elapsed() >= ms(d));
    }
}

#[tokio::test(start_paused = true)]
async fn test_tokio_zero_duration() {
    let start = Instant::now();
    assert!(wait(0).await);
    assert!(start.elapsed() < ms(1));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_concurrent_waits_are_not_serialized() {
    let start = Instant::now();
    let results = join_all([wait(1000), wait(1000)]).await;

    assert_eq!(results, vec![true, true]);
    let elapsed = start.elapsed();
    assert!(elapsed >= ms(1000));
    assert!(elapsed < ms(2000));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_distinct_durations_resolve_in_order() {
    let waiter: Waiter = Waiter::default();
    let completions = join_all(
        [300u64, 100, 200]
            .into_iter()
            .map(|d| waiter.wait_timed(Delay::from_millis(d))),
    )
    .await;

    for completion in &completions {
        assert!(completion.completed);
        assert!(completion.elapsed >= completion.requested.as_duration());
        // Neither wait held the others up.
        assert!(completion.elapsed < completion.requested.as_duration() + ms(100));
    }
}

#[tokio::test(start_paused = true)]
async fn test_tokio_large_duration() {
    let mut pending = Box::pin(wait(60_000));

    assert!(timeout(ms(59_999), &mut pending).await.is_err());
    assert!(pending.await);
}
