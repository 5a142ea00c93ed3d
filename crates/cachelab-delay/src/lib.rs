//! Artificial latency for simulating slow data fetches and slow renders.
//!
//! This crate provides:
//! - `wait` - Resolve to `true` after a number of milliseconds
//! - `Waiter` - The same operation over an injected `Scheduler`
//! - `TokioScheduler` - Real timers (honours tokio's paused clock)
//! - `ManualScheduler` - Virtual clock driven by `advance`
//! - `Delay` / `DurationPolicy` - Millisecond conversion rules
//!
//! # Example
//!
//! ```ignore
//! use cachelab_delay::{wait, ManualScheduler, Waiter};
//!
//! assert!(wait(1000).await);
//!
//! let clock = ManualScheduler::new();
//! let waiter = Waiter::new(clock.clone());
//! let pending = waiter.wait(1000u64);
//! clock.advance(std::time::Duration::from_millis(1000));
//! ```

mod delay;
mod error;
mod scheduler;
mod wait;

pub use delay::*;
pub use error::*;
pub use scheduler::*;
pub use wait::*;
