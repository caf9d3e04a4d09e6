//! Repeating callbacks with stop/abort/timeout/signal termination.
//!
//! - [`set_polling`]: general-purpose cadence with a once-only cancellation hook;
//! - [`set_super_interval`]: cadence driven by a [`TickSource`] that survives a
//!   starved runtime timer, `stop()` only.
//!
//! Both guarantee a single Running → Stopped transition per handle.

mod lifecycle;
mod polling;
mod super_interval;
mod ticks;

pub use polling::{PollingHandle, set_polling};
pub use super_interval::{SuperIntervalHandle, set_super_interval, set_super_interval_with};
pub use ticks::{ThreadTicks, TickSource, TimerTicks, probe_ticks};
