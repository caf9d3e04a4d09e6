//! # Configuration for aggregation, scheduling and waiting.
//!
//! Centralizes the option records accepted by the public operations:
//!
//! - [`ResolveOptions`]: failure policy for [`resolve_all`](crate::resolve_all) / [`check_all`](crate::check_all);
//! - [`PollingConfig`]: cadence and cancellation for [`set_polling`](crate::set_polling);
//! - [`SuperIntervalConfig`]: cadence for [`set_super_interval`](crate::set_super_interval);
//! - [`WaitOptions`]: cadence and cancellation for [`wait_cond`](crate::wait_cond) / [`wait_value`](crate::wait_value).
//!
//! ## Defaults
//! - general-purpose scheduling ticks every [`DEFAULT_POLL_INTERVAL`] (1s);
//! - waiters re-check every [`DEFAULT_WAIT_INTERVAL`] (100ms);
//! - no timeout, no signal, no immediate first call.
//!
//! ## Sentinel values
//! - `interval = 0s` → clamped to [`MIN_INTERVAL`] (a zero period cannot be armed)

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::CancelReason;

/// Default cadence of [`set_polling`](crate::set_polling) and [`set_super_interval`](crate::set_super_interval).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default cadence of [`wait_cond`](crate::wait_cond) and [`wait_value`](crate::wait_value).
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_millis(100);

/// Smallest period a repeating trigger is armed with.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Normalized key of a single-producer set.
pub const SINGLE_KEY: &str = "result";

pub(crate) type CancelHook = Box<dyn FnOnce(CancelReason) + Send + 'static>;

/// Clamps an interval to [`MIN_INTERVAL`].
#[inline]
pub(crate) fn effective_interval(interval: Duration) -> Duration {
    interval.max(MIN_INTERVAL)
}

/// Failure policy of one aggregation attempt.
///
/// The two flags compose freely:
///
/// | `settled` | `nothrow` | on failure                                 |
/// |-----------|-----------|--------------------------------------------|
/// | `false`   | `false`   | `Err` with the first rejection             |
/// | `true`    | `false`   | `Err` with every outcome, in input shape   |
/// | any       | `true`    | `Ok` with the absence marker / `false`     |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Collect every outcome instead of reporting the first rejection.
    pub settled: bool,
    /// Never fail; report failure as `Ok(None)` (values) or `Ok(false)` (checks).
    pub nothrow: bool,
}

impl ResolveOptions {
    /// Returns the options with `settled` enabled.
    pub fn settled(mut self) -> Self {
        self.settled = true;
        self
    }

    /// Returns the options with `nothrow` enabled.
    pub fn nothrow(mut self) -> Self {
        self.nothrow = true;
        self
    }
}

/// Options for [`check_all`](crate::check_all); identical to [`ResolveOptions`].
pub type CheckOptions = ResolveOptions;

/// Configuration of a [`set_polling`](crate::set_polling) registration.
///
/// ## Field semantics
/// - `interval`: period between callback invocations (default 1s)
/// - `timeout`: stop after this long and report [`CancelReason::Timeout`]
/// - `immediate`: also invoke the callback once, synchronously, at creation
/// - `signal`: stop when cancelled and report [`CancelReason::Signal`]
///
/// A cancellation hook is attached with [`PollingConfig::on_cancel`]; it runs at
/// most once per handle regardless of how many causes fire.
pub struct PollingConfig {
    /// Period between callback invocations.
    pub interval: Duration,
    /// Total lifetime of the registration (`None` = unbounded).
    pub timeout: Option<Duration>,
    /// Invoke the callback once before arming the repeating trigger.
    pub immediate: bool,
    /// External cancellation signal.
    pub signal: Option<CancellationToken>,
    pub(crate) on_cancel: Option<CancelHook>,
}

impl PollingConfig {
    /// Creates a configuration ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Returns a new config with a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns a new config bound to `signal`.
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Returns a new config that fires once at creation.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    /// Registers the cancellation hook (replaces a previous one).
    ///
    /// Invoked with [`CancelReason::Timeout`], [`CancelReason::Signal`] or
    /// [`CancelReason::Manual`]; never invoked after a plain `stop()`.
    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(CancelReason) + Send + 'static,
    {
        self.on_cancel = Some(Box::new(hook));
        self
    }
}

impl Default for PollingConfig {
    /// Default configuration:
    ///
    /// - `interval = 1s`
    /// - no timeout, no signal, no hook
    /// - `immediate = false`
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            immediate: false,
            signal: None,
            on_cancel: None,
        }
    }
}

impl fmt::Debug for PollingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingConfig")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("immediate", &self.immediate)
            .field("signal", &self.signal)
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

/// Configuration of a [`set_super_interval`](crate::set_super_interval) registration.
///
/// There is no timeout and no cancellation hook: the registration ends on
/// `stop()` or, silently, when `signal` fires.
#[derive(Clone, Debug)]
pub struct SuperIntervalConfig {
    /// Period between callback invocations.
    pub interval: Duration,
    /// Invoke the callback once before arming the repeating trigger.
    pub immediate: bool,
    /// External cancellation signal.
    pub signal: Option<CancellationToken>,
}

impl SuperIntervalConfig {
    /// Creates a configuration ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Returns a new config that fires once at creation.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    /// Returns a new config bound to `signal`.
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}

impl Default for SuperIntervalConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            immediate: false,
            signal: None,
        }
    }
}

/// Options for [`wait_cond`](crate::wait_cond) and [`wait_value`](crate::wait_value).
///
/// ## Field semantics
/// - `interval`: period between checks (default 100ms)
/// - `timeout`: give up after this long with [`CancelReason::Timeout`]
/// - `signal`: give up when cancelled with [`CancelReason::Signal`]
/// - `nothrow`: on give-up, resolve (`Ok(())` / `Ok(None)`) instead of failing
#[derive(Clone, Debug)]
pub struct WaitOptions {
    /// Period between checks.
    pub interval: Duration,
    /// Total time budget (`None` = wait forever).
    pub timeout: Option<Duration>,
    /// External cancellation signal.
    pub signal: Option<CancellationToken>,
    /// Swallow cancellation instead of reporting it.
    pub nothrow: bool,
}

impl WaitOptions {
    /// Returns new options with a check interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns new options with a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns new options bound to `signal`.
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Returns new options with `nothrow` enabled.
    pub fn nothrow(mut self) -> Self {
        self.nothrow = true;
        self
    }
}

impl Default for WaitOptions {
    /// Default options:
    ///
    /// - `interval = 100ms`
    /// - no timeout, no signal
    /// - `nothrow = false`
    fn default() -> Self {
        Self {
            interval: DEFAULT_WAIT_INTERVAL,
            timeout: None,
            signal: None,
            nothrow: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_differ_per_flavor() {
        assert_eq!(PollingConfig::default().interval, Duration::from_secs(1));
        assert_eq!(SuperIntervalConfig::default().interval, Duration::from_secs(1));
        assert_eq!(WaitOptions::default().interval, Duration::from_millis(100));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(effective_interval(Duration::ZERO), MIN_INTERVAL);
        assert_eq!(
            effective_interval(Duration::from_millis(7)),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn test_resolve_options_compose() {
        let opts = ResolveOptions::default().settled().nothrow();
        assert!(opts.settled && opts.nothrow);
        assert_eq!(ResolveOptions::default(), ResolveOptions { settled: false, nothrow: false });
    }
}
