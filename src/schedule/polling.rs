//! # Cancellable repeating callback (`set_polling`).
//!
//! [`set_polling`] invokes a callback every `interval` until the registration
//! stops. The returned [`PollingHandle`] controls it.
//!
//! ## State machine
//! ```text
//! set_polling() ──► Running ──┬─ stop()          ──► Stopped
//!      │                      ├─ abort()         ──► Stopped + on_cancel(Manual)
//!      │                      ├─ signal fired    ──► Stopped + on_cancel(Signal)
//!      │                      └─ timeout elapsed ──► Stopped + on_cancel(Timeout)
//!      │
//!      └─ signal already cancelled ──► Stopped + on_cancel(Signal)   (callback never runs)
//! ```
//!
//! ## Rules
//! - The repeating trigger is armed synchronously at creation
//! - `immediate` fires the callback once, synchronously, before arming
//! - `on_cancel` fires **at most once**; the first cause wins
//! - Once stopped, `stop`/`abort` and pending ticks are no-ops
//! - Missed ticks are skipped, never replayed in a burst
//! - A callback already running is never interrupted

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::select;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    config::{CancelHook, PollingConfig, effective_interval},
    error::CancelReason,
    schedule::lifecycle::Lifecycle,
};

struct PollingShared {
    life: Lifecycle,
    on_cancel: Mutex<Option<CancelHook>>,
}

/// Handle to one [`set_polling`] registration.
///
/// Cloning is cheap; every clone controls the same registration.
#[derive(Clone)]
#[must_use = "dropping the handle does not stop polling"]
pub struct PollingHandle {
    shared: Arc<PollingShared>,
}

impl PollingHandle {
    fn new(on_cancel: Option<CancelHook>) -> Self {
        Self {
            shared: Arc::new(PollingShared {
                life: Lifecycle::default(),
                on_cancel: Mutex::new(on_cancel),
            }),
        }
    }

    /// Stops polling without notifying `on_cancel`.
    pub fn stop(&self) {
        self.finish(None);
    }

    /// Stops polling and notifies `on_cancel` with [`CancelReason::Manual`].
    pub fn abort(&self) {
        self.finish(Some(CancelReason::Manual));
    }

    /// Returns `true` once the registration has stopped for any cause.
    pub fn is_stopped(&self) -> bool {
        self.shared.life.is_stopped()
    }

    /// Performs the Running → Stopped transition.
    ///
    /// Returns `true` only for the call that performed it. The hook is taken
    /// on that call whatever the cause, so no later cause can fire it.
    pub(crate) fn finish(&self, reason: Option<CancelReason>) -> bool {
        if !self.shared.life.stop() {
            return false;
        }
        let hook = self
            .shared
            .on_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match reason {
            Some(reason) => {
                debug!(reason = %reason, "polling cancelled");
                if let Some(hook) = hook {
                    hook(reason);
                }
            }
            None => debug!("polling stopped"),
        }
        true
    }
}

impl std::fmt::Debug for PollingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Invokes `callback` every `config.interval` until stopped.
///
/// The callback receives the handle, so it can `stop()` or `abort()` itself.
///
/// # Panics
/// Panics if called outside a tokio runtime.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use pollvisor::{set_polling, PollingConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut ticks = 0;
/// let handle = set_polling(
///     move |h| {
///         ticks += 1;
///         if ticks == 3 {
///             h.stop();
///         }
///     },
///     PollingConfig::new(Duration::from_millis(5)),
/// );
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// assert!(handle.is_stopped());
/// # }
/// ```
pub fn set_polling<F>(mut callback: F, config: PollingConfig) -> PollingHandle
where
    F: FnMut(&PollingHandle) + Send + 'static,
{
    let PollingConfig {
        interval,
        timeout,
        immediate,
        signal,
        on_cancel,
    } = config;

    let armed_at = Instant::now();
    let deadline = timeout.map(|t| armed_at + t);
    let handle = PollingHandle::new(on_cancel);

    if signal.as_ref().is_some_and(CancellationToken::is_cancelled) {
        handle.finish(Some(CancelReason::Signal));
        return handle;
    }

    if immediate {
        callback(&handle);
        if handle.is_stopped() {
            return handle;
        }
    }

    let period = effective_interval(interval);
    debug!(interval = ?period, timeout = ?timeout, "polling started");
    tokio::spawn(drive(
        handle.clone(),
        callback,
        armed_at,
        period,
        deadline,
        signal,
    ));
    handle
}

/// Driver loop: the only place ticks, timeout and signal are observed.
async fn drive<F>(
    handle: PollingHandle,
    mut callback: F,
    armed_at: Instant,
    period: Duration,
    deadline: Option<Instant>,
    signal: Option<CancellationToken>,
) where
    F: FnMut(&PollingHandle) + Send + 'static,
{
    let halted = handle.shared.life.halted();
    let signal = signal.unwrap_or_default();

    let mut ticker = time::interval_at(armed_at + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let expiry = async {
        match deadline {
            Some(at) => time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expiry);

    loop {
        select! {
            biased;
            _ = halted.cancelled() => break,
            _ = signal.cancelled() => {
                handle.finish(Some(CancelReason::Signal));
                break;
            }
            _ = &mut expiry => {
                handle.finish(Some(CancelReason::Timeout));
                break;
            }
            _ = ticker.tick() => {
                if handle.is_stopped() {
                    break;
                }
                callback(&handle);
            }
        }
    }
}
