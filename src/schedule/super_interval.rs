//! # Throttle-resistant repeating callback (`set_super_interval`).
//!
//! Same cadence contract as [`set_polling`](crate::set_polling), but the timing
//! source is a [`TickSource`] chosen by [`probe_ticks`]: a dedicated tick thread when
//! available, the runtime timer otherwise. The callback always runs on the
//! runtime; only the timing source moves.
//!
//! Smaller surface: no timeout, no `abort()`, no cancellation hook.
//! A fired `signal` stops the registration silently.

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    config::SuperIntervalConfig,
    schedule::lifecycle::Lifecycle,
    schedule::ticks::{TickSource, probe_ticks},
};

/// Handle to one [`set_super_interval`] registration.
#[derive(Clone, Debug)]
#[must_use = "dropping the handle does not stop the interval"]
pub struct SuperIntervalHandle {
    life: Arc<Lifecycle>,
}

impl SuperIntervalHandle {
    /// Stops the registration; idempotent.
    pub fn stop(&self) {
        if self.life.stop() {
            debug!("super interval stopped");
        }
    }

    /// Returns `true` once stopped.
    pub fn is_stopped(&self) -> bool {
        self.life.is_stopped()
    }

    fn stopped() -> Self {
        let life = Lifecycle::default();
        life.stop();
        debug!("super interval not started: signal already cancelled");
        Self {
            life: Arc::new(life),
        }
    }
}

fn signal_fired(config: &SuperIntervalConfig) -> bool {
    config
        .signal
        .as_ref()
        .is_some_and(CancellationToken::is_cancelled)
}

/// Invokes `callback` every `config.interval` using the most robust tick source available.
///
/// # Panics
/// Panics if called outside a tokio runtime.
pub fn set_super_interval<F>(callback: F, config: SuperIntervalConfig) -> SuperIntervalHandle
where
    F: FnMut(&SuperIntervalHandle) + Send + 'static,
{
    if signal_fired(&config) {
        return SuperIntervalHandle::stopped();
    }
    let source = probe_ticks(config.interval);
    set_super_interval_with(source, callback, config)
}

/// Like [`set_super_interval`], with an explicit tick source.
///
/// `config.interval` is ignored; the source defines the cadence.
pub fn set_super_interval_with<F>(
    source: Box<dyn TickSource>,
    mut callback: F,
    config: SuperIntervalConfig,
) -> SuperIntervalHandle
where
    F: FnMut(&SuperIntervalHandle) + Send + 'static,
{
    if signal_fired(&config) {
        return SuperIntervalHandle::stopped();
    }
    let handle = SuperIntervalHandle {
        life: Arc::new(Lifecycle::default()),
    };
    let SuperIntervalConfig {
        immediate, signal, ..
    } = config;

    if immediate {
        callback(&handle);
        if handle.is_stopped() {
            return handle;
        }
    }

    debug!(source = source.name(), "super interval started");
    tokio::spawn(drive(handle.clone(), source, callback, signal.unwrap_or_default()));
    handle
}

async fn drive<F>(
    handle: SuperIntervalHandle,
    mut source: Box<dyn TickSource>,
    mut callback: F,
    signal: CancellationToken,
) where
    F: FnMut(&SuperIntervalHandle) + Send + 'static,
{
    let halted = handle.life.halted();
    loop {
        select! {
            biased;
            _ = halted.cancelled() => break,
            _ = signal.cancelled() => {
                handle.stop();
                break;
            }
            tick = source.tick() => match tick {
                Some(()) if !handle.is_stopped() => callback(&handle),
                _ => break,
            },
        }
    }
}
