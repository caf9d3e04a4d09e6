//! # Poll an attempt until it is ready.
//!
//! Shared engine of [`wait_cond`](crate::wait_cond) and [`wait_value`](crate::wait_value).
//!
//! ## Architecture
//! ```text
//! poll_until(subject, options, attempt)
//!   ├─► signal already cancelled?         → give_up(Signal)
//!   ├─► attempt(subject) vs signal/deadline
//!   │     ├─► Some(v)?                    → return v   (nothing scheduled)
//!   │     └─► signal/deadline first       → give_up(reason), attempt detached
//!   └─► set_polling(interval, remaining timeout, signal)
//!         each tick:
//!           ├─► InFlight::try_enter()     → busy? skip tick
//!           └─► spawn attempt(subject)
//!                 └─► Some(v) && handle.finish() → settle(Ok(v))
//!         on_cancel(reason)               → settle(Err(reason))
//! ```
//!
//! ## Rules
//! - Attempts never overlap: a tick arriving while one is in flight is skipped
//! - Exactly one settlement: success and cancellation race through `finish()`
//! - A late attempt that completes after settlement is discarded
//! - Dropping the returned future stops the registration

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::select;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use crate::{
    config::{PollingConfig, WaitOptions},
    error::CancelReason,
    schedule::{PollingHandle, set_polling},
    wait::state::{InFlight, SettleOnce, StopOnDrop},
};

/// Runs `attempt` until it returns `Some`, the timeout elapses, or the signal fires.
///
/// Returns `Ok(Some(v))` on readiness, `Ok(None)` on cancellation under
/// `nothrow`, `Err(reason)` on cancellation otherwise.
pub(crate) async fn poll_until<S, T, F, Fut>(
    subject: S,
    options: WaitOptions,
    attempt: F,
) -> Result<Option<T>, CancelReason>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(Arc<S>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let WaitOptions {
        interval,
        timeout,
        signal,
        nothrow,
    } = options;
    let started = Instant::now();

    if signal.as_ref().is_some_and(|s| s.is_cancelled()) {
        return give_up(CancelReason::Signal, nothrow);
    }

    let subject = Arc::new(subject);
    let attempt = Arc::new(attempt);

    let deadline = timeout.map(|t| started + t);
    let mut first = Box::pin((*attempt)(Arc::clone(&subject)));
    let early = {
        let token = signal.clone().unwrap_or_default();
        select! {
            biased;
            ready = &mut first => Ok(ready),
            _ = token.cancelled() => Err(CancelReason::Signal),
            _ = expiry(deadline) => Err(CancelReason::Timeout),
        }
    };
    match early {
        Ok(Some(value)) => {
            trace!("ready on first attempt");
            return Ok(Some(value));
        }
        Ok(None) => {}
        Err(reason) => {
            // the first attempt still runs to completion; its outcome is unused
            tokio::spawn(async move {
                let _ = first.await;
            });
            debug!(
                reason = %reason,
                elapsed = ?started.elapsed(),
                "wait cancelled during first attempt"
            );
            return give_up(reason, nothrow);
        }
    }

    let (tx, rx) = oneshot::channel::<Result<T, CancelReason>>();
    let slot = Arc::new(SettleOnce::new(tx));

    let mut config = PollingConfig::new(interval).on_cancel({
        let slot = Arc::clone(&slot);
        move |reason| {
            slot.settle(Err(reason));
        }
    });
    if let Some(timeout) = timeout {
        config = config.with_timeout(timeout.saturating_sub(started.elapsed()));
    }
    if let Some(signal) = signal {
        config = config.with_signal(signal);
    }

    let in_flight = Arc::new(InFlight::default());
    let handle = set_polling(
        move |handle: &PollingHandle| {
            let Some(guard) = in_flight.try_enter() else {
                trace!("attempt still in flight; tick skipped");
                return;
            };
            let subject = Arc::clone(&subject);
            let attempt = Arc::clone(&attempt);
            let slot = Arc::clone(&slot);
            let handle = handle.clone();

            tokio::spawn(async move {
                let ready = (*attempt)(subject).await;
                drop(guard);
                match ready {
                    Some(value) if handle.finish(None) => {
                        slot.settle(Ok(value));
                    }
                    Some(_) => trace!("attempt ready after wait settled; discarded"),
                    None => trace!("not ready"),
                }
            });
        },
        config,
    );
    let _stop = StopOnDrop(handle);

    match rx.await {
        Ok(Ok(value)) => {
            debug!(elapsed = ?started.elapsed(), "wait satisfied");
            Ok(Some(value))
        }
        Ok(Err(reason)) => {
            debug!(reason = %reason, elapsed = ?started.elapsed(), "wait cancelled");
            give_up(reason, nothrow)
        }
        // every sender is gone without settling: the runtime is shutting down
        Err(_closed) => give_up(CancelReason::Manual, nothrow),
    }
}

async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn give_up<T>(reason: CancelReason, nothrow: bool) -> Result<Option<T>, CancelReason> {
    if nothrow { Ok(None) } else { Err(reason) }
}
