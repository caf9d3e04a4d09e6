//! Per-call wait state: re-entrancy guard and settle-once slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::schedule::PollingHandle;

/// Marks a check as in flight; at most one guard exists at a time.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    /// Returns a guard unless a previous check is still running.
    pub(crate) fn try_enter(self: &Arc<Self>) -> Option<InFlightGuard> {
        if self.0.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(InFlightGuard(Arc::clone(self)))
    }
}

/// Releases the in-flight flag on drop.
#[derive(Debug)]
pub(crate) struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::Release);
    }
}

/// Delivers the first outcome of a wait; later ones are dropped.
pub(crate) struct SettleOnce<T>(Mutex<Option<oneshot::Sender<T>>>);

impl<T> SettleOnce<T> {
    pub(crate) fn new(tx: oneshot::Sender<T>) -> Self {
        Self(Mutex::new(Some(tx)))
    }

    /// Sends `value` if nothing was sent yet. Returns `true` if it was delivered.
    pub(crate) fn settle(&self, value: T) -> bool {
        let tx = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
        match tx {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }
}

/// Stops the polling registration when the wait future goes away.
pub(crate) struct StopOnDrop(pub(crate) PollingHandle);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_blocks_overlap_until_dropped() {
        let flag = Arc::new(InFlight::default());
        let guard = flag.try_enter();
        assert!(guard.is_some());
        assert!(flag.try_enter().is_none());
        drop(guard);
        assert!(flag.try_enter().is_some());
    }

    #[test]
    fn test_settle_once_delivers_first_value() {
        let (tx, mut rx) = oneshot::channel();
        let slot = SettleOnce::new(tx);
        assert!(slot.settle(1));
        assert!(!slot.settle(2));
        assert_eq!(rx.try_recv(), Ok(1));
    }
}
