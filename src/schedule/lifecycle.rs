use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

/// Running → Stopped latch shared by a handle and its driver task.
///
/// `halt` wakes the driver so the repeating trigger is released on the first
/// transition, not on the next tick.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    stopped: AtomicBool,
    halt: CancellationToken,
}

impl Lifecycle {
    /// Transitions to stopped. Returns `true` only for the first caller.
    pub(crate) fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.halt.cancel();
        true
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Token cancelled on the first [`Lifecycle::stop`].
    pub(crate) fn halted(&self) -> CancellationToken {
        self.halt.clone()
    }
}
