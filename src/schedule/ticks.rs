//! # Tick sources for [`set_super_interval`](crate::set_super_interval).
//!
//! A [`TickSource`] yields one tick per period. Two implementations exist:
//!
//! - [`ThreadTicks`]: a dedicated OS thread is sent the period (in ms) and
//!   replies with a numbered tick every period over a channel. The runtime's
//!   own timer wheel is not involved, so a busy or starved runtime still sees
//!   ticks once it polls again.
//! - [`TimerTicks`]: a plain `tokio::time::Interval`.
//!
//! [`probe_ticks`] prefers [`ThreadTicks`] and falls back to [`TimerTicks`] when a
//! thread cannot be spawned.
//!
//! ## Rules
//! - Backlogged ticks collapse into one (no bursts after a stall)
//! - Dropping a [`ThreadTicks`] ends its thread after at most one period

use std::io;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::{Duration, Instant as StdInstant};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::effective_interval;

/// Source of periodic ticks.
#[async_trait]
pub trait TickSource: Send + 'static {
    /// Returns a stable, human-readable source name.
    fn name(&self) -> &'static str;

    /// Waits for the next tick. Returns `None` once the source is exhausted.
    async fn tick(&mut self) -> Option<()>;
}

/// Ticks driven by the tokio timer.
#[derive(Debug)]
pub struct TimerTicks {
    interval: Interval,
}

impl TimerTicks {
    /// Creates a source whose first tick is one `period` from now.
    pub fn new(period: Duration) -> Self {
        let period = effective_interval(period);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl TickSource for TimerTicks {
    fn name(&self) -> &'static str {
        "timer"
    }

    async fn tick(&mut self) -> Option<()> {
        self.interval.tick().await;
        Some(())
    }
}

/// Ticks delivered by a dedicated OS thread.
#[derive(Debug)]
pub struct ThreadTicks {
    ticks: mpsc::UnboundedReceiver<u64>,
}

impl ThreadTicks {
    /// Spawns the tick thread and hands it `period`.
    ///
    /// Fails if the thread cannot be spawned or exits before accepting the period.
    pub fn spawn(period: Duration) -> io::Result<Self> {
        let (control_tx, control_rx) = std_mpsc::channel::<u64>();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();

        thread::Builder::new()
            .name("pollvisor-ticks".into())
            .spawn(move || tick_worker(control_rx, tick_tx))?;

        let millis = u64::try_from(effective_interval(period).as_millis()).unwrap_or(u64::MAX);
        control_tx
            .send(millis)
            .map_err(|_| io::Error::other("tick thread exited before start"))?;

        Ok(Self { ticks: tick_rx })
    }
}

#[async_trait]
impl TickSource for ThreadTicks {
    fn name(&self) -> &'static str {
        "thread"
    }

    async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await?;
        while self.ticks.try_recv().is_ok() {}
        Some(())
    }
}

/// Thread body: waits for the period, then sends numbered ticks until the receiver is gone.
fn tick_worker(control: std_mpsc::Receiver<u64>, ticks: mpsc::UnboundedSender<u64>) {
    let Ok(millis) = control.recv() else {
        return;
    };
    let period = Duration::from_millis(millis);
    let mut next = StdInstant::now() + period;
    let mut seq: u64 = 0;

    loop {
        let now = StdInstant::now();
        if next > now {
            thread::sleep(next - now);
        }
        seq += 1;
        if ticks.send(seq).is_err() {
            break;
        }
        next += period;
        let now = StdInstant::now();
        if next < now {
            next = now + period;
        }
    }
}

/// Picks the most robust source available for `period`.
pub fn probe_ticks(period: Duration) -> Box<dyn TickSource> {
    match ThreadTicks::spawn(period) {
        Ok(src) => {
            debug!(source = src.name(), interval = ?period, "tick source selected");
            Box::new(src)
        }
        Err(e) => {
            warn!(error = %e, "tick thread unavailable; falling back to runtime timer");
            Box::new(TimerTicks::new(period))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_follow_period() {
        let start = Instant::now();
        let mut src = TimerTicks::new(Duration::from_millis(10));
        assert_eq!(src.tick().await, Some(()));
        assert_eq!(src.tick().await, Some(()));
        assert_eq!(start.elapsed(), Duration::from_millis(20));
        assert_eq!(src.name(), "timer");
    }

    #[tokio::test]
    async fn test_thread_ticks_arrive() {
        let mut src = ThreadTicks::spawn(Duration::from_millis(5)).unwrap();
        let started = StdInstant::now();
        for _ in 0..3 {
            assert_eq!(src.tick().await, Some(()));
        }
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_thread_ticks_collapse_backlog() {
        let mut src = ThreadTicks::spawn(Duration::from_millis(20)).unwrap();
        std::thread::sleep(Duration::from_millis(110));
        assert_eq!(src.tick().await, Some(()));
        assert!(src.ticks.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_probe_prefers_thread() {
        let src = probe_ticks(Duration::from_millis(50));
        assert_eq!(src.name(), "thread");
    }
}
