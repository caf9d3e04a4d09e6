//! # Example: polling
//!
//! Demonstrates the scheduling primitives and their termination causes.
//!
//! Shows how to:
//! - Run a callback on a cadence with [`set_polling`]
//! - Stop it from inside the callback, by timeout, or by a signal
//! - Observe the single [`CancelReason`] delivered to `on_cancel`
//! - Keep a cadence with [`set_super_interval`] (thread-driven ticks)
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► set_polling(every 100ms, stop after 3 ticks)      → stop(), no on_cancel
//!   ├─► set_polling(every 100ms, timeout 350ms)           → on_cancel(timeout)
//!   ├─► set_polling(every 100ms, signal cancelled @250ms) → on_cancel(signal)
//!   └─► set_super_interval(every 100ms)                   → stop() after 500ms
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example polling
//! ```

use std::time::Duration;

use pollvisor::{
    CancelReason, PollingConfig, SuperIntervalConfig, set_polling, set_super_interval,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let every = Duration::from_millis(100);

    // 1. Callback-driven stop
    let mut ticks = 0;
    let self_stop = set_polling(
        move |h| {
            ticks += 1;
            println!("[self-stop] tick {ticks}");
            if ticks == 3 {
                h.stop();
            }
        },
        PollingConfig::new(every).on_cancel(|r: CancelReason| println!("[self-stop] cancel={r}")),
    );

    // 2. Timeout
    let timed = set_polling(
        |_| println!("[timed] tick"),
        PollingConfig::new(every)
            .with_timeout(Duration::from_millis(350))
            .on_cancel(|r| println!("[timed] cancel={r}")),
    );

    // 3. External signal
    let token = CancellationToken::new();
    let signalled = set_polling(
        |_| println!("[signalled] tick"),
        PollingConfig::new(every)
            .immediate()
            .with_signal(token.clone())
            .on_cancel(|r| println!("[signalled] cancel={r}")),
    );

    // 4. Thread-driven cadence
    let background = set_super_interval(
        |_| println!("[super] tick"),
        SuperIntervalConfig::new(every),
    );

    tokio::time::sleep(Duration::from_millis(250)).await;
    token.cancel();
    tokio::time::sleep(Duration::from_millis(250)).await;
    background.stop();

    println!(
        "[done] stopped: self={} timed={} signalled={} super={}",
        self_stop.is_stopped(),
        timed.is_stopped(),
        signalled.is_stopped(),
        background.is_stopped()
    );
}
