//! # Example: wait_for_ready
//!
//! Demonstrates waiting for several dependencies to come up before starting work.
//!
//! Shows how to:
//! - Combine checks in a keyed [`Group`] with [`wait_cond`]
//! - Treat failing checks as "not ready yet" (they are retried, never reported)
//! - Collect discovered values with [`wait_value`]
//! - Bound the wait with a timeout and a [`CancellationToken`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► spawn "boot" task: db up after 150ms, cache up after 300ms
//!   ├─► wait_cond({ db, cache }, interval=50ms, timeout=2s)
//!   │     ├─► attempt #1 → db=Err, cache=false → not ready
//!   │     ├─► ... every 50ms ...
//!   │     └─► attempt #n → db=true, cache=true → Ok(())
//!   └─► wait_value({ leader }, interval=50ms, signal)
//!         └─► leader elected → Ok(Some({ leader: "node-2" }))
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wait_for_ready
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollvisor::{Group, Producer, WaitOptions, wait_cond, wait_value};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_up = Arc::new(AtomicBool::new(false));
    let cache_up = Arc::new(AtomicBool::new(false));
    let leader: Arc<Mutex<Option<String>>> = Arc::default();

    // 1. Simulate dependencies coming up in the background
    {
        let (db_up, cache_up, leader) = (db_up.clone(), cache_up.clone(), leader.clone());
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            db_up.store(true, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(150)).await;
            cache_up.store(true, Ordering::SeqCst);
            *leader.lock().unwrap() = Some("node-2".into());
        });
    }

    // 2. Wait until both checks hold; the db check errors while it is down
    let checks = Group::map([
        (
            "db",
            Producer::<bool, String>::from_fn(move || {
                if db_up.load(Ordering::SeqCst) {
                    Ok(true)
                } else {
                    Err("connection refused".into())
                }
            }),
        ),
        (
            "cache",
            Producer::from_fn(move || Ok(cache_up.load(Ordering::SeqCst))),
        ),
    ]);

    let options = WaitOptions::default()
        .with_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_secs(2));
    wait_cond(checks, options).await?;
    println!("[ready] db and cache are up");

    // 3. Collect a value; the signal gives up after one second
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            shutdown.cancel();
        });
    }

    let values = Group::map([(
        "leader",
        Producer::<Option<String>, String>::from_fn(move || Ok(leader.lock().unwrap().clone())),
    )]);
    let options = WaitOptions::default()
        .with_interval(Duration::from_millis(50))
        .with_signal(shutdown);

    match wait_value(values, options).await? {
        Some(found) => println!("[leader] {:?}", found.get("leader")),
        None => println!("[leader] not found"),
    }
    Ok(())
}
