//! # pollvisor
//!
//! **Pollvisor** is a small library of async control-flow primitives for tokio.
//!
//! It aggregates many asynchronous checks or values into one outcome, and
//! schedules repeated work against wall-clock time and an external
//! [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Producer / Producer / Producer        (sync fn, async fn, pending future)
//!        └──────────┬──────────┘
//!                   ▼
//!     Group::{One, List, Map}  ──► normalize() ──► keyed entries + Reshape
//!                   │
//!                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  aggregate                                                        │
//! │  - resolve_all  (fail-fast | settled) × (throw | nothrow)         │
//! │  - check_all    resolve_all over booleans, all must be `true`     │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │                                              │
//!        ▼                                              ▼
//! ┌──────────────────────┐   polls through   ┌──────────────────────────┐
//! │  wait                │ ────────────────► │  schedule                │
//! │  - wait_cond         │                   │  - set_polling           │
//! │  - wait_value        │                   │  - set_super_interval    │
//! └──────────────────────┘                   └──────────────────────────┘
//! ```
//!
//! ### Wait lifecycle
//! ```text
//! wait_cond / wait_value
//!   ├─► signal already cancelled?     ─► Err(Signal) | Ok under nothrow
//!   ├─► one attempt vs timeout/signal ─► ready? return, nothing scheduled
//!   └─► set_polling(interval, timeout, signal)
//!         loop on tick {
//!           ├─► attempt in flight?    ─► skip tick
//!           ├─► attempt (nothrow)     ─► ready? stop + return value
//!           └─► not ready / failed    ─► wait for next tick
//!         }
//!         timeout / signal            ─► Err(Timeout | Signal) | Ok under nothrow
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / functions                        |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Producers**     | Sync, async and pending sources in single/list/map shapes.   | [`Producer`], [`Group`], [`normalize`]       |
//! | **Aggregation**   | One-shot fail-fast or settled resolution, boolean checks.     | [`resolve_all`], [`check_all`], [`Settlement`] |
//! | **Scheduling**    | Repeating callbacks with stop/abort/timeout/signal.          | [`set_polling`], [`set_super_interval`]      |
//! | **Waiting**       | Retry-until-ready polling with error suppression.            | [`wait_cond`], [`wait_value`]                |
//! | **Errors**        | Typed failures and cancellation causes.                      | [`ResolveError`], [`CheckError`], [`CancelReason`] |
//! | **Configuration** | Option records with documented defaults.                     | [`ResolveOptions`], [`PollingConfig`], [`WaitOptions`] |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{wait_value, Group, Producer, WaitOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoints = Group::map([
//!         ("primary", Producer::<Option<String>, String>::ready(Some("10.0.0.1".into()))),
//!         ("replica", Producer::from_async(|| async { Ok(Some("10.0.0.2".to_string())) })),
//!     ]);
//!
//!     let options = WaitOptions::default().with_timeout(Duration::from_secs(5));
//!     let found = wait_value(endpoints, options).await?;
//!     assert_eq!(found.and_then(|g| g.get("replica").cloned()).as_deref(), Some("10.0.0.2"));
//!     Ok(())
//! }
//! ```
mod aggregate;
mod config;
mod error;
mod producers;
mod schedule;
mod wait;

// ---- Public re-exports ----

pub use aggregate::{Settlement, check_all, resolve_all};
pub use config::{
    CheckOptions, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_INTERVAL, MIN_INTERVAL, PollingConfig,
    ResolveOptions, SINGLE_KEY, SuperIntervalConfig, WaitOptions,
};
pub use error::{CancelReason, CheckError, ResolveError};
pub use producers::{Check, Group, Producer, ProducerSet, Reshape, normalize};
pub use schedule::{
    PollingHandle, SuperIntervalHandle, ThreadTicks, TickSource, TimerTicks, probe_ticks,
    set_polling, set_super_interval, set_super_interval_with,
};
pub use wait::{wait_cond, wait_value};
