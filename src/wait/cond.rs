//! # Wait for boolean checks (`wait_cond`).
//!
//! Polls a [`ProducerSet`] of checks through [`check_all`] until every one
//! yields `true`.

use crate::{
    aggregate::check_all,
    config::{CheckOptions, WaitOptions},
    error::CancelReason,
    producers::ProducerSet,
    wait::poll::poll_until,
};

/// Waits until every check in `checks` yields `true`.
///
/// Checks run once immediately, then every `options.interval`. A check that
/// fails counts as "not yet": errors are never reported, only retried.
///
/// Returns `Err(CancelReason::Timeout)` / `Err(CancelReason::Signal)` when the
/// wait is cancelled first, or `Ok(())` in that case if `options.nothrow` is set.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use pollvisor::{wait_cond, Group, Producer, WaitOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ready = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&ready);
/// tokio::spawn(async move {
///     tokio::time::sleep(Duration::from_millis(30)).await;
///     flag.store(true, Ordering::SeqCst);
/// });
///
/// let checks = Group::one(Producer::<bool, ()>::from_fn(move || Ok(ready.load(Ordering::SeqCst))));
/// let options = WaitOptions::default()
///     .with_interval(Duration::from_millis(10))
///     .with_timeout(Duration::from_secs(1));
/// wait_cond(checks, options).await.unwrap();
/// # }
/// ```
pub async fn wait_cond<E>(
    checks: ProducerSet<bool, E>,
    options: WaitOptions,
) -> Result<(), CancelReason>
where
    E: Send + 'static,
{
    poll_until(checks, options, |checks| async move {
        let holds = check_all(&checks, CheckOptions::default().nothrow())
            .await
            .unwrap_or(false);
        holds.then_some(())
    })
    .await
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producers::{Group, Producer};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{self, Instant};
    use tokio_util::sync::CancellationToken;

    type Checks = ProducerSet<bool, &'static str>;

    fn always(value: bool) -> Checks {
        Group::one(Producer::ready(value))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_true_resolves_without_waiting() {
        let start = Instant::now();
        wait_cond(always(true), WaitOptions::default()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_false_times_out() {
        let options = WaitOptions::default().with_interval(ms(10)).with_timeout(ms(50));
        let err = wait_cond(always(false), options).await.unwrap_err();
        assert_eq!(err, CancelReason::Timeout);
        assert_eq!(err.to_string(), "timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_with_nothrow_resolves() {
        let options = WaitOptions::default()
            .with_interval(ms(10))
            .with_timeout(ms(50))
            .nothrow();
        assert_eq!(wait_cond(always(false), options).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let checks: Checks = Group::one(Producer::from_fn(move || {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err("not yet"),
                _ => Ok(true),
            }
        }));

        wait_cond(checks, WaitOptions::default()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_check_must_hold() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let checks: Checks = Group::map([
            ("static", Producer::ready(true)),
            (
                "warming",
                Producer::from_fn(move || Ok(counter.fetch_add(1, Ordering::SeqCst) >= 2)),
            ),
        ]);

        let start = Instant::now();
        wait_cond(checks, WaitOptions::default().with_interval(ms(10)))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), ms(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_signal() {
        let token = CancellationToken::new();
        token.cancel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let checks: Checks = Group::one(Producer::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }));

        let options = WaitOptions::default().with_signal(token.clone());
        assert_eq!(wait_cond(checks.clone(), options).await, Err(CancelReason::Signal));
        let options = WaitOptions::default().with_signal(token).nothrow();
        assert_eq!(wait_cond(checks, options).await, Ok(()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_during_wait() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(ms(35)).await;
            trigger.cancel();
        });

        let options = WaitOptions::default().with_interval(ms(10)).with_signal(token);
        assert_eq!(wait_cond(always(false), options).await, Err(CancelReason::Signal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_checks_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
        let checks: Checks = Group::one(Producer::from_async(move || {
            let (active, peak) = (Arc::clone(&a), Arc::clone(&p));
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                time::sleep(ms(25)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(false)
            }
        }));

        let options = WaitOptions::default().with_interval(ms(10)).with_timeout(ms(200));
        assert_eq!(wait_cond(checks, options).await, Err(CancelReason::Timeout));
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_first_check_respects_timeout() {
        let finished = Arc::new(AtomicUsize::new(0));
        let done = Arc::clone(&finished);
        let checks: Checks = Group::one(Producer::from_async(move || {
            let done = Arc::clone(&done);
            async move {
                time::sleep(Duration::from_secs(10)).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            }
        }));

        let start = Instant::now();
        let options = WaitOptions::default().with_interval(ms(10)).with_timeout(ms(50));
        assert_eq!(wait_cond(checks, options).await, Err(CancelReason::Timeout));
        assert_eq!(start.elapsed(), ms(50));

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_interrupts_hanging_first_check() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(ms(20)).await;
            trigger.cancel();
        });
        let checks: Checks =
            Group::one(Producer::from_async(|| std::future::pending::<Result<bool, &str>>()));

        let start = Instant::now();
        let options = WaitOptions::default().with_interval(ms(10)).with_signal(token);
        assert_eq!(wait_cond(checks, options).await, Err(CancelReason::Signal));
        assert_eq!(start.elapsed(), ms(20));
    }
}
