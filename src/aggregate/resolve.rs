//! # Resolve a set of producers once.
//!
//! Runs **one attempt** of every producer in a [`ProducerSet`] and aggregates the
//! outcomes under a [`ResolveOptions`] policy.
//!
//! ## Flow
//! ```text
//! normalize(set) ──► produce() every entry (key order)
//!                         │
//!                         ▼
//!                  join_all (every entry settles)
//!                         │
//!        ┌────────────────┼─────────────────────┐
//!        ▼                ▼                     ▼
//!   all fulfilled    settled = false       settled = true
//!   Ok(restore)      Err(first rejection)  Err(restore(outcomes))
//!                         │                     │
//!                         └── nothrow ──► Ok(None)
//! ```
//!
//! ## Rules
//! - Always waits for **every** producer, even in fail-fast mode
//! - Fail-fast reports the first rejection **in key order**, not in completion order
//! - Reasons are moved out unchanged
//! - No retries: retrying is the waiters' job

use futures::future::join_all;
use tracing::trace;

use crate::{
    aggregate::Settlement,
    config::ResolveOptions,
    error::ResolveError,
    producers::{Group, ProducerSet, Reshape, normalize},
};

/// Resolves every producer in `producers` once.
///
/// Returns the values in the input's shape. `Ok(None)` is the absence marker
/// and is only returned when `options.nothrow` is set.
///
/// # Example
/// ```rust
/// use pollvisor::{resolve_all, Group, Producer, ResolveOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let set = Group::map([
///     ("port", Producer::<u16, String>::ready(8080)),
///     ("workers", Producer::from_async(|| async { Ok(4) })),
/// ]);
/// let values = resolve_all(&set, ResolveOptions::default()).await.unwrap();
/// assert_eq!(values, Some(Group::map([("port", 8080), ("workers", 4)])));
/// # }
/// ```
pub async fn resolve_all<T, E>(
    producers: &ProducerSet<T, E>,
    options: ResolveOptions,
) -> Result<Option<Group<T>>, ResolveError<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (outcomes, reshape) = settle_all(producers).await;

    let res = if options.settled {
        collect_settled(outcomes, &reshape)
    } else {
        fail_fast(outcomes, &reshape)
    };

    match res {
        Ok(values) => Ok(Some(values)),
        Err(e) if options.nothrow => {
            trace!(label = e.as_label(), "resolve_all failed; nothrow");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Runs one attempt of every producer and waits until all have settled.
///
/// Outcomes are aligned with the normalized key order of `producers`.
pub(crate) async fn settle_all<T, E>(
    producers: &ProducerSet<T, E>,
) -> (Vec<Settlement<T, E>>, Reshape)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (entries, reshape) = normalize(producers.each_ref());
    let attempts: Vec<_> = entries.into_iter().map(|(_, p)| p.produce()).collect();

    let outcomes = join_all(attempts)
        .await
        .into_iter()
        .map(Settlement::from)
        .collect::<Vec<_>>();

    trace!(
        producers = outcomes.len(),
        rejected = outcomes.iter().filter(|s| s.is_rejected()).count(),
        "producers settled"
    );
    (outcomes, reshape)
}

fn fail_fast<T, E>(
    outcomes: Vec<Settlement<T, E>>,
    reshape: &Reshape,
) -> Result<Group<T>, ResolveError<T, E>> {
    let values = outcomes
        .into_iter()
        .map(Settlement::into_result)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ResolveError::Rejected)?;
    Ok(reshape.restore(values))
}

fn collect_settled<T, E>(
    outcomes: Vec<Settlement<T, E>>,
    reshape: &Reshape,
) -> Result<Group<T>, ResolveError<T, E>> {
    if outcomes.iter().any(Settlement::is_rejected) {
        return Err(ResolveError::Settled(reshape.restore(outcomes)));
    }
    let values = outcomes.into_iter().filter_map(|s| s.into_result().ok()).collect();
    Ok(reshape.restore(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producers::Producer;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn delayed(ms: u64, res: Result<u32, &'static str>) -> Producer<u32, &'static str> {
        Producer::from_async(move || async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            res
        })
    }

    #[tokio::test]
    async fn test_single_shape_is_preserved() {
        let set = Group::one(Producer::<u32, &str>::ready(5));
        let out = resolve_all(&set, ResolveOptions::default()).await.unwrap();
        assert_eq!(out, Some(Group::One(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_order_follows_input_not_completion() {
        let set = Group::list([delayed(30, Ok(1)), delayed(10, Ok(2)), delayed(20, Ok(3))]);
        let out = resolve_all(&set, ResolveOptions::default()).await.unwrap();
        assert_eq!(out, Some(Group::list([1, 2, 3])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_fast_reports_first_rejection_in_key_order() {
        // "b" settles last but comes first in key order
        let set = Group::map([
            ("a", delayed(5, Ok(1))),
            ("b", delayed(50, Err("b failed"))),
            ("c", delayed(1, Err("c failed"))),
        ]);
        let err = resolve_all(&set, ResolveOptions::default()).await.unwrap_err();
        assert_eq!(err.into_reason(), Some("b failed"));
    }

    #[tokio::test]
    async fn test_sync_error_becomes_rejection() {
        let set = Group::list([
            Producer::<u32, &str>::from_fn(|| Err("thrown")),
            Producer::ready(1),
        ]);
        let err = resolve_all(&set, ResolveOptions::default()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Rejected("thrown")));
    }

    #[tokio::test]
    async fn test_settled_reports_every_outcome_in_shape() {
        let set = Group::map([
            ("ok", Producer::<u32, &str>::ready(1)),
            ("bad", Producer::failed("nope")),
        ]);
        let err = resolve_all(&set, ResolveOptions::default().settled())
            .await
            .unwrap_err();
        let outcomes = err.into_settlements().unwrap();
        assert_eq!(outcomes.get("ok"), Some(&Settlement::Fulfilled(1)));
        assert_eq!(outcomes.get("bad"), Some(&Settlement::Rejected("nope")));
        assert_eq!(outcomes.get("bad").map(Settlement::status), Some("rejected"));
    }

    #[tokio::test]
    async fn test_settled_success_returns_values() {
        let set = Group::list([Producer::<u32, &str>::ready(1), Producer::ready(2)]);
        let out = resolve_all(&set, ResolveOptions::default().settled()).await.unwrap();
        assert_eq!(out, Some(Group::list([1, 2])));
    }

    #[tokio::test]
    async fn test_nothrow_never_fails() {
        let set = Group::list([Producer::<u32, &str>::failed("x"), Producer::ready(2)]);
        for options in [
            ResolveOptions::default().nothrow(),
            ResolveOptions::default().nothrow().settled(),
        ] {
            assert_eq!(resolve_all(&set, options).await.unwrap(), None);
        }

        let ok = Group::one(Producer::<u32, &str>::ready(3));
        let out = resolve_all(&ok, ResolveOptions::default().nothrow()).await.unwrap();
        assert_eq!(out, Some(Group::One(3)));
    }

    #[tokio::test]
    async fn test_invocation_follows_key_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let make = |name: &'static str| {
            let order = Arc::clone(&order);
            Producer::<(), &str>::from_fn(move || {
                order.lock().unwrap().push(name);
                Ok(())
            })
        };
        let set = Group::map([("z", make("z")), ("a", make("a")), ("m", make("m"))]);
        resolve_all(&set, ResolveOptions::default()).await.unwrap();
        assert_eq!(*order.lock().unwrap(), ["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_pending_rejection_is_preserved() {
        let set = Group::one(Producer::<u32, String>::pending(async {
            Err("already failed".to_string())
        }));
        let err = resolve_all(&set, ResolveOptions::default()).await.unwrap_err();
        assert_eq!(err.into_reason().as_deref(), Some("already failed"));
    }
}
