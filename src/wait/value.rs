//! # Wait for values to appear (`wait_value`).
//!
//! Polls a [`ProducerSet`] of optional values through
//! [`resolve_all`](crate::resolve_all) until every entry is `Some`.

use crate::{
    aggregate::resolve_all,
    config::{ResolveOptions, WaitOptions},
    error::CancelReason,
    producers::{Group, ProducerSet},
    wait::poll::poll_until,
};

/// Waits until every producer in `producers` yields `Some`, and returns the values.
///
/// A round succeeds only if every producer fulfills with `Some(_)`; a `None`
/// or a failure anywhere means "not yet" and the round is retried after
/// `options.interval`. Falsy values such as `0`, `false` or `""` are ready.
///
/// Returns the values in the input's shape. On cancellation returns
/// `Err(reason)`, or `Ok(None)` if `options.nothrow` is set.
///
/// # Example
/// ```rust
/// use pollvisor::{wait_value, Group, Producer, WaitOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let zero = Group::one(Producer::<Option<u32>, ()>::ready(Some(0)));
/// let out = wait_value(zero, WaitOptions::default()).await.unwrap();
/// assert_eq!(out, Some(Group::One(0)));
/// # }
/// ```
pub async fn wait_value<T, E>(
    producers: ProducerSet<Option<T>, E>,
    options: WaitOptions,
) -> Result<Option<Group<T>>, CancelReason>
where
    T: Send + 'static,
    E: Send + 'static,
{
    poll_until(producers, options, |producers| async move {
        resolve_all(&producers, ResolveOptions::default().nothrow())
            .await
            .ok()
            .flatten()
            .and_then(Group::transpose)
    })
    .await
}
