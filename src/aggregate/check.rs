//! # Check a set of boolean conditions once.
//!
//! [`check_all`] is [`resolve_all`](crate::resolve_all) specialized to boolean
//! producers: overall success requires every check to settle **and** yield `true`.
//!
//! ## Verdicts
//! ```text
//! settled = false:
//!   any rejected      → Err(Rejected(first reason in key order))
//!   any false         → Err(Unsatisfied { key of first false })
//!   otherwise         → Ok(true)
//!
//! settled = true:
//!   any rejected/false → Err(Settled(outcomes))   // false stays Fulfilled(false)
//!   otherwise          → Ok(true)
//!
//! nothrow:             any Err above → Ok(false)
//! ```

use tracing::trace;

use crate::{
    aggregate::{Settlement, resolve::settle_all},
    config::CheckOptions,
    error::CheckError,
    producers::{ProducerSet, Reshape},
};

/// Runs every check in `checks` once and reports whether all hold.
///
/// # Example
/// ```rust
/// use pollvisor::{check_all, CheckError, CheckOptions, Group, Producer};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let checks = Group::map([
///     ("a", Producer::<bool, String>::ready(true)),
///     ("b", Producer::ready(false)),
/// ]);
///
/// let err = check_all(&checks, CheckOptions::default()).await.unwrap_err();
/// assert!(matches!(err, CheckError::Unsatisfied { ref key } if key == "b"));
///
/// let ok = check_all(&checks, CheckOptions::default().nothrow()).await.unwrap();
/// assert!(!ok);
/// # }
/// ```
pub async fn check_all<E>(
    checks: &ProducerSet<bool, E>,
    options: CheckOptions,
) -> Result<bool, CheckError<E>>
where
    E: Send + 'static,
{
    let (outcomes, reshape) = settle_all(checks).await;

    let res = if options.settled {
        settled_verdict(outcomes, &reshape)
    } else {
        fail_fast_verdict(outcomes, &reshape)
    };

    match res {
        Ok(()) => Ok(true),
        Err(e) if options.nothrow => {
            trace!(label = e.as_label(), "check_all failed; nothrow");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn fail_fast_verdict<E>(
    outcomes: Vec<Settlement<bool, E>>,
    reshape: &Reshape,
) -> Result<(), CheckError<E>> {
    let values = outcomes
        .into_iter()
        .map(Settlement::into_result)
        .collect::<Result<Vec<bool>, E>>()
        .map_err(CheckError::Rejected)?;

    match values.iter().position(|holds| !holds) {
        Some(index) => Err(CheckError::Unsatisfied {
            key: reshape.key(index).unwrap_or_default().to_string(),
        }),
        None => Ok(()),
    }
}

fn settled_verdict<E>(
    outcomes: Vec<Settlement<bool, E>>,
    reshape: &Reshape,
) -> Result<(), CheckError<E>> {
    if outcomes.iter().all(|s| matches!(s, Settlement::Fulfilled(true))) {
        Ok(())
    } else {
        Err(CheckError::Settled(reshape.restore(outcomes)))
    }
}
