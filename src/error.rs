//! Error types produced by aggregation, checks and scheduling.
//!
//! This module defines three error enums:
//!
//! - [`ResolveError`]: failure of one [`resolve_all`](crate::resolve_all) attempt.
//! - [`CheckError`]: failure of one [`check_all`](crate::check_all) attempt.
//! - [`CancelReason`]: why a scheduler or waiter stopped before it finished.
//!
//! Producer reasons are carried verbatim: a rejected producer's `E` is moved into
//! the error unchanged, never wrapped or stringified.
//!
//! All types provide `as_label` for logs/metrics.

use thiserror::Error;

use crate::aggregate::Settlement;
use crate::producers::Group;

/// # Errors produced by [`resolve_all`](crate::resolve_all).
///
/// The variant depends on the `settled` option:
/// - fail-fast mode reports the first rejection (in key order) as [`ResolveError::Rejected`];
/// - settled mode reports every outcome as [`ResolveError::Settled`], in the input's shape.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ResolveError<T, E> {
    /// A producer rejected; carries its reason unchanged.
    #[error("producer rejected: {0}")]
    Rejected(E),

    /// At least one producer rejected; carries the outcome of every producer.
    #[error("{} of {} producers rejected", rejected_count(.0), .0.len())]
    Settled(Group<Settlement<T, E>>),
}

impl<T, E> ResolveError<T, E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::ResolveError;
    ///
    /// let err: ResolveError<u32, &str> = ResolveError::Rejected("boom");
    /// assert_eq!(err.as_label(), "resolve_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolveError::Rejected(_) => "resolve_rejected",
            ResolveError::Settled(_) => "resolve_settled",
        }
    }

    /// Returns the fail-fast reason, if this is a [`ResolveError::Rejected`].
    pub fn into_reason(self) -> Option<E> {
        match self {
            ResolveError::Rejected(e) => Some(e),
            ResolveError::Settled(_) => None,
        }
    }

    /// Returns the per-producer outcomes, if this is a [`ResolveError::Settled`].
    pub fn into_settlements(self) -> Option<Group<Settlement<T, E>>> {
        match self {
            ResolveError::Rejected(_) => None,
            ResolveError::Settled(outcomes) => Some(outcomes),
        }
    }
}

/// # Errors produced by [`check_all`](crate::check_all).
///
/// A check that yields `false` is not a rejection: in fail-fast mode it becomes
/// [`CheckError::Unsatisfied`], in settled mode it stays a fulfilled
/// outcome inside [`CheckError::Settled`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CheckError<E> {
    /// A check rejected; carries its reason unchanged.
    #[error("check rejected: {0}")]
    Rejected(E),

    /// Every check settled, but the check at `key` yielded `false`.
    #[error("condition {key:?} evaluated to false")]
    Unsatisfied {
        /// Normalized key of the first false check (`"result"`, an index, or a map key).
        key: String,
    },

    /// At least one check rejected or yielded `false`; carries every outcome.
    #[error("{} of {} checks failed", unsatisfied_count(.0), .0.len())]
    Settled(Group<Settlement<bool, E>>),
}

impl<E> CheckError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::CheckError;
    ///
    /// let err: CheckError<&str> = CheckError::Unsatisfied { key: "db".into() };
    /// assert_eq!(err.as_label(), "check_unsatisfied");
    /// assert!(err.to_string().contains("\"db\""));
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CheckError::Rejected(_) => "check_rejected",
            CheckError::Unsatisfied { .. } => "check_unsatisfied",
            CheckError::Settled(_) => "check_settled",
        }
    }
}

/// # Why a scheduler or waiter was cancelled.
///
/// Displays as the bare cause (`timeout`, `signal`, `manual`), so waiters can
/// report it as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// The configured timeout elapsed first.
    #[error("timeout")]
    Timeout,
    /// The external [`CancellationToken`](tokio_util::sync::CancellationToken) fired.
    #[error("signal")]
    Signal,
    /// The handle was aborted explicitly.
    #[error("manual")]
    Manual,
}

impl CancelReason {
    /// Returns a short stable label for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::CancelReason;
    ///
    /// assert_eq!(CancelReason::Timeout.as_label(), "timeout");
    /// assert_eq!(CancelReason::Signal.to_string(), "signal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CancelReason::Timeout => "timeout",
            CancelReason::Signal => "signal",
            CancelReason::Manual => "manual",
        }
    }
}

fn rejected_count<T, E>(outcomes: &Group<Settlement<T, E>>) -> usize {
    outcomes.values().filter(|s| s.is_rejected()).count()
}

fn unsatisfied_count<E>(outcomes: &Group<Settlement<bool, E>>) -> usize {
    outcomes
        .values()
        .filter(|s| !matches!(s, Settlement::Fulfilled(true)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_message_counts_rejections() {
        let err: ResolveError<u32, &str> = ResolveError::Settled(Group::list([
            Settlement::Fulfilled(1),
            Settlement::Rejected("a"),
            Settlement::Rejected("b"),
        ]));
        assert_eq!(err.to_string(), "2 of 3 producers rejected");
        assert_eq!(err.as_label(), "resolve_settled");
    }

    #[test]
    fn test_unsatisfied_counts_false_as_failure() {
        let err: CheckError<&str> = CheckError::Settled(Group::map([
            ("a", Settlement::Fulfilled(true)),
            ("b", Settlement::Fulfilled(false)),
            ("c", Settlement::Rejected("down")),
        ]));
        assert_eq!(err.to_string(), "2 of 3 checks failed");
    }

    #[test]
    fn test_rejected_reason_is_not_wrapped() {
        let err: ResolveError<u32, &str> = ResolveError::Rejected("boom");
        assert_eq!(err.into_reason(), Some("boom"));
    }
}
