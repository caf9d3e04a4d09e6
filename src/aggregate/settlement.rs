//! Per-producer outcome recorded by settled-mode aggregation.

/// Outcome of one producer in one aggregation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The producer yielded a value.
    Fulfilled(T),
    /// The producer failed; the reason is kept as-is.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Returns `"fulfilled"` or `"rejected"`.
    pub fn status(&self) -> &'static str {
        match self {
            Settlement::Fulfilled(_) => "fulfilled",
            Settlement::Rejected(_) => "rejected",
        }
    }

    /// Returns `true` if the producer yielded a value.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settlement::Fulfilled(_))
    }

    /// Returns `true` if the producer failed.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Settlement::Rejected(_))
    }

    /// The fulfilled value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Settlement::Fulfilled(v) => Some(v),
            Settlement::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&E> {
        match self {
            Settlement::Fulfilled(_) => None,
            Settlement::Rejected(e) => Some(e),
        }
    }

    /// Converts back into the producer's `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settlement::Fulfilled(v) => Ok(v),
            Settlement::Rejected(e) => Err(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => Settlement::Fulfilled(v),
            Err(e) => Settlement::Rejected(e),
        }
    }
}
