//! Polling waiters built on [`set_polling`](crate::set_polling).
//!
//! - [`wait_cond`]: until every check yields `true`;
//! - [`wait_value`]: until every producer yields `Some`.
//!
//! Failures of individual rounds are retried silently; only cancellation
//! (`timeout` / `signal`) is ever reported.

mod cond;
mod poll;
mod state;
mod value;

pub use cond::wait_cond;
pub use value::wait_value;
