//! One-shot aggregation of producer sets.
//!
//! - [`resolve_all`]: every producer once, values in the input's shape;
//! - [`check_all`]: boolean producers once, success only if all are `true`;
//! - [`Settlement`]: per-producer outcome reported in settled mode.
//!
//! Both operations wait for every producer before deciding; see
//! [`ResolveOptions`](crate::ResolveOptions) for the failure policy.

mod check;
mod resolve;
mod settlement;

pub use check::check_all;
pub use resolve::resolve_all;
pub use settlement::Settlement;
