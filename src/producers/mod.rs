//! # Producers and their shapes.
//!
//! This module provides the input side of every aggregation:
//! - [`Producer`] - one async source of a value (sync closure, async closure, or pending future)
//! - [`Group`] - single / ordered / keyed shape shared by inputs and outputs
//! - [`normalize`] / [`Reshape`] - flatten a group to keyed entries and back

mod group;
mod normalize;
mod producer;

pub use group::{Group, ProducerSet};
pub use normalize::{Reshape, normalize};
pub use producer::{Check, Producer};
