//! # Normalization of producer sets.
//!
//! [`normalize`] flattens any [`Group`] into keyed entries and remembers the shape
//! in a [`Reshape`], which rebuilds the original shape from per-entry results.
//!
//! ```text
//! Group::One(p)              → [("result", p)]
//! Group::List([p0, p1])      → [("0", p0), ("1", p1)]
//! Group::Map([("a", pa)])    → [("a", pa)]
//!
//! reshape.restore([r0, r1])  → Group::List([r0, r1])
//! ```
//!
//! ## Rules
//! - Entry order equals input order, so index → key round-trips exactly.
//! - `restore` expects values aligned with the normalized entries.

use crate::config::SINGLE_KEY;
use crate::producers::Group;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    One,
    List,
    Map,
}

/// Inverse of [`normalize`]: rebuilds a [`Group`] of the original shape.
#[derive(Clone, Debug)]
pub struct Reshape {
    shape: Shape,
    keys: Vec<String>,
}

impl Reshape {
    /// Normalized keys, in entry order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Key of the entry at `index`.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// Rebuilds the original shape from values aligned with [`Reshape::keys`].
    pub fn restore<U>(&self, values: Vec<U>) -> Group<U> {
        debug_assert_eq!(values.len(), self.keys.len());
        match self.shape {
            // normalize always emits exactly one entry for `One`
            Shape::One => match <[U; 1]>::try_from(values) {
                Ok([value]) => Group::One(value),
                Err(values) => Group::List(values),
            },
            Shape::List => Group::List(values),
            Shape::Map => Group::Map(self.keys.iter().cloned().zip(values).collect()),
        }
    }
}

/// Flattens `group` into keyed entries plus the [`Reshape`] that undoes it.
pub fn normalize<T>(group: Group<T>) -> (Vec<(String, T)>, Reshape) {
    let (shape, entries): (Shape, Vec<(String, T)>) = match group {
        Group::One(item) => (Shape::One, vec![(SINGLE_KEY.to_string(), item)]),
        Group::List(items) => (
            Shape::List,
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
        ),
        Group::Map(entries) => (Shape::Map, entries),
    };
    let keys = entries.iter().map(|(k, _)| k.clone()).collect();
    (entries, Reshape { shape, keys })
}
