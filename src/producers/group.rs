//! # Shapes of producer sets and their results.
//!
//! [`Group`] is one of three shapes:
//! - [`Group::One`]: a single item;
//! - [`Group::List`]: an ordered sequence;
//! - [`Group::Map`]: named items, kept in insertion order.
//!
//! The same type describes the input (`Group<Producer<T, E>>`) and the output
//! (`Group<T>`, `Group<Settlement<T, E>>`) of an aggregation, so the output shape
//! always equals the input shape.

use crate::config::SINGLE_KEY;
use crate::producers::Producer;

/// A single item, an ordered list, or an insertion-ordered keyed map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Group<T> {
    /// Exactly one item.
    One(T),
    /// Ordered items; order is preserved end to end.
    List(Vec<T>),
    /// Items by name, in insertion order; keys are unique.
    Map(Vec<(String, T)>),
}

/// A set of producers in any shape.
pub type ProducerSet<T, E> = Group<Producer<T, E>>;

impl<T> Group<T> {
    /// Creates a single-item group.
    pub fn one(item: T) -> Self {
        Group::One(item)
    }

    /// Creates an ordered group.
    pub fn list(items: impl IntoIterator<Item = T>) -> Self {
        Group::List(items.into_iter().collect())
    }

    /// Creates a keyed group.
    ///
    /// A repeated key replaces the earlier item but keeps its position.
    pub fn map<K: Into<String>>(items: impl IntoIterator<Item = (K, T)>) -> Self {
        let mut entries: Vec<(String, T)> = Vec::new();
        for (key, item) in items {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = item,
                None => entries.push((key, item)),
            }
        }
        Group::Map(entries)
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        match self {
            Group::One(_) => 1,
            Group::List(items) => items.len(),
            Group::Map(entries) => entries.len(),
        }
    }

    /// Returns `true` if the group holds no items (never for [`Group::One`]).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks an item up by its normalized key.
    ///
    /// `"result"` addresses [`Group::One`], `"0"`, `"1"`, ... address
    /// [`Group::List`], map keys address [`Group::Map`].
    pub fn get(&self, key: &str) -> Option<&T> {
        match self {
            Group::One(item) => (key == SINGLE_KEY).then_some(item),
            Group::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Group::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
        }
    }

    /// Iterates items in order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        let items: Box<dyn Iterator<Item = &T> + '_> = match self {
            Group::One(item) => Box::new(std::iter::once(item)),
            Group::List(items) => Box::new(items.iter()),
            Group::Map(entries) => Box::new(entries.iter().map(|(_, v)| v)),
        };
        items
    }

    /// Borrows every item, keeping the shape.
    pub fn each_ref(&self) -> Group<&T> {
        match self {
            Group::One(item) => Group::One(item),
            Group::List(items) => Group::List(items.iter().collect()),
            Group::Map(entries) => Group::Map(entries.iter().map(|(k, v)| (k.clone(), v)).collect()),
        }
    }

    /// Maps every item, keeping the shape.
    pub fn map_values<U>(self, mut f: impl FnMut(T) -> U) -> Group<U> {
        match self {
            Group::One(item) => Group::One(f(item)),
            Group::List(items) => Group::List(items.into_iter().map(f).collect()),
            Group::Map(entries) => Group::Map(entries.into_iter().map(|(k, v)| (k, f(v))).collect()),
        }
    }

    /// Returns the item of a [`Group::One`].
    pub fn into_one(self) -> Option<T> {
        match self {
            Group::One(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the items of a [`Group::List`].
    pub fn into_list(self) -> Option<Vec<T>> {
        match self {
            Group::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a [`Group::Map`].
    pub fn into_map(self) -> Option<Vec<(String, T)>> {
        match self {
            Group::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl<T> Group<Option<T>> {
    /// Returns `Some` only if every item is present.
    pub fn transpose(self) -> Option<Group<T>> {
        Some(match self {
            Group::One(item) => Group::One(item?),
            Group::List(items) => Group::List(items.into_iter().collect::<Option<_>>()?),
            Group::Map(entries) => Group::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| v.map(|v| (k, v)))
                    .collect::<Option<_>>()?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_insertion_order_and_replaces_duplicates() {
        let g = Group::map([("b", 1), ("a", 2), ("b", 3)]);
        assert_eq!(
            g.into_map(),
            Some(vec![("b".to_string(), 3), ("a".to_string(), 2)])
        );
    }

    #[test]
    fn test_get_by_normalized_key() {
        assert_eq!(Group::one(7).get("result"), Some(&7));
        assert_eq!(Group::one(7).get("0"), None);
        assert_eq!(Group::list([4, 5]).get("1"), Some(&5));
        assert_eq!(Group::map([("x", 9)]).get("x"), Some(&9));
    }

    #[test]
    fn test_transpose_requires_every_item() {
        assert_eq!(
            Group::list([Some(0), Some(1)]).transpose(),
            Some(Group::list([0, 1]))
        );
        assert_eq!(Group::map([("a", Some(1)), ("b", None)]).transpose(), None);
        assert_eq!(Group::<Option<u8>>::one(None).transpose(), None);
    }

    #[test]
    fn test_empty_list_is_empty() {
        let g: Group<u8> = Group::list([]);
        assert!(g.is_empty());
        assert!(!Group::one(()).is_empty());
    }
}
