#![forbid(unsafe_code)]

//! A keyed group of elements, produced by [`Sequence::group_by`].
//!
//! [`Sequence::group_by`]: crate::sequence::Sequence::group_by

use trellis_core::ValueEq;

use crate::sequence::Sequence;

/// Elements of a sequence sharing one grouping key.
///
/// `count` always equals `values.len()`; the invariant holds by
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K, V> {
    key: K,
    values: Sequence<V>,
    count: usize,
}

impl<K, V> Group<K, V> {
    /// Builds a group; the element count is derived from `values`.
    #[must_use]
    pub fn new(key: K, values: Sequence<V>) -> Self {
        let count = values.len();
        Self { key, values, count }
    }

    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[must_use]
    pub fn values(&self) -> &Sequence<V> {
        &self.values
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<K: ValueEq, V: ValueEq> ValueEq for Group<K, V> {
    fn value_eq(&self, other: &Self) -> bool {
        self.key.value_eq(&other.key) && self.values.value_eq(&other.values)
    }
}
