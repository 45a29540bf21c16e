#![forbid(unsafe_code)]

//! A key/value pair with structural equality.

use crate::equality::ValueEq;

/// A key/value pair. Components compare under the [`ValueEq`] contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Pair<K, V> {
    #[must_use]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: ValueEq, V: ValueEq> ValueEq for Pair<K, V> {
    fn value_eq(&self, other: &Self) -> bool {
        self.key.value_eq(&other.key) && self.value.value_eq(&other.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_pairs() {
        assert!(Pair::new("key", "value").value_eq(&Pair::new("key", "value")));
        assert!(Pair::new(123, true).value_eq(&Pair::new(123, true)));
        assert!(
            Pair::new("key", vec![1, 2, 3]).value_eq(&Pair::new("key", vec![1, 2, 3]))
        );
    }

    #[test]
    fn unequal_pairs() {
        assert!(!Pair::new("key", "abc").value_eq(&Pair::new("key", "cba")));
        assert!(!Pair::new(123, true).value_eq(&Pair::new(321, true)));
        assert!(!Pair::new("key", vec![1, 2, 3]).value_eq(&Pair::new("key", vec![3, 2, 1])));
    }

    #[test]
    fn from_tuple() {
        let pair: Pair<&str, i32> = ("a", 1).into();
        assert_eq!(pair.key, "a");
        assert_eq!(pair.value, 1);
    }
}
