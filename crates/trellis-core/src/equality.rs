#![forbid(unsafe_code)]

//! Deep structural equality with value semantics.
//!
//! [`ValueEq`] is the equality contract used as the default comparer across
//! the workspace: sequence operators (`distinct`, `includes`, set algebra)
//! and observable change detection all consult it unless the caller
//! substitutes a comparer of their own.
//!
//! The rules, by concrete container kind:
//!
//! - Primitives compare by value. Floats use canonical-NaN semantics:
//!   `NaN == NaN` holds, while `+0.0` and `-0.0` are distinct.
//! - Sequences (`Vec`, slices, arrays, tuples) compare recursively,
//!   element-wise, in order.
//! - Mappings compare by size plus per-key recursive value equality; sets
//!   compare by size plus membership.
//! - Anything else participates by implementing the trait. Rust has no
//!   universal identity fallback, so opting in is explicit.
//!
//! The ordered/unordered slice helpers are free functions rather than trait
//! statics; each comes in a default-contract form and a `_by` form taking a
//! caller-supplied comparer.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;

/// Deep structural equality.
///
/// Unlike `PartialEq`, this is total on floats (`NaN` equals `NaN`) and
/// distinguishes `+0.0` from `-0.0`.
pub trait ValueEq {
    fn value_eq(&self, other: &Self) -> bool;
}

/// Compares two slices for equality with strict order.
pub fn ordered_eq<T: ValueEq>(a: &[T], b: &[T]) -> bool {
    ordered_eq_by(a, b, T::value_eq)
}

/// Compares two slices for equality with strict order, using `eq` to compare
/// elements.
pub fn ordered_eq_by<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

/// Compares two slices as multisets: equal when every element of `a` matches
/// exactly one not-yet-consumed element of `b` and the lengths agree.
pub fn unordered_eq<T: ValueEq>(a: &[T], b: &[T]) -> bool {
    unordered_eq_by(a, b, T::value_eq)
}

/// Multiset comparison with a caller-supplied element comparer.
///
/// Each element of `b` can satisfy at most one element of `a` (consumed
/// exactly once), so duplicates must occur the same number of times on both
/// sides. Quadratic by design: the comparer is substitutable, so no hashing
/// is assumed.
pub fn unordered_eq_by<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut consumed = vec![false; b.len()];
    for element in a {
        let matched = b
            .iter()
            .enumerate()
            .find(|(index, candidate)| !consumed[*index] && eq(element, candidate));
        match matched {
            Some((index, _)) => consumed[index] = true,
            None => return false,
        }
    }
    true
}

macro_rules! value_eq_via_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ValueEq for $ty {
                fn value_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_eq_via_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    str,
);

impl ValueEq for f64 {
    fn value_eq(&self, other: &Self) -> bool {
        // Canonical NaN: any NaN equals any NaN. Bit comparison otherwise,
        // which keeps +0.0 and -0.0 distinct.
        (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
    }
}

impl ValueEq for f32 {
    fn value_eq(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
    }
}

impl<T: ValueEq + ?Sized> ValueEq for &T {
    fn value_eq(&self, other: &Self) -> bool {
        T::value_eq(self, other)
    }
}

impl<T: ValueEq + ?Sized> ValueEq for Box<T> {
    fn value_eq(&self, other: &Self) -> bool {
        T::value_eq(self, other)
    }
}

impl<T: ValueEq + ?Sized> ValueEq for Rc<T> {
    fn value_eq(&self, other: &Self) -> bool {
        T::value_eq(self, other)
    }
}

impl<T: ValueEq> ValueEq for Option<T> {
    fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.value_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ValueEq> ValueEq for [T] {
    fn value_eq(&self, other: &Self) -> bool {
        ordered_eq(self, other)
    }
}

impl<T: ValueEq> ValueEq for Vec<T> {
    fn value_eq(&self, other: &Self) -> bool {
        ordered_eq(self, other)
    }
}

impl<T: ValueEq, const N: usize> ValueEq for [T; N] {
    fn value_eq(&self, other: &Self) -> bool {
        ordered_eq(self, other)
    }
}

impl<A: ValueEq, B: ValueEq> ValueEq for (A, B) {
    fn value_eq(&self, other: &Self) -> bool {
        self.0.value_eq(&other.0) && self.1.value_eq(&other.1)
    }
}

impl<A: ValueEq, B: ValueEq, C: ValueEq> ValueEq for (A, B, C) {
    fn value_eq(&self, other: &Self) -> bool {
        self.0.value_eq(&other.0) && self.1.value_eq(&other.1) && self.2.value_eq(&other.2)
    }
}

impl<K: Eq + Hash, V: ValueEq, S: BuildHasher> ValueEq for HashMap<K, V, S> {
    fn value_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| value.value_eq(v)))
    }
}

impl<K: Ord, V: ValueEq> ValueEq for BTreeMap<K, V> {
    fn value_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| value.value_eq(v)))
    }
}

impl<T: Eq + Hash, S: BuildHasher> ValueEq for HashSet<T, S> {
    fn value_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Ord> ValueEq for BTreeSet<T> {
    fn value_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}
