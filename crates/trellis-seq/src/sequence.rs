#![forbid(unsafe_code)]

//! The [`Sequence`] type and its query operators.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use trellis_core::{Error, Result, ValueEq, ordered_eq, unordered_eq, unordered_eq_by};

use crate::group::Group;

/// An immutable ordered collection with eager, per-step materialization.
///
/// Constructed through the factories ([`new`](Sequence::new),
/// [`empty`](Sequence::empty), [`range`](Sequence::range),
/// [`count_from`](Sequence::count_from), [`repeat`](Sequence::repeat), the
/// [`seq!`](crate::seq) macro) or the `From`/`FromIterator` impls — all of
/// which copy their source, so later mutation of the source cannot be
/// observed through the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence<T> {
    items: Vec<T>,
}

/// Builds a sequence from listed elements, like `vec!` for vectors.
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Sequence::empty()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Sequence::new([$($item),+])
    };
}

impl<T> Sequence<T> {
    /// Materializes `source` into a new sequence.
    pub fn new(source: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: source.into_iter().collect(),
        }
    }

    /// The sequence with no elements.
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// A sequence of `count` copies of `item`.
    #[must_use]
    pub fn repeat(count: usize, item: T) -> Self
    where
        T: Clone,
    {
        Self {
            items: vec![item; count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The elements as a fresh vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    pub fn for_each(&self, mut action: impl FnMut(&T)) {
        for element in &self.items {
            action(element);
        }
    }

    /// Number of elements matching `predicate`.
    pub fn count_matching(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.items.iter().filter(|e| predicate(e)).count()
    }

    pub fn all(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.items.iter().all(|e| predicate(e))
    }

    pub fn any(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.items.iter().any(|e| predicate(e))
    }

    pub fn none(&self, predicate: impl Fn(&T) -> bool) -> bool {
        !self.any(predicate)
    }

    /// The first element.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when the sequence is empty.
    pub fn first(&self) -> Result<&T> {
        self.items
            .first()
            .ok_or_else(|| Error::invalid_operation("sequence contains no elements"))
    }

    /// The first element matching `predicate`.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when no element matches.
    pub fn first_where(&self, predicate: impl Fn(&T) -> bool) -> Result<&T> {
        self.find(predicate)
            .ok_or_else(|| Error::invalid_operation("no element matches the predicate"))
    }

    #[must_use]
    pub fn first_or_none(&self) -> Option<&T> {
        self.items.first()
    }

    /// The first element matching `predicate`, or `None`.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|e| predicate(e))
    }

    /// The last element.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when the sequence is empty.
    pub fn last(&self) -> Result<&T> {
        self.items
            .last()
            .ok_or_else(|| Error::invalid_operation("sequence contains no elements"))
    }

    /// The last element matching `predicate`.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when no element matches.
    pub fn last_where(&self, predicate: impl Fn(&T) -> bool) -> Result<&T> {
        self.rfind(predicate)
            .ok_or_else(|| Error::invalid_operation("no element matches the predicate"))
    }

    #[must_use]
    pub fn last_or_none(&self) -> Option<&T> {
        self.items.last()
    }

    /// The last element matching `predicate`, or `None`.
    pub fn rfind(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().rev().find(|e| predicate(e))
    }

    /// The sole element of the sequence.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when the sequence is empty or holds more than one
    /// element.
    pub fn single(&self) -> Result<&T> {
        match self.items.len() {
            0 => Err(Error::invalid_operation("sequence contains no elements")),
            1 => Ok(&self.items[0]),
            _ => Err(Error::invalid_operation(
                "sequence contains more than one element",
            )),
        }
    }

    /// The sole element matching `predicate`.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when zero or more than one element matches.
    pub fn single_where(&self, predicate: impl Fn(&T) -> bool) -> Result<&T> {
        match self.single_or_none_where(predicate)? {
            Some(element) => Ok(element),
            None => Err(Error::invalid_operation("no element matches the predicate")),
        }
    }

    /// The sole element, or `None` when empty. Still fails on more than one
    /// element.
    pub fn single_or_none(&self) -> Result<Option<&T>> {
        self.single_or_none_where(|_| true)
    }

    /// The sole matching element, or `None` when nothing matches. Still
    /// fails on more than one match.
    pub fn single_or_none_where(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<&T>> {
        let mut matches = self.items.iter().filter(|e| predicate(e));
        let found = matches.next();
        if matches.next().is_some() {
            return Err(Error::invalid_operation(
                "sequence contains more than one element",
            ));
        }
        Ok(found)
    }

    /// Linear-scan membership under the structural equality contract.
    #[must_use]
    pub fn includes(&self, item: &T) -> bool
    where
        T: ValueEq,
    {
        self.includes_by(item, T::value_eq)
    }

    /// Linear-scan membership under a caller-supplied comparer.
    pub fn includes_by(&self, item: &T, eq: impl Fn(&T, &T) -> bool) -> bool {
        self.items.iter().any(|element| eq(element, item))
    }

    /// Applies `selector` to every element, in order.
    pub fn map<U>(&self, selector: impl Fn(&T) -> U) -> Sequence<U> {
        Sequence::new(self.items.iter().map(selector))
    }

    /// Applies `selector` to every element and flattens the results.
    pub fn flat_map<U, I>(&self, selector: impl Fn(&T) -> I) -> Sequence<U>
    where
        I: IntoIterator<Item = U>,
    {
        Sequence::new(self.items.iter().flat_map(selector))
    }

    /// Merges this sequence pairwise with `other`.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when the sequences have different lengths.
    pub fn zip<U, V>(
        &self,
        other: &Sequence<U>,
        merge: impl Fn(&T, &U) -> V,
    ) -> Result<Sequence<V>> {
        if self.len() != other.len() {
            return Err(Error::invalid_operation(
                "cannot zip sequences of different lengths",
            ));
        }
        Ok(Sequence::new(
            self.items
                .iter()
                .zip(&other.items)
                .map(|(a, b)| merge(a, b)),
        ))
    }

    /// Sum of `selector` over all elements; `0.0` for an empty sequence.
    pub fn sum_by(&self, selector: impl Fn(&T) -> f64) -> f64 {
        self.items.iter().map(selector).sum()
    }

    /// Arithmetic mean of `selector` over all elements.
    ///
    /// An empty sequence yields `NaN` (division by zero), not an error.
    pub fn average_by(&self, selector: impl Fn(&T) -> f64) -> f64 {
        self.sum_by(selector) / self.items.len() as f64
    }

    /// Smallest value of `selector`; `+inf` for an empty sequence.
    pub fn minimum_by(&self, selector: impl Fn(&T) -> f64) -> f64 {
        self.items
            .iter()
            .map(selector)
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest value of `selector`; `-inf` for an empty sequence.
    pub fn maximum_by(&self, selector: impl Fn(&T) -> f64) -> f64 {
        self.items
            .iter()
            .map(selector)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl<T: Clone> Sequence<T> {
    /// A new sequence with `items` appended after this sequence's elements.
    pub fn append(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut result = self.items.clone();
        result.extend(items);
        Self { items: result }
    }

    /// A new sequence with `items` placed before this sequence's elements.
    pub fn prepend(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut result: Vec<T> = items.into_iter().collect();
        result.extend_from_slice(&self.items);
        Self { items: result }
    }

    /// This sequence followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        self.append(other.items.iter().cloned())
    }

    /// Elements matching `predicate`, in order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Self {
        Self::new(self.items.iter().filter(|e| predicate(e)).cloned())
    }

    /// The elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self::new(self.items.iter().rev().cloned())
    }

    /// All but the first `count` elements; empty when `count >= len`.
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        Self::new(self.items.iter().skip(count).cloned())
    }

    /// All but the last `count` elements; empty when `count >= len`.
    #[must_use]
    pub fn skip_last(&self, count: usize) -> Self {
        self.take(self.items.len().saturating_sub(count))
    }

    /// Drops the leading run of elements matching `predicate`.
    pub fn skip_while(&self, predicate: impl Fn(&T) -> bool) -> Self {
        let run = self.items.iter().take_while(|e| predicate(e)).count();
        self.skip(run)
    }

    /// The first `count` elements; the whole sequence when `count >= len`.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        Self::new(self.items.iter().take(count).cloned())
    }

    /// The last `count` elements; the whole sequence when `count >= len`.
    #[must_use]
    pub fn take_last(&self, count: usize) -> Self {
        self.skip(self.items.len().saturating_sub(count))
    }

    /// The leading run of elements matching `predicate`.
    pub fn take_while(&self, predicate: impl Fn(&T) -> bool) -> Self {
        let run = self.items.iter().take_while(|e| predicate(e)).count();
        self.take(run)
    }

    /// The elements ordered by a three-way comparer.
    ///
    /// The sort is stable: elements the comparer considers equal keep their
    /// relative order.
    pub fn sort(&self, comparer: impl Fn(&T, &T) -> Ordering) -> Self {
        let mut result = self.items.clone();
        result.sort_by(|a, b| comparer(a, b));
        Self { items: result }
    }

    /// [`sort`](Self::sort) followed by a reversal.
    pub fn sort_reversed(&self, comparer: impl Fn(&T, &T) -> Ordering) -> Self {
        self.sort(comparer).reverse()
    }

    /// Keeps the first occurrence of each element; structurally equal
    /// later occurrences are dropped.
    #[must_use]
    pub fn distinct(&self) -> Self
    where
        T: ValueEq,
    {
        self.distinct_by(T::value_eq)
    }

    /// [`distinct`](Self::distinct) with a caller-supplied comparer.
    ///
    /// Quadratic: every element is checked against the kept prefix.
    pub fn distinct_by(&self, eq: impl Fn(&T, &T) -> bool) -> Self {
        let mut result: Vec<T> = Vec::new();
        for element in &self.items {
            if !result.iter().any(|kept| eq(kept, element)) {
                result.push(element.clone());
            }
        }
        Self { items: result }
    }

    /// Elements of this sequence absent from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self
    where
        T: ValueEq,
    {
        self.difference_by(other, T::value_eq)
    }

    /// [`difference`](Self::difference) with a caller-supplied comparer.
    ///
    /// Short-circuits to empty when the operands are unordered-equal under
    /// the same comparer.
    pub fn difference_by(&self, other: &Self, eq: impl Fn(&T, &T) -> bool) -> Self {
        if unordered_eq_by(&self.items, &other.items, &eq) {
            return Self::empty();
        }
        Self::new(
            self.items
                .iter()
                .filter(|element| !other.includes_by(element, &eq))
                .cloned(),
        )
    }

    /// Elements of this sequence also present in `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self
    where
        T: ValueEq,
    {
        self.intersect_by(other, T::value_eq)
    }

    pub fn intersect_by(&self, other: &Self, eq: impl Fn(&T, &T) -> bool) -> Self {
        Self::new(
            self.items
                .iter()
                .filter(|element| other.includes_by(element, &eq))
                .cloned(),
        )
    }

    /// Concatenation of both sequences with duplicates removed.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self
    where
        T: ValueEq,
    {
        self.union_by(other, T::value_eq)
    }

    pub fn union_by(&self, other: &Self, eq: impl Fn(&T, &T) -> bool) -> Self {
        self.concat(other).distinct_by(eq)
    }

    /// Elements present in exactly one of the two sequences.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self
    where
        T: ValueEq,
    {
        self.symmetric_difference_by(other, T::value_eq)
    }

    /// [`symmetric_difference`](Self::symmetric_difference) with a
    /// caller-supplied comparer. Short-circuits to empty when the operands
    /// are unordered-equal.
    pub fn symmetric_difference_by(&self, other: &Self, eq: impl Fn(&T, &T) -> bool) -> Self {
        if unordered_eq_by(&self.items, &other.items, &eq) {
            return Self::empty();
        }
        let mut result: Vec<T> = self
            .items
            .iter()
            .filter(|element| !other.includes_by(element, &eq))
            .cloned()
            .collect();
        result.extend(
            other
                .items
                .iter()
                .filter(|element| !self.includes_by(element, &eq))
                .cloned(),
        );
        Self { items: result }
    }

    /// Groups elements by `key_selector`, preserving first-seen key order
    /// and the element order within each group.
    pub fn group_by<K>(&self, key_selector: impl Fn(&T) -> K) -> Sequence<Group<K, T>>
    where
        K: Hash + Eq + Clone,
    {
        let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
        for element in &self.items {
            groups
                .entry(key_selector(element))
                .or_default()
                .push(element.clone());
        }
        Sequence::new(
            groups
                .into_iter()
                .map(|(key, values)| Group::new(key, Sequence::new(values))),
        )
    }

    /// An insertion-ordered map from each key to the sub-sequence of values
    /// sharing it.
    pub fn to_grouped_map<K, V>(
        &self,
        key_selector: impl Fn(&T) -> K,
        value_selector: impl Fn(&T) -> V,
    ) -> IndexMap<K, Sequence<V>>
    where
        K: Hash + Eq,
    {
        let mut groups: IndexMap<K, Vec<V>> = IndexMap::new();
        for element in &self.items {
            groups
                .entry(key_selector(element))
                .or_default()
                .push(value_selector(element));
        }
        groups
            .into_iter()
            .map(|(key, values)| (key, Sequence::new(values)))
            .collect()
    }

    /// An insertion-ordered map built from key/value selectors.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when two elements produce the same key.
    pub fn to_map<K, V>(
        &self,
        key_selector: impl Fn(&T) -> K,
        value_selector: impl Fn(&T) -> V,
    ) -> Result<IndexMap<K, V>>
    where
        K: Hash + Eq,
    {
        let mut result = IndexMap::new();
        for element in &self.items {
            let key = key_selector(element);
            if result.contains_key(&key) {
                return Err(Error::invalid_operation(
                    "duplicate key detected in sequence",
                ));
            }
            result.insert(key, value_selector(element));
        }
        Ok(result)
    }

    /// The distinct elements as a hash set.
    #[must_use]
    pub fn to_set(&self) -> HashSet<T>
    where
        T: Hash + Eq,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: ValueEq> Sequence<T> {
    /// Ordered, element-wise equality under the structural contract.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        ordered_eq(&self.items, &other.items)
    }

    /// Multiset equality: every element of one sequence consumes exactly
    /// one matching element of the other.
    #[must_use]
    pub fn unordered_equals(&self, other: &Self) -> bool {
        unordered_eq(&self.items, &other.items)
    }
}

impl Sequence<i64> {
    /// Integers from `from` through `to`, inclusive of both ends; empty
    /// when `to < from`.
    #[must_use]
    pub fn range(from: i64, to: i64) -> Self {
        Self::new(from..=to)
    }

    /// `count` consecutive integers starting at `start`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when the run would step past `i64::MAX`.
    pub fn count_from(start: i64, count: usize) -> Result<Self> {
        if count > 0 {
            let reachable = i64::try_from(count - 1)
                .ok()
                .and_then(|span| start.checked_add(span));
            if reachable.is_none() {
                return Err(Error::out_of_range(format!(
                    "{count} integers starting at {start} exceed the i64 domain"
                )));
            }
        }
        Ok(Self::new((0..count).map(|offset| start + offset as i64)))
    }
}

impl<T: ValueEq> ValueEq for Sequence<T> {
    fn value_eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}
