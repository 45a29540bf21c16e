#![forbid(unsafe_code)]

//! Immutable payloads describing one mutation each.
//!
//! A change record is constructed by the observable container performing the
//! mutation and handed to every subscriber of one delivery by shared
//! reference. Records carry the pre-mutation state an observer needs
//! (`old_value`, value-at-deletion) because delivery happens before the
//! write is committed.

/// A property that did not previously exist was given an initial value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefined<K, V> {
    pub key: K,
    pub value: V,
}

/// An existing property's value changed.
///
/// Only ever emitted when `old_value` and `new_value` differ under the
/// structural equality contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged<K, V> {
    pub key: K,
    pub old_value: V,
    pub new_value: V,
}

/// A property was removed; `value` is the value at time of deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeleted<K, V> {
    pub key: K,
    pub value: V,
}

/// The key component of an observable pair changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChanged<K> {
    pub old_key: K,
    pub new_key: K,
}

/// The value component of an observable pair changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChanged<V> {
    pub old_value: V,
    pub new_value: V,
}

/// An item was inserted into an observable list at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded<T> {
    pub index: usize,
    pub value: T,
}

/// An item was removed from an observable list; `value` is the removed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRemoved<T> {
    pub index: usize,
    pub value: T,
}

/// An item was relocated within an observable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMoved {
    pub from: usize,
    pub to: usize,
}
