#![forbid(unsafe_code)]

//! An observable record: a keyed store whose mutations emit change records.
//!
//! [`ObservableRecord`] is the explicit-API rendition of "wrap a plain data
//! record and observe its property mutations": Rust has no transparent
//! property interception, so writes go through [`set`](ObservableRecord::set)
//! and [`remove`](ObservableRecord::remove) instead of field assignment.
//!
//! # Change detection
//!
//! - `set` on a key that does not yet exist emits [`PropertyDefined`].
//! - `set` on an existing key emits [`PropertyChanged`] only when the old
//!   and new values differ under the [`ValueEq`] contract; an equal write
//!   emits nothing (and still performs the no-op write).
//! - `remove` of a present key emits [`PropertyDeleted`] carrying the value
//!   at time of deletion.
//!
//! # Ordering
//!
//! Notify-before-commit: the change record is delivered while the store
//! still holds the pre-write state, so an observer inspecting the subject
//! mid-delivery never sees the write already applied. Mutating the record
//! from inside an observer is a re-entrant borrow and panics.
//!
//! [`ValueEq`]: trellis_core::ValueEq

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;
use trellis_core::ValueEq;

use crate::change::{PropertyChanged, PropertyDefined, PropertyDeleted};
use crate::channel::Channel;
use crate::dispatcher::Dispatcher;

/// A keyed, insertion-ordered store with change notification.
pub struct ObservableRecord<K, V> {
    store: Rc<RefCell<IndexMap<K, V>>>,
    dispatcher: Dispatcher<IndexMap<K, V>>,
    on_defined: Channel<IndexMap<K, V>, PropertyDefined<K, V>>,
    on_changed: Channel<IndexMap<K, V>, PropertyChanged<K, V>>,
    on_deleted: Channel<IndexMap<K, V>, PropertyDeleted<K, V>>,
}

impl<K, V> std::fmt::Debug for ObservableRecord<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableRecord")
            .field("len", &self.store.borrow().len())
            .finish()
    }
}

impl<K, V> ObservableRecord<K, V>
where
    K: Hash + Eq + Clone,
    V: ValueEq + Clone,
{
    /// Creates an empty observable record.
    #[must_use]
    pub fn new() -> Self {
        Self::from(IndexMap::new())
    }

    /// Wraps `template` so its mutations can be observed.
    #[must_use]
    pub fn from(template: IndexMap<K, V>) -> Self {
        let store = Rc::new(RefCell::new(template));
        let dispatcher = Dispatcher::from_shared(Rc::clone(&store));
        let on_defined = dispatcher.create_channel();
        let on_changed = dispatcher.create_channel();
        let on_deleted = dispatcher.create_channel();
        Self {
            store,
            dispatcher,
            on_defined,
            on_changed,
            on_deleted,
        }
    }

    /// Channel firing when a key is given its initial value.
    #[must_use]
    pub fn on_defined(&self) -> &Channel<IndexMap<K, V>, PropertyDefined<K, V>> {
        &self.on_defined
    }

    /// Channel firing when an existing key's value changes.
    #[must_use]
    pub fn on_changed(&self) -> &Channel<IndexMap<K, V>, PropertyChanged<K, V>> {
        &self.on_changed
    }

    /// Channel firing when a key is removed.
    #[must_use]
    pub fn on_deleted(&self) -> &Channel<IndexMap<K, V>, PropertyDeleted<K, V>> {
        &self.on_deleted
    }

    /// Writes `value` under `key`, emitting at most one change record.
    pub fn set(&self, key: K, value: V) {
        let existing = self.store.borrow().get(&key).cloned();
        match existing {
            Some(old) if old.value_eq(&value) => {
                trace!("equal write, no record");
            }
            Some(old) => {
                let change = PropertyChanged {
                    key: key.clone(),
                    old_value: old,
                    new_value: value.clone(),
                };
                self.dispatcher
                    .notify(&self.on_changed, &change)
                    .expect("record channels are registered with their own dispatcher");
            }
            None => {
                let change = PropertyDefined {
                    key: key.clone(),
                    value: value.clone(),
                };
                self.dispatcher
                    .notify(&self.on_defined, &change)
                    .expect("record channels are registered with their own dispatcher");
            }
        }
        self.store.borrow_mut().insert(key, value);
    }

    /// Removes `key`, returning the removed value.
    ///
    /// A present key emits [`PropertyDeleted`] before the removal commits;
    /// an absent key emits nothing and returns `None`.
    pub fn remove(&self, key: &K) -> Option<V> {
        let old = self.store.borrow().get(key).cloned()?;
        let change = PropertyDeleted {
            key: key.clone(),
            value: old,
        };
        self.dispatcher
            .notify(&self.on_deleted, &change)
            .expect("record channels are registered with their own dispatcher");
        self.store.borrow_mut().shift_remove(key)
    }

    /// Current value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.store.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.borrow().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.store.borrow().keys().cloned().collect()
    }

    /// Runs `f` over the current store state.
    pub fn with<R>(&self, f: impl FnOnce(&IndexMap<K, V>) -> R) -> R {
        self.dispatcher.with_subject(f)
    }

    /// A cloned snapshot of the store.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<K, V> {
        self.dispatcher.with_subject(IndexMap::clone)
    }
}

impl<K, V> Default for ObservableRecord<K, V>
where
    K: Hash + Eq + Clone,
    V: ValueEq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn record_with_x1() -> ObservableRecord<String, i32> {
        let record = ObservableRecord::new();
        record.set("x".to_string(), 1);
        record
    }

    #[test]
    fn equal_write_emits_nothing() {
        let record = record_with_x1();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let obs = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
            c.set(c.get() + 1);
        });
        record.on_changed().subscribe(&obs);

        record.set("x".to_string(), 1);
        assert_eq!(count.get(), 0);
        assert_eq!(record.get(&"x".to_string()), Some(1));
    }

    #[test]
    fn differing_write_emits_exactly_one_change() {
        let record = record_with_x1();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let obs = Channel::observer(move |change: &PropertyChanged<String, i32>, _| {
            s.borrow_mut().push(change.clone());
        });
        record.on_changed().subscribe(&obs);

        record.set("x".to_string(), 2);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key, "x");
        assert_eq!(seen[0].old_value, 1);
        assert_eq!(seen[0].new_value, 2);
    }

    #[test]
    fn new_key_fires_defined_never_changed() {
        let record: ObservableRecord<String, i32> = ObservableRecord::new();
        let defined = Rc::new(Cell::new(0));
        let changed = Rc::new(Cell::new(0));

        let d = Rc::clone(&defined);
        let defined_obs = Channel::observer(move |_: &PropertyDefined<String, i32>, _| {
            d.set(d.get() + 1);
        });
        record.on_defined().subscribe(&defined_obs);

        let c = Rc::clone(&changed);
        let changed_obs = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
            c.set(c.get() + 1);
        });
        record.on_changed().subscribe(&changed_obs);

        record.set("fresh".to_string(), 42);
        assert_eq!(defined.get(), 1);
        assert_eq!(changed.get(), 0);
    }

    #[test]
    fn remove_fires_deleted_with_value_at_deletion() {
        let record = record_with_x1();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let obs = Channel::observer(move |change: &PropertyDeleted<String, i32>, _| {
            s.borrow_mut().push(change.clone());
        });
        record.on_deleted().subscribe(&obs);

        assert_eq!(record.remove(&"x".to_string()), Some(1));
        assert_eq!(record.remove(&"x".to_string()), None);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].value, 1);
        assert!(!record.contains_key(&"x".to_string()));
    }

    #[test]
    fn notify_happens_before_commit() {
        let record = record_with_x1();
        let observed = Rc::new(Cell::new(None));
        let o = Rc::clone(&observed);
        let obs = Channel::observer(
            move |change: &PropertyChanged<String, i32>, subject: &IndexMap<String, i32>| {
                // The store must still hold the pre-write value.
                o.set(Some((subject[&change.key], change.new_value)));
            },
        );
        record.on_changed().subscribe(&obs);

        record.set("x".to_string(), 2);
        assert_eq!(observed.get(), Some((1, 2)));
        assert_eq!(record.get(&"x".to_string()), Some(2));
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let record = record_with_x1();
        let a_count = Rc::new(Cell::new(0));
        let b_count = Rc::new(Cell::new(0));

        let a = Rc::clone(&a_count);
        let obs_a = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
            a.set(a.get() + 1);
        });
        let b = Rc::clone(&b_count);
        let obs_b = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
            b.set(b.get() + 1);
        });
        record.on_changed().subscribe(&obs_a);
        record.on_changed().subscribe(&obs_b);

        record.set("x".to_string(), 2);
        record.on_changed().unsubscribe(&obs_a);
        record.set("x".to_string(), 3);

        assert_eq!(a_count.get(), 1);
        assert_eq!(b_count.get(), 2);
    }

    #[test]
    fn unsubscribe_all_silences_every_observer() {
        let record = record_with_x1();
        let count = Rc::new(Cell::new(0));
        let observers: Vec<_> = (0..3)
            .map(|_| {
                let c = Rc::clone(&count);
                Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
                    c.set(c.get() + 1);
                })
            })
            .collect();
        for obs in &observers {
            record.on_changed().subscribe(obs);
        }

        record.on_changed().unsubscribe_all();
        record.set("x".to_string(), 99);
        assert_eq!(count.get(), 0);
    }

    #[test]
    #[should_panic]
    fn reentrant_mutation_from_observer_panics() {
        let record = Rc::new(record_with_x1());
        let r = Rc::clone(&record);
        let obs = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
            // The subject is borrowed for delivery; writing back through the
            // same store is a borrow violation.
            r.set("y".to_string(), 9);
        });
        record.on_changed().subscribe(&obs);

        record.set("x".to_string(), 2);
    }

    #[test]
    fn deep_values_use_structural_equality() {
        let record: ObservableRecord<String, Vec<i32>> = ObservableRecord::new();
        record.set("v".to_string(), vec![1, 2, 3]);

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let obs = Channel::observer(move |_: &PropertyChanged<String, Vec<i32>>, _| {
            c.set(c.get() + 1);
        });
        record.on_changed().subscribe(&obs);

        // Structurally equal fresh vector: no record.
        record.set("v".to_string(), vec![1, 2, 3]);
        assert_eq!(count.get(), 0);

        record.set("v".to_string(), vec![3, 2, 1]);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn template_preserves_insertion_order() {
        let template: IndexMap<String, i32> =
            [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        let record = ObservableRecord::from(template);
        record.set("c".to_string(), 3);
        assert_eq!(
            record.keys(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(record.len(), 3);
    }
}
