#![forbid(unsafe_code)]

//! An observable key/value pair.
//!
//! Wraps a [`Pair`] and emits [`KeyChanged`] / [`ValueChanged`] records when
//! a component is replaced with a structurally different one. Shares the
//! channel mechanism and notify-before-commit ordering of the other
//! observable containers.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use trellis_core::{Pair, ValueEq};

use crate::change::{KeyChanged, ValueChanged};
use crate::channel::Channel;
use crate::dispatcher::Dispatcher;

/// A mutable key/value pair with change notification.
pub struct ObservablePair<K, V> {
    store: Rc<RefCell<Pair<K, V>>>,
    dispatcher: Dispatcher<Pair<K, V>>,
    on_key_changed: Channel<Pair<K, V>, KeyChanged<K>>,
    on_value_changed: Channel<Pair<K, V>, ValueChanged<V>>,
}

impl<K, V> std::fmt::Debug for ObservablePair<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservablePair").finish()
    }
}

impl<K, V> ObservablePair<K, V>
where
    K: ValueEq + Clone,
    V: ValueEq + Clone,
{
    /// Wraps `pair` so changes to its components can be observed.
    #[must_use]
    pub fn from(pair: Pair<K, V>) -> Self {
        let store = Rc::new(RefCell::new(pair));
        let dispatcher = Dispatcher::from_shared(Rc::clone(&store));
        let on_key_changed = dispatcher.create_channel();
        let on_value_changed = dispatcher.create_channel();
        Self {
            store,
            dispatcher,
            on_key_changed,
            on_value_changed,
        }
    }

    /// Channel firing when the key component changes.
    #[must_use]
    pub fn on_key_changed(&self) -> &Channel<Pair<K, V>, KeyChanged<K>> {
        &self.on_key_changed
    }

    /// Channel firing when the value component changes.
    #[must_use]
    pub fn on_value_changed(&self) -> &Channel<Pair<K, V>, ValueChanged<V>> {
        &self.on_value_changed
    }

    /// Replaces the key, emitting [`KeyChanged`] when the new key differs.
    pub fn set_key(&self, key: K) {
        let old = self.store.borrow().key.clone();
        if old.value_eq(&key) {
            trace!("equal key write, no record");
        } else {
            let change = KeyChanged {
                old_key: old,
                new_key: key.clone(),
            };
            self.dispatcher
                .notify(&self.on_key_changed, &change)
                .expect("pair channels are registered with their own dispatcher");
        }
        self.store.borrow_mut().key = key;
    }

    /// Replaces the value, emitting [`ValueChanged`] when the new value
    /// differs.
    pub fn set_value(&self, value: V) {
        let old = self.store.borrow().value.clone();
        if old.value_eq(&value) {
            trace!("equal value write, no record");
        } else {
            let change = ValueChanged {
                old_value: old,
                new_value: value.clone(),
            };
            self.dispatcher
                .notify(&self.on_value_changed, &change)
                .expect("pair channels are registered with their own dispatcher");
        }
        self.store.borrow_mut().value = value;
    }

    #[must_use]
    pub fn key(&self) -> K {
        self.store.borrow().key.clone()
    }

    #[must_use]
    pub fn value(&self) -> V {
        self.store.borrow().value.clone()
    }

    /// A cloned snapshot of the pair.
    #[must_use]
    pub fn snapshot(&self) -> Pair<K, V> {
        self.dispatcher.with_subject(Pair::clone)
    }
}
