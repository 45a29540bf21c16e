#![forbid(unsafe_code)]

//! An observable list: a positional container whose mutations emit item
//! change records.
//!
//! Shares the channel mechanism of [`ObservableRecord`]: every mutation
//! computes its record, delivers it to the current subscribers, and only
//! then commits (notify-before-commit). Index arguments are validated up
//! front; out-of-range indexes fail with `OutOfRange` before anything is
//! delivered.
//!
//! [`ObservableRecord`]: crate::record::ObservableRecord

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use trellis_core::{Error, Result, ValueEq};

use crate::change::{ItemAdded, ItemMoved, ItemRemoved, PropertyChanged};
use crate::channel::Channel;
use crate::dispatcher::Dispatcher;

/// A positional container with change notification.
pub struct ObservableList<T> {
    store: Rc<RefCell<Vec<T>>>,
    dispatcher: Dispatcher<Vec<T>>,
    on_added: Channel<Vec<T>, ItemAdded<T>>,
    on_removed: Channel<Vec<T>, ItemRemoved<T>>,
    on_moved: Channel<Vec<T>, ItemMoved>,
    on_changed: Channel<Vec<T>, PropertyChanged<usize, T>>,
}

impl<T> std::fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableList")
            .field("len", &self.store.borrow().len())
            .finish()
    }
}

impl<T: ValueEq + Clone> ObservableList<T> {
    /// Creates an empty observable list.
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Wraps `template` so its mutations can be observed.
    #[must_use]
    pub fn from(template: Vec<T>) -> Self {
        let store = Rc::new(RefCell::new(template));
        let dispatcher = Dispatcher::from_shared(Rc::clone(&store));
        let on_added = dispatcher.create_channel();
        let on_removed = dispatcher.create_channel();
        let on_moved = dispatcher.create_channel();
        let on_changed = dispatcher.create_channel();
        Self {
            store,
            dispatcher,
            on_added,
            on_removed,
            on_moved,
            on_changed,
        }
    }

    /// Channel firing when an item is inserted.
    #[must_use]
    pub fn on_added(&self) -> &Channel<Vec<T>, ItemAdded<T>> {
        &self.on_added
    }

    /// Channel firing when an item is removed.
    #[must_use]
    pub fn on_removed(&self) -> &Channel<Vec<T>, ItemRemoved<T>> {
        &self.on_removed
    }

    /// Channel firing when an item is relocated.
    #[must_use]
    pub fn on_moved(&self) -> &Channel<Vec<T>, ItemMoved> {
        &self.on_moved
    }

    /// Channel firing when an index is overwritten with a differing value.
    #[must_use]
    pub fn on_changed(&self) -> &Channel<Vec<T>, PropertyChanged<usize, T>> {
        &self.on_changed
    }

    /// Appends `value`, emitting [`ItemAdded`] at the end index.
    pub fn push(&self, value: T) {
        let index = self.store.borrow().len();
        let change = ItemAdded {
            index,
            value: value.clone(),
        };
        self.dispatcher
            .notify(&self.on_added, &change)
            .expect("list channels are registered with their own dispatcher");
        self.store.borrow_mut().push(value);
    }

    /// Inserts `value` at `index`, emitting [`ItemAdded`].
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `index > len`.
    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        let len = self.store.borrow().len();
        if index > len {
            return Err(Error::out_of_range(format!(
                "insert index {index} past end of list (len {len})"
            )));
        }
        let change = ItemAdded {
            index,
            value: value.clone(),
        };
        self.dispatcher
            .notify(&self.on_added, &change)
            .expect("list channels are registered with their own dispatcher");
        self.store.borrow_mut().insert(index, value);
        Ok(())
    }

    /// Removes and returns the item at `index`, emitting [`ItemRemoved`].
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `index >= len`.
    pub fn remove(&self, index: usize) -> Result<T> {
        let old = {
            let store = self.store.borrow();
            store.get(index).cloned().ok_or_else(|| {
                Error::out_of_range(format!(
                    "remove index {index} past end of list (len {})",
                    store.len()
                ))
            })?
        };
        let change = ItemRemoved {
            index,
            value: old,
        };
        self.dispatcher
            .notify(&self.on_removed, &change)
            .expect("list channels are registered with their own dispatcher");
        Ok(self.store.borrow_mut().remove(index))
    }

    /// Overwrites the item at `index`, emitting [`PropertyChanged`] only
    /// when the old and new values differ under the equality contract.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `index >= len`.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        let old = {
            let store = self.store.borrow();
            store.get(index).cloned().ok_or_else(|| {
                Error::out_of_range(format!(
                    "set index {index} past end of list (len {})",
                    store.len()
                ))
            })?
        };
        if old.value_eq(&value) {
            trace!("equal write, no record");
        } else {
            let change = PropertyChanged {
                key: index,
                old_value: old,
                new_value: value.clone(),
            };
            self.dispatcher
                .notify(&self.on_changed, &change)
                .expect("list channels are registered with their own dispatcher");
        }
        self.store.borrow_mut()[index] = value;
        Ok(())
    }

    /// Relocates the item at `from` to position `to`, emitting [`ItemMoved`].
    ///
    /// Moving an item onto its own position is a no-op and emits nothing.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when either index is past the end of the list.
    pub fn move_item(&self, from: usize, to: usize) -> Result<()> {
        let len = self.store.borrow().len();
        if from >= len || to >= len {
            return Err(Error::out_of_range(format!(
                "move {from} -> {to} outside list bounds (len {len})"
            )));
        }
        if from == to {
            return Ok(());
        }
        let change = ItemMoved { from, to };
        self.dispatcher
            .notify(&self.on_moved, &change)
            .expect("list channels are registered with their own dispatcher");
        let mut store = self.store.borrow_mut();
        let item = store.remove(from);
        store.insert(to, item);
        Ok(())
    }

    /// Current item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.store.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// A cloned snapshot of the items.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.dispatcher.with_subject(Vec::clone)
    }
}

impl<T: ValueEq + Clone> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}
