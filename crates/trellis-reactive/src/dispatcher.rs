#![forbid(unsafe_code)]

//! Per-subject channel ownership and delivery routing.
//!
//! A [`Dispatcher<S>`] is constructed around one subject and is the only
//! code path that can fire the channels it creates. [`Channel::deliver`] is
//! crate-private, so code outside this crate cannot trigger delivery
//! directly; it must go through [`Dispatcher::notify`], which verifies the
//! channel's identity first.
//!
//! [`Channel::deliver`]: crate::channel::Channel

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::trace;
use trellis_core::{Error, Result};

use crate::channel::{Channel, ChannelId};

/// Owns the channels of one subject and routes `notify` calls to them.
///
/// Exactly one dispatcher per subject instance.
pub struct Dispatcher<S> {
    subject: Rc<RefCell<S>>,
    channels: RefCell<HashSet<ChannelId>>,
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("channels", &self.channels.borrow().len())
            .finish()
    }
}

impl<S> Dispatcher<S> {
    /// Creates a dispatcher owning `subject`.
    #[must_use]
    pub fn new(subject: S) -> Self {
        Self::from_shared(Rc::new(RefCell::new(subject)))
    }

    /// Creates a dispatcher over an already-shared subject cell.
    ///
    /// Used by the observable containers so that reads, delivery, and
    /// commits all go through the same cell.
    #[must_use]
    pub fn from_shared(subject: Rc<RefCell<S>>) -> Self {
        Self {
            subject,
            channels: RefCell::new(HashSet::new()),
        }
    }

    /// Allocates a new channel and registers it with this dispatcher.
    #[must_use]
    pub fn create_channel<D>(&self) -> Channel<S, D> {
        let channel = Channel::new();
        self.channels.borrow_mut().insert(channel.id());
        trace!(channel = ?channel.id(), "channel created");
        channel
    }

    /// Delivers `data` to every observer of `channel`, synchronously.
    ///
    /// The subject is borrowed for the duration of the delivery, so
    /// observers may read it (it still holds the pre-mutation state) but
    /// must not mutate it re-entrantly.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when `channel` was not created by this dispatcher.
    pub fn notify<D>(&self, channel: &Channel<S, D>, data: &D) -> Result<()> {
        if !self.channels.borrow().contains(&channel.id()) {
            return Err(Error::invalid_operation(
                "channel was not created by this dispatcher",
            ));
        }
        let subject = self.subject.borrow();
        channel.deliver(&subject, data);
        Ok(())
    }

    /// Runs `f` over the current subject state.
    pub fn with_subject<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.subject.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notify_delivers_subject_and_data() {
        let dispatcher = Dispatcher::new(String::from("subject"));
        let channel = dispatcher.create_channel::<i32>();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let obs = Channel::observer(move |data: &i32, subject: &String| {
            seen_clone.borrow_mut().push((subject.clone(), *data));
        });
        channel.subscribe(&obs);

        dispatcher.notify(&channel, &7).unwrap();
        assert_eq!(*seen.borrow(), vec![(String::from("subject"), 7)]);
    }

    #[test]
    fn notify_on_foreign_channel_fails_fast() {
        let own = Dispatcher::new(0_u8);
        let other = Dispatcher::new(0_u8);
        let foreign = other.create_channel::<i32>();

        let err = own.notify(&foreign, &1).unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
    }

    #[test]
    fn multiple_channels_route_independently() {
        let dispatcher = Dispatcher::new(());
        let numbers = dispatcher.create_channel::<i32>();
        let words = dispatcher.create_channel::<&'static str>();

        let number_count = Rc::new(Cell::new(0));
        let word_count = Rc::new(Cell::new(0));

        let n = Rc::clone(&number_count);
        let number_obs = Channel::observer(move |_: &i32, _: &()| n.set(n.get() + 1));
        numbers.subscribe(&number_obs);

        let w = Rc::clone(&word_count);
        let word_obs = Channel::observer(move |_: &&'static str, _: &()| w.set(w.get() + 1));
        words.subscribe(&word_obs);

        dispatcher.notify(&numbers, &1).unwrap();
        dispatcher.notify(&numbers, &2).unwrap();
        dispatcher.notify(&words, &"a").unwrap();

        assert_eq!(number_count.get(), 2);
        assert_eq!(word_count.get(), 1);
    }

    #[test]
    fn with_subject_reads_current_state() {
        let dispatcher = Dispatcher::new(vec!["a", "b"]);
        assert_eq!(dispatcher.with_subject(Vec::len), 2);
        assert_eq!(dispatcher.with_subject(|s| s.join("")), "ab");
    }

    #[test]
    fn observers_can_read_subject_during_delivery() {
        let dispatcher = Dispatcher::new(vec![1, 2, 3]);
        let channel = dispatcher.create_channel::<()>();

        let observed_len = Rc::new(Cell::new(0));
        let len = Rc::clone(&observed_len);
        let obs = Channel::observer(move |_: &(), subject: &Vec<i32>| {
            len.set(subject.len());
        });
        channel.subscribe(&obs);

        dispatcher.notify(&channel, &()).unwrap();
        assert_eq!(observed_len.get(), 3);
    }
}
