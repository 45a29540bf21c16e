#![forbid(unsafe_code)]

//! Single-topic broadcast channels.
//!
//! A [`Channel<S, D>`] holds the set of observers subscribed to one kind of
//! change record `D` emitted on behalf of a subject `S`. Channels are
//! allocated by a [`Dispatcher`](crate::dispatcher::Dispatcher) and expose no
//! public delivery path; only the owning dispatcher can fire one.
//!
//! # Observer identity
//!
//! Observers are reference-counted callbacks ([`Observer`]). Identity is
//! `Rc` pointer identity, which gives the subscriber set its semantics:
//! subscribing the same handle twice is a no-op, and unsubscribing an absent
//! handle is a no-op.
//!
//! # Delivery semantics
//!
//! The subscriber list is snapshotted when delivery begins and liveness is
//! re-checked per observer, so:
//!
//! - an observer subscribed *during* a delivery does not receive the
//!   in-flight record;
//! - an observer unsubscribed during a delivery and not yet reached is
//!   skipped.
//!
//! There is no error isolation: an observer that panics aborts delivery to
//! the observers not yet reached (first failure wins).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

/// An observer callback, invoked with `(data, subject)` on each delivery.
pub type Observer<S, D> = Rc<dyn Fn(&D, &S)>;

/// Process-unique identity of a channel, used by the dispatcher for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

thread_local! {
    static NEXT_CHANNEL_ID: Cell<u64> = const { Cell::new(0) };
}

fn next_channel_id() -> ChannelId {
    NEXT_CHANNEL_ID.with(|cell| {
        let id = cell.get();
        cell.set(id + 1);
        ChannelId(id)
    })
}

fn same_observer<S, D>(a: &Observer<S, D>, b: &Observer<S, D>) -> bool {
    // Data-pointer identity; the vtable component is irrelevant here.
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

struct ChannelInner<S, D> {
    id: ChannelId,
    subscribers: RefCell<Vec<Observer<S, D>>>,
}

/// A single-topic broadcast endpoint.
///
/// Cloning a `Channel` yields another handle to the same subscriber set.
pub struct Channel<S, D> {
    inner: Rc<ChannelInner<S, D>>,
}

impl<S, D> Clone for Channel<S, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, D> std::fmt::Debug for Channel<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.inner.id)
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<S, D> Channel<S, D> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                id: next_channel_id(),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Wraps a closure into an [`Observer`] handle.
    ///
    /// Keep the handle around: it is the identity used by
    /// [`unsubscribe`](Self::unsubscribe).
    #[must_use]
    pub fn observer(f: impl Fn(&D, &S) + 'static) -> Observer<S, D> {
        Rc::new(f)
    }

    /// Adds `observer` to the subscriber set.
    ///
    /// Idempotent: subscribing a handle that is already subscribed is a
    /// no-op.
    pub fn subscribe(&self, observer: &Observer<S, D>) {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        if subscribers.iter().any(|o| same_observer(o, observer)) {
            return;
        }
        subscribers.push(Rc::clone(observer));
        trace!(channel = ?self.inner.id, subscribers = subscribers.len(), "observer subscribed");
    }

    /// Removes `observer` from the subscriber set; absent is a no-op.
    pub fn unsubscribe(&self, observer: &Observer<S, D>) {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        subscribers.retain(|o| !same_observer(o, observer));
        trace!(channel = ?self.inner.id, subscribers = subscribers.len(), "observer unsubscribed");
    }

    /// Removes every observer from the subscriber set.
    pub fn unsubscribe_all(&self) {
        self.inner.subscribers.borrow_mut().clear();
        trace!(channel = ?self.inner.id, "all observers unsubscribed");
    }

    /// Number of currently subscribed observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    pub(crate) fn id(&self) -> ChannelId {
        self.inner.id
    }

    /// Invokes every currently subscribed observer with `(data, subject)`,
    /// in subscription order, on the caller's stack.
    pub(crate) fn deliver(&self, subject: &S, data: &D) {
        let snapshot: Vec<Observer<S, D>> = self.inner.subscribers.borrow().clone();
        trace!(channel = ?self.inner.id, subscribers = snapshot.len(), "delivering");
        for observer in &snapshot {
            let live = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .any(|o| same_observer(o, observer));
            if live {
                observer(data, subject);
            }
        }
    }
}
