#![forbid(unsafe_code)]

//! Synchronous change notification for plain data containers.
//!
//! This crate provides the observable half of Trellis:
//!
//! - [`Channel`]: a single-topic broadcast endpoint holding a set of observer
//!   callbacks, with subscribe/unsubscribe/unsubscribe-all.
//! - [`Dispatcher`]: the per-subject owner of one or more channels and the
//!   only code path that can trigger delivery.
//! - Change records ([`PropertyDefined`], [`PropertyChanged`],
//!   [`PropertyDeleted`], and the item/pair variants): immutable payloads
//!   describing one mutation each.
//! - [`ObservableRecord`], [`ObservableList`], [`ObservablePair`]: containers
//!   that emit change records automatically when mutated through their API.
//!
//! # Architecture
//!
//! Everything is single-threaded and fully synchronous: `Rc`/`RefCell`
//! shared ownership, no `Send`/`Sync`, no background execution. A mutation
//! computes its change record, delivers it to every current subscriber on
//! the caller's stack, and only then commits the write (notify-before-commit:
//! an observer reading the subject mid-delivery sees the pre-write state).
//!
//! Rust has no transparent property interception, so the containers expose
//! an explicit mutation API (`set`, `remove`, ...) instead of field-style
//! assignment.
//!
//! # Invariants
//!
//! 1. Exactly one change record per externally observable mutation; writing
//!    a value equal to the current one (under the [`ValueEq`] contract)
//!    emits nothing.
//! 2. Delivery is synchronous and completes before the mutating call
//!    returns; observers run in subscription order.
//! 3. Observers subscribed during a delivery do not receive the in-flight
//!    record; observers unsubscribed during a delivery and not yet reached
//!    are skipped.
//! 4. Only the owning [`Dispatcher`] can fire a channel; notifying through a
//!    foreign dispatcher fails with `InvalidOperation`.
//!
//! [`ValueEq`]: trellis_core::ValueEq

pub mod change;
pub mod channel;
pub mod dispatcher;
pub mod list;
pub mod pair;
pub mod record;

pub use change::{
    ItemAdded, ItemMoved, ItemRemoved, KeyChanged, PropertyChanged, PropertyDefined,
    PropertyDeleted, ValueChanged,
};
pub use channel::{Channel, ChannelId, Observer};
pub use dispatcher::Dispatcher;
pub use list::ObservableList;
pub use pair::ObservablePair;
pub use record::ObservableRecord;
