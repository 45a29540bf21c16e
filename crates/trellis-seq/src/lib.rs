#![forbid(unsafe_code)]

//! Immutable sequence pipelines.
//!
//! [`Sequence<T>`] is an ordered view backed by a `Vec` materialized at
//! construction time. Every query operator returns a **new** sequence (each
//! step materializes its own backing vector — not a fused pipeline) and the
//! chain terminates with a materializing call (`to_vec`, `to_map`, an
//! aggregate).
//!
//! Operators that compare elements come in two forms: the default form uses
//! the structural equality contract ([`ValueEq`]), and the `_by` form takes
//! a caller-substituted comparer. Membership tests are linear scans by
//! design — the comparer is substitutable, so no hashing is assumed.
//!
//! # Invariants
//!
//! 1. No operator mutates `self`; a sequence's contents never change after
//!    construction.
//! 2. Mutating the collection a sequence was built from does not affect the
//!    sequence (the backing vector is a materialized copy).
//! 3. Two sequences are equal iff they have the same length and are
//!    element-wise equal in order; [`unordered_equals`] is multiset
//!    equality.
//!
//! [`ValueEq`]: trellis_core::ValueEq
//! [`unordered_equals`]: Sequence::unordered_equals

pub mod group;
pub mod numeric;
pub mod sequence;

pub use group::Group;
pub use numeric::NumericSequence;
pub use sequence::Sequence;
