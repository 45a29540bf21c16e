#![forbid(unsafe_code)]

//! Core: error taxonomy, the structural equality contract, and the `Pair`
//! value type shared by the other Trellis crates.

pub mod equality;
pub mod error;
pub mod pair;

pub use equality::{ValueEq, ordered_eq, ordered_eq_by, unordered_eq, unordered_eq_by};
pub use error::{Error, Result};
pub use pair::Pair;
