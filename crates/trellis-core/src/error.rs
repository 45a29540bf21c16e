#![forbid(unsafe_code)]

//! Shared failure kinds for the Trellis crates.
//!
//! Every failure surfaces as a thrown error carrying a human-readable
//! message; nothing is swallowed, retried, or reported through codes. The
//! variants are the small fixed vocabulary the rest of the workspace signals
//! with: bad input shape (`InvalidArgument`), valid input but invalid state
//! for the request (`InvalidOperation`), malformed text (`InvalidFormat`),
//! an index or value outside its domain (`OutOfRange`), and the two
//! intentionally-unavailable markers (`NotSupported`, `NotImplemented`).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl Error {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange(message.into())
    }

    #[must_use]
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_prefixed_by_kind() {
        let err = Error::invalid_operation("sequence contains no elements");
        assert_eq!(
            err.to_string(),
            "invalid operation: sequence contains no elements"
        );

        let err = Error::out_of_range("index 7 past end of list (len 3)");
        assert!(err.to_string().starts_with("out of range:"));
    }

    #[test]
    fn constructors_match_variants() {
        assert!(matches!(
            Error::invalid_argument("x"),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(Error::invalid_format("x"), Error::InvalidFormat(_)));
        assert!(matches!(Error::not_supported("x"), Error::NotSupported(_)));
        assert!(matches!(
            Error::not_implemented("x"),
            Error::NotImplemented(_)
        ));
    }
}
