//! Error types shared by every container in the crate.
//!
//! Lookup misses are not errors: `find`, `get` and `contains` report them as
//! `None` or `false`. Only the checked accessors and positional operations
//! return [`Error`].

use alloc::collections::TryReserveError;
use core::fmt;

/// A convenience alias for results produced by this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the checked container operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The allocator could not satisfy a fallible reservation.
    #[error("allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// A checked lookup (`at`, `at_mut`) did not find the key.
    #[error("key not found")]
    KeyNotFound,

    /// A position was outside the live range of a container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// The number of live elements at the time of the call.
        len: usize,
    },

    /// An operation was called in a state where it is not defined.
    #[error("precondition violated: {0}")]
    PreconditionViolation(Precondition),
}

/// The precondition that a [`Error::PreconditionViolation`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precondition {
    /// `pop` on an empty array.
    PopEmpty,
    /// Erasing through the past-the-end position of a map or set.
    EraseEnd,
    /// A maximum load factor that is not finite or is below
    /// [`TableConfig::MIN_MAX_LOAD_FACTOR`](crate::TableConfig::MIN_MAX_LOAD_FACTOR).
    InvalidLoadFactor,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopEmpty => f.write_str("pop on an empty array"),
            Self::EraseEnd => f.write_str("erase at the past-the-end position"),
            Self::InvalidLoadFactor => {
                f.write_str("max load factor must be finite and at least 0.01")
            }
        }
    }
}

impl Error {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::out_of_range(7, 3).to_string(),
            "index 7 out of range for length 3"
        );
        assert_eq!(
            Error::PreconditionViolation(Precondition::PopEmpty).to_string(),
            "precondition violated: pop on an empty array"
        );
    }

    #[test]
    fn allocation_failure_converts_from_try_reserve() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::AllocationFailure(_)));
    }
}
