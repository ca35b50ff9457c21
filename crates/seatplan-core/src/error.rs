//! Domain validation errors.

use thiserror::Error;

/// Errors raised when constructing domain values from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Registration identifier was empty or whitespace.
    #[error("registration identifier must not be empty")]
    EmptyRegistration,

    /// Course code was empty or whitespace.
    #[error("course code must not be empty")]
    EmptyCourseCode,

    /// Room declared with zero seats.
    #[error("room {room} must have a positive capacity")]
    ZeroCapacity {
        /// Room identifier.
        room: u64,
    },
}
