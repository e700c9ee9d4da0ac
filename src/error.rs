//! Errors surfaced by copy-out and by versioned iteration.

use thiserror::Error;

/// Failure of `copy_to`. Raised before any element is written.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum CopyToError {
    #[error("start index {start} is out of range for a destination of length {len}")]
    StartOutOfRange { start: usize, len: usize },

    #[error("destination has room for {available} items but the collection holds {required}")]
    InsufficientCapacity { available: usize, required: usize },
}

/// Failure of a cursor operation.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum IterError {
    /// The owning collection changed structurally after the cursor was created.
    #[error("collection was modified; the iterator is no longer valid")]
    Invalidated,

    #[error("iterator was disposed")]
    Disposed,

    #[error("iteration has not started")]
    NotStarted,

    #[error("iteration already finished")]
    Finished,
}
