use std::convert::Infallible;

use thiserror::Error;

/// Errors reported by the construction protocol.
///
/// `E` is the constructor's own error type; infallible constructors use the
/// `Infallible` default.
#[derive(Debug, PartialEq, Error)]
pub enum SlotError<E = Infallible> {
    /// A second construction was attempted on a populated slot.
    ///
    /// The offered value is dropped; the existing instance stays in place.
    #[error("already initialized; second construction rejected")]
    AlreadyInitialized,

    /// The constructor returned an error.
    ///
    /// The slot rolls back to `Uninitialized`, so a later call may retry.
    #[error("construction failed: {0}")]
    ConstructionFailed(E),
}
