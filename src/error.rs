use thiserror::Error;

/// Returned by [`crate::sleep`] when the sleeping thread is interrupted
/// before the requested duration elapses.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("sleep interrupted")]
pub struct Interrupted;
