//! Clock handle error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// The actor has stopped
    #[error("Clock is closed")]
    Closed,
}

pub type ClockResult<T> = Result<T, ClockError>;
