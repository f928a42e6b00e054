//! Statistics error types.

use thiserror::Error;

/// Errors raised by the statistics engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Cash equivalence is undefined without a starting stack
    #[error("Starting chips must be greater than zero")]
    ZeroStartingChips,
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
