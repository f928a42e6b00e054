//! History error types.

use thiserror::Error;

/// Errors from decoding the history interchange format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Input did not split into exactly one tournaments and one players section
    #[error("Expected 2 sections, found {0}")]
    SectionCount(usize),

    /// A section had no header row
    #[error("Missing header row in {0} section")]
    MissingHeader(&'static str),

    /// A row could not be decoded
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
