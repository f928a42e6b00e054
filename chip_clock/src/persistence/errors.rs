//! Persistence error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Top-level blob was valid JSON but not an object
    #[error("Persisted state is not a JSON object")]
    NotAnObject,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
