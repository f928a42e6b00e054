//! Persistence bridge between the live session and durable storage.
//!
//! This module provides:
//! - The persisted blob with independently restorable sections
//! - A storage trait with file and in-memory backends
//! - A debounced writer task fed over a channel
//!
//! ## Example
//!
//! ```
//! use chip_clock::persistence::{MemoryStorage, PersistedState, StateStorage};
//! use chip_clock::settings::AppSettings;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let storage = MemoryStorage::new();
//!     let state = PersistedState {
//!         settings: Some(AppSettings::default()),
//!         ..Default::default()
//!     };
//!     storage.write(&state.to_json().unwrap()).await.unwrap();
//!
//!     let saved = storage.read().await.unwrap().unwrap();
//!     assert_eq!(PersistedState::from_json(&saved).unwrap(), state);
//! });
//! ```

pub mod errors;
pub mod snapshot;
pub mod storage;
pub mod writer;

pub use errors::{PersistenceError, PersistenceResult};
pub use snapshot::PersistedState;
pub use storage::{FileStorage, MemoryStorage, StateStorage};
pub use writer::{PersistenceHandle, spawn_writer};
