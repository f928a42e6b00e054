//! Clock actor driving the live tournament.
//!
//! This module provides:
//! - A single task that owns the session and serializes every intent
//! - A one-second ticker that only exists while the clock runs
//! - Level, countdown and state-change events for subscribers
//!
//! ## Example
//!
//! ```
//! use chip_clock::{app::AppState, clock::ClockActor};
//!
//! let rt = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//! rt.block_on(async {
//!     let (actor, clock) = ClockActor::new(AppState::new(), None);
//!     tokio::spawn(actor.run());
//!
//!     clock.add_player("Ana".to_string(), 1).await.unwrap();
//!     assert!(clock.start().await.unwrap().is_success());
//!     assert_eq!(clock.view().await.unwrap().formatted_time, "20:00");
//!
//!     clock.shutdown().await.unwrap();
//! });
//! ```

pub mod actor;
pub mod errors;
pub mod messages;
pub mod view;

pub use actor::{ClockActor, ClockHandle};
pub use errors::{ClockError, ClockResult};
pub use messages::{ClockEvent, ClockMessage, ClockResponse, SubscriberId};
pub use view::ClockView;
