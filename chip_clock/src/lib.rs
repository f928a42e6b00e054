//! # Chip Clock
//!
//! Scorekeeping for a live home poker tournament: the blind-level clock,
//! the player roster, prize-pool math and a history of finished
//! tournaments.
//!
//! ## Architecture
//!
//! Every store is plain data with synchronous operations. A single
//! [`clock::ClockActor`] task owns the whole [`app::AppState`], applies
//! intents in arrival order, ticks the clock once per second while the
//! tournament runs and hands snapshots to a debounced persistence task.
//!
//! ## Core Modules
//!
//! - [`stats`]: Prize pool, payouts, cash equivalents and display helpers
//! - [`tournament`]: Settings, blind schedule and the level clock
//! - [`players`]: The live roster
//! - [`history`]: Saved tournaments, aggregates, CSV and text exports
//! - [`clock`]: The actor driving the live session
//! - [`persistence`]: The saved blob, storage backends and writer task
//!
//! ## Example
//!
//! ```
//! use chip_clock::app::AppState;
//!
//! let mut app = AppState::new();
//! app.add_player("Alice".to_string(), 1);
//! app.add_player("Bob".to_string(), 2);
//!
//! let stats = app.statistics();
//! assert_eq!(stats.total_entries, 3);
//! assert_eq!(stats.total_prize_pool, 150.0);
//! ```

/// Session controller combining every store.
pub mod app;

/// Clock actor, events and display view.
pub mod clock;

/// Environment configuration.
pub mod config;

/// Saved tournaments and cross-tournament statistics.
pub mod history;

/// Persisted state and storage backends.
pub mod persistence;

/// Player roster.
pub mod players;

/// User preferences.
pub mod settings;

/// Pure statistics engine.
pub mod stats;

/// Tournament settings and clock state machine.
pub mod tournament;

pub use app::AppState;
pub use clock::{ClockActor, ClockEvent, ClockHandle, ClockResponse, ClockView};
pub use config::{ClockConfig, ConfigError};
