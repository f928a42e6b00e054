//! Tournament module: blind schedule, settings and the level clock.
//!
//! This module provides:
//! - Tournament settings with a default 13-level blind structure
//! - The Idle → Running ⇄ Paused state machine
//! - Level navigation bounded by the schedule
//! - One-second clock ticks with level expiry and countdown cues
//!
//! ## Example
//!
//! ```
//! use chip_clock::tournament::{TickOutcome, TournamentManager};
//!
//! let mut tournament = TournamentManager::new();
//! tournament.start().unwrap();
//!
//! tournament.update_time_remaining(1);
//! assert_eq!(tournament.tick(), TickOutcome::LevelAdvanced { level: 2 });
//! ```

pub mod manager;
pub mod models;

pub use manager::{
    COUNTDOWN_THRESHOLD_SECS, TournamentError, TournamentManager, TournamentResult,
    validate_blinds_structure,
};
pub use models::{
    Blind, ClockPhase, Level, MAX_LEVEL_DURATION, SettingsUpdate, TickOutcome,
    TournamentSettings, TournamentSnapshot, TournamentState, default_blinds_structure,
};
