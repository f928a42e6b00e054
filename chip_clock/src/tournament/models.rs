//! Tournament data models: blind schedule, settings and clock state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blinds for one level of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blind {
    pub small_blind: u64,
    pub big_blind: u64,
    /// Ignored unless the tournament plays with antes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ante: Option<u64>,
}

impl Blind {
    /// Create blinds without an ante
    pub fn new(small_blind: u64, big_blind: u64) -> Self {
        Self {
            small_blind,
            big_blind,
            ante: None,
        }
    }

    /// Create blinds with an ante
    pub fn with_ante(mut self, ante: u64) -> Self {
        self.ante = Some(ante);
        self
    }

    /// Ante actually collected given the tournament's ante mode
    pub fn effective_ante(&self, play_with_ante: bool) -> u64 {
        if play_with_ante {
            self.ante.unwrap_or(0)
        } else {
            0
        }
    }
}

/// One entry in the blind schedule. `id` is both identity and order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub blinds: Blind,
}

impl Level {
    /// Create a level
    pub fn new(id: u32, blinds: Blind) -> Self {
        Self { id, blinds }
    }

    /// Build the level that follows this one: blinds raised by a quarter,
    /// ante matching the big blind when antes are played.
    pub fn escalate(&self, id: u32, play_with_ante: bool) -> Self {
        let small_blind = (self.blinds.small_blind as f64 * 1.25).round() as u64;
        let big_blind = (self.blinds.big_blind as f64 * 1.25).round() as u64;
        let blinds = Blind::new(small_blind, big_blind);

        Self {
            id,
            blinds: if play_with_ante {
                blinds.with_ante(big_blind)
            } else {
                blinds
            },
        }
    }
}

/// Default 13-level home-game schedule (ante equals the big blind)
pub fn default_blinds_structure() -> Vec<Level> {
    [
        (1, 3),
        (2, 5),
        (3, 6),
        (5, 10),
        (5, 15),
        (10, 20),
        (15, 30),
        (20, 40),
        (25, 50),
        (30, 60),
        (35, 70),
        (40, 80),
        (50, 100),
    ]
    .into_iter()
    .zip(1..)
    .map(|((small, big), id)| Level::new(id, Blind::new(small, big).with_ante(big)))
    .collect()
}

/// Longest accepted level, in minutes
pub const MAX_LEVEL_DURATION: u32 = 24 * 60;

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSettings {
    pub name: String,
    /// Price of one entry
    pub entry_fee: f64,
    /// Chips handed out per entry
    pub starting_chips: u64,
    /// Minutes per level
    pub level_duration: u32,
    /// Paid places; values below 1 count as 1
    pub cashout_places: u32,
    pub blinds_structure: Vec<Level>,
    /// Manual final chip counts by player id, entered at the end
    #[serde(default)]
    pub final_chips: HashMap<String, u64>,
    pub play_with_ante: bool,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            name: "Poker Tournament".to_string(),
            entry_fee: 50.0,
            starting_chips: 500,
            level_duration: 20,
            cashout_places: 1,
            blinds_structure: default_blinds_structure(),
            final_chips: HashMap::new(),
            play_with_ante: true,
        }
    }
}

impl TournamentSettings {
    /// Paid places, never less than one
    pub fn effective_cashout_places(&self) -> u32 {
        self.cashout_places.max(1)
    }

    /// Level length in seconds
    pub fn level_duration_secs(&self) -> u32 {
        self.level_duration.saturating_mul(60)
    }

    /// Number of levels in the schedule
    pub fn total_levels(&self) -> u32 {
        self.blinds_structure.len() as u32
    }

    /// Look up a level by id
    pub fn level(&self, id: u32) -> Option<&Level> {
        self.blinds_structure.iter().find(|l| l.id == id)
    }

    /// Final chip override for a player, if one was entered
    pub fn final_chips_for(&self, player_id: &str) -> Option<u64> {
        self.final_chips.get(player_id).copied()
    }
}

/// Partial settings update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub name: Option<String>,
    pub entry_fee: Option<f64>,
    pub starting_chips: Option<u64>,
    pub level_duration: Option<u32>,
    pub cashout_places: Option<u32>,
    pub blinds_structure: Option<Vec<Level>>,
    pub final_chips: Option<HashMap<String, u64>>,
    pub play_with_ante: Option<bool>,
}

/// Clock phase derived from the running/paused flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPhase {
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for ClockPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockPhase::Idle => write!(f, "idle"),
            ClockPhase::Running => write!(f, "running"),
            ClockPhase::Paused => write!(f, "paused"),
        }
    }
}

/// Live clock state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub is_running: bool,
    /// Only meaningful while running
    pub is_paused: bool,
    /// Id of the level being played (1-based)
    pub current_level: u32,
    /// Seconds left in the current level
    pub time_remaining: u32,
    /// Seconds of play since start
    pub elapsed_time: u64,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
}

impl TournamentState {
    /// Idle state at level 1 with a full level on the clock
    pub fn initial(level_duration_secs: u32) -> Self {
        Self {
            is_running: false,
            is_paused: false,
            current_level: 1,
            time_remaining: level_duration_secs,
            elapsed_time: 0,
            start_time: None,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        match (self.is_running, self.is_paused) {
            (false, _) => ClockPhase::Idle,
            (true, false) => ClockPhase::Running,
            (true, true) => ClockPhase::Paused,
        }
    }

    /// True while the clock should be ticking
    pub fn is_ticking(&self) -> bool {
        self.phase() == ClockPhase::Running
    }
}

/// Result of advancing the clock by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock is not running; nothing changed
    Idle,
    /// One second elapsed
    Ticked,
    /// Three seconds left in the level
    Countdown { level: u32 },
    /// Level expired and play moved on
    LevelAdvanced { level: u32 },
    /// Last level expired; the level clock stays at zero
    FinalLevelExpired { level: u32 },
    /// Last level already expired; only elapsed time moves
    Frozen,
}

/// Persisted form of the tournament store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
    pub settings: TournamentSettings,
    pub state: TournamentState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = TournamentSettings::default();
        assert_eq!(settings.name, "Poker Tournament");
        assert_eq!(settings.entry_fee, 50.0);
        assert_eq!(settings.starting_chips, 500);
        assert_eq!(settings.level_duration_secs(), 1200);
        assert_eq!(settings.total_levels(), 13);
        assert!(settings.play_with_ante);
    }

    #[test]
    fn test_default_blinds_structure() {
        let levels = default_blinds_structure();
        assert_eq!(levels[0], Level::new(1, Blind::new(1, 3).with_ante(3)));
        assert_eq!(levels[12], Level::new(13, Blind::new(50, 100).with_ante(100)));
        assert!(levels.windows(2).all(|w| w[1].id == w[0].id + 1));
    }

    #[test]
    fn test_effective_cashout_places() {
        let mut settings = TournamentSettings::default();
        settings.cashout_places = 0;
        assert_eq!(settings.effective_cashout_places(), 1);
        settings.cashout_places = 4;
        assert_eq!(settings.effective_cashout_places(), 4);
    }

    #[test]
    fn test_effective_ante() {
        let blind = Blind::new(5, 10).with_ante(10);
        assert_eq!(blind.effective_ante(true), 10);
        assert_eq!(blind.effective_ante(false), 0);
        assert_eq!(Blind::new(5, 10).effective_ante(true), 0);
    }

    #[test]
    fn test_level_escalate() {
        let level = Level::new(13, Blind::new(50, 100).with_ante(100));
        let next = level.escalate(14, true);
        assert_eq!(next.id, 14);
        assert_eq!(next.blinds, Blind::new(63, 125).with_ante(125));

        assert_eq!(level.escalate(14, false).blinds.ante, None);
    }

    #[test]
    fn test_phase() {
        let mut state = TournamentState::initial(600);
        assert_eq!(state.phase(), ClockPhase::Idle);
        state.is_running = true;
        assert_eq!(state.phase(), ClockPhase::Running);
        state.is_paused = true;
        assert_eq!(state.phase(), ClockPhase::Paused);
        assert!(!state.is_ticking());
    }

    #[test]
    fn test_start_time_serialized_as_millis() {
        let mut state = TournamentState::initial(600);
        state.start_time = DateTime::from_timestamp_millis(1_700_000_000_123);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["startTime"], 1_700_000_000_123i64);
        assert_eq!(json["timeRemaining"], 600);

        let back: TournamentState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
