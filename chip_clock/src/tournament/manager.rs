//! Tournament state machine: settings plus the Idle/Running/Paused clock.

use super::models::{
    ClockPhase, Level, MAX_LEVEL_DURATION, SettingsUpdate, TickOutcome, TournamentSettings,
    TournamentSnapshot, TournamentState,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Seconds left in a level when the countdown cue fires
pub const COUNTDOWN_THRESHOLD_SECS: u32 = 3;

/// Tournament errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TournamentError {
    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("Blinds structure must contain at least one level")]
    EmptyBlindsStructure,

    #[error("Duplicate level id in blinds structure: {0}")]
    DuplicateLevelId(u32),

    #[error("Level not found: {0}")]
    LevelNotFound(u32),

    #[error("Tournament not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: ClockPhase,
        actual: ClockPhase,
    },
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Validate a blind schedule: non-empty with unique level ids
pub fn validate_blinds_structure(levels: &[Level]) -> TournamentResult<()> {
    if levels.is_empty() {
        return Err(TournamentError::EmptyBlindsStructure);
    }

    let mut seen = HashSet::new();
    for level in levels {
        if !seen.insert(level.id) {
            return Err(TournamentError::DuplicateLevelId(level.id));
        }
    }

    Ok(())
}

impl TournamentSettings {
    /// Validate settings accepted from user input or storage
    pub fn validate(&self) -> TournamentResult<()> {
        if !self.entry_fee.is_finite() || self.entry_fee <= 0.0 {
            return Err(TournamentError::InvalidSetting {
                field: "entryFee",
                reason: format!("must be greater than 0, got {}", self.entry_fee),
            });
        }

        if self.starting_chips == 0 {
            return Err(TournamentError::InvalidSetting {
                field: "startingChips",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.level_duration == 0 {
            return Err(TournamentError::InvalidSetting {
                field: "levelDuration",
                reason: "must be at least one minute".to_string(),
            });
        }

        if self.level_duration > MAX_LEVEL_DURATION {
            return Err(TournamentError::InvalidSetting {
                field: "levelDuration",
                reason: format!(
                    "must be at most {} minutes, got {}",
                    MAX_LEVEL_DURATION, self.level_duration
                ),
            });
        }

        validate_blinds_structure(&self.blinds_structure)
    }
}

/// Owner of the tournament settings and clock state
#[derive(Debug, Clone)]
pub struct TournamentManager {
    settings: TournamentSettings,
    state: TournamentState,
}

impl Default for TournamentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentManager {
    /// Create a manager with default settings, idle at level 1
    pub fn new() -> Self {
        let settings = TournamentSettings::default();
        let state = TournamentState::initial(settings.level_duration_secs());
        Self { settings, state }
    }

    /// Create a manager from validated settings
    pub fn with_settings(settings: TournamentSettings) -> TournamentResult<Self> {
        settings.validate()?;
        let state = TournamentState::initial(settings.level_duration_secs());
        Ok(Self { settings, state })
    }

    pub fn settings(&self) -> &TournamentSettings {
        &self.settings
    }

    pub fn state(&self) -> &TournamentState {
        &self.state
    }

    pub fn phase(&self) -> ClockPhase {
        self.state.phase()
    }

    /// Level currently in play
    pub fn current_level(&self) -> Option<&Level> {
        self.settings.level(self.state.current_level)
    }

    /// Level that follows the current one, if scheduled
    pub fn upcoming_level(&self) -> Option<&Level> {
        self.settings.level(self.state.current_level + 1)
    }

    /// Start the clock. Only valid from Idle.
    pub fn start(&mut self) -> TournamentResult<()> {
        let actual = self.phase();
        if actual != ClockPhase::Idle {
            return Err(TournamentError::InvalidState {
                expected: ClockPhase::Idle,
                actual,
            });
        }

        self.state.is_running = true;
        self.state.is_paused = false;
        self.state.start_time = Some(Utc::now());
        log::info!(
            "Tournament '{}' started at level {}",
            self.settings.name,
            self.state.current_level
        );
        Ok(())
    }

    /// Pause a running clock. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.phase() != ClockPhase::Running {
            return false;
        }
        self.state.is_paused = true;
        true
    }

    /// Resume a paused clock. Returns whether anything changed.
    pub fn resume(&mut self) -> bool {
        if self.phase() != ClockPhase::Paused {
            return false;
        }
        self.state.is_paused = false;
        true
    }

    /// Full reset: default settings (including the blind schedule and name)
    /// and an idle clock at level 1.
    pub fn reset(&mut self) {
        *self = Self::new();
        log::info!("Tournament reset to defaults");
    }

    /// Move to the next level if one exists
    pub fn next_level(&mut self) -> bool {
        self.go_to_level(self.state.current_level + 1)
    }

    /// Move back one level if possible
    pub fn previous_level(&mut self) -> bool {
        match self.state.current_level.checked_sub(1) {
            Some(target) => self.go_to_level(target),
            None => false,
        }
    }

    fn go_to_level(&mut self, target: u32) -> bool {
        if target < 1 || target > self.settings.total_levels() {
            return false;
        }
        self.state.current_level = target;
        self.state.time_remaining = self.settings.level_duration_secs();
        true
    }

    /// Merge a partial settings update.
    ///
    /// The merged settings are validated before anything is applied. When
    /// `level_duration` is part of the update the level clock restarts from
    /// the new duration, even mid-level.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> TournamentResult<()> {
        let restart_clock = update.level_duration.is_some();
        let mut merged = self.settings.clone();

        if let Some(name) = update.name {
            merged.name = name;
        }
        if let Some(entry_fee) = update.entry_fee {
            merged.entry_fee = entry_fee;
        }
        if let Some(starting_chips) = update.starting_chips {
            merged.starting_chips = starting_chips;
        }
        if let Some(level_duration) = update.level_duration {
            merged.level_duration = level_duration;
        }
        if let Some(cashout_places) = update.cashout_places {
            merged.cashout_places = cashout_places;
        }
        if let Some(blinds_structure) = update.blinds_structure {
            merged.blinds_structure = blinds_structure;
        }
        if let Some(final_chips) = update.final_chips {
            merged.final_chips = final_chips;
        }
        if let Some(play_with_ante) = update.play_with_ante {
            merged.play_with_ante = play_with_ante;
        }

        merged.validate()?;
        self.settings = merged;
        self.clamp_current_level();

        if restart_clock {
            self.state.time_remaining = self.settings.level_duration_secs();
        }
        Ok(())
    }

    /// Replace the blind schedule wholesale.
    ///
    /// A schedule shorter than the level in play pulls `current_level` back
    /// to the last scheduled level; the level clock is left alone.
    pub fn update_blinds_structure(&mut self, levels: Vec<Level>) -> TournamentResult<()> {
        validate_blinds_structure(&levels)?;
        self.settings.blinds_structure = levels;
        self.clamp_current_level();
        Ok(())
    }

    /// Append a level escalated from the last one. Returns the new level id.
    pub fn add_level(&mut self) -> u32 {
        let next_id = self
            .settings
            .blinds_structure
            .iter()
            .map(|l| l.id)
            .max()
            .unwrap_or(0)
            + 1;

        let level = match self.settings.blinds_structure.last() {
            Some(last) => last.escalate(next_id, self.settings.play_with_ante),
            None => super::models::default_blinds_structure()[0],
        };
        self.settings.blinds_structure.push(level);
        next_id
    }

    /// Replace the blinds of one level
    pub fn update_level(&mut self, level: Level) -> TournamentResult<()> {
        let slot = self
            .settings
            .blinds_structure
            .iter_mut()
            .find(|l| l.id == level.id)
            .ok_or(TournamentError::LevelNotFound(level.id))?;
        *slot = level;
        Ok(())
    }

    /// Replace all final chip overrides
    pub fn update_final_chips(&mut self, final_chips: HashMap<String, u64>) {
        self.settings.final_chips = final_chips;
    }

    /// Set the final chip override for one player
    pub fn set_final_chips(&mut self, player_id: &str, chips: u64) {
        self.settings.final_chips.insert(player_id.to_string(), chips);
    }

    pub fn update_time_remaining(&mut self, seconds: u32) {
        self.state.time_remaining = seconds;
    }

    pub fn update_elapsed_time(&mut self, seconds: u64) {
        self.state.elapsed_time = seconds;
    }

    /// Advance the clock by one second.
    ///
    /// Elapsed time always moves while running. A level with one second or
    /// less left expires into the next level; on the last level the clock
    /// freezes at zero and the expiry is reported once.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_ticking() {
            return TickOutcome::Idle;
        }

        self.state.elapsed_time += 1;

        if self.state.time_remaining <= 1 {
            if self.next_level() {
                return TickOutcome::LevelAdvanced {
                    level: self.state.current_level,
                };
            }

            let was_counting = self.state.time_remaining > 0;
            self.state.time_remaining = 0;
            return if was_counting {
                log::info!(
                    "Final level {} expired, holding the clock",
                    self.state.current_level
                );
                TickOutcome::FinalLevelExpired {
                    level: self.state.current_level,
                }
            } else {
                TickOutcome::Frozen
            };
        }

        self.state.time_remaining -= 1;
        if self.state.time_remaining == COUNTDOWN_THRESHOLD_SECS {
            TickOutcome::Countdown {
                level: self.state.current_level,
            }
        } else {
            TickOutcome::Ticked
        }
    }

    /// Copy of settings and state for persistence
    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot {
            settings: self.settings.clone(),
            state: self.state.clone(),
        }
    }

    /// Load a persisted snapshot.
    ///
    /// Invalid settings are rejected and leave the manager untouched. A
    /// paused flag without a running clock is cleared, the level is clamped
    /// into the schedule and `time_remaining` is capped at one full level.
    pub fn restore(&mut self, snapshot: TournamentSnapshot) -> TournamentResult<()> {
        let TournamentSnapshot {
            settings,
            mut state,
        } = snapshot;
        settings.validate()?;

        if !state.is_running {
            state.is_paused = false;
        }
        state.time_remaining = state.time_remaining.min(settings.level_duration_secs());

        self.settings = settings;
        self.state = state;
        self.clamp_current_level();
        Ok(())
    }

    fn clamp_current_level(&mut self) {
        let total = self.settings.total_levels();
        let clamped = self.state.current_level.clamp(1, total.max(1));
        if clamped != self.state.current_level {
            log::warn!(
                "Current level {} outside schedule of {} levels, moving to {}",
                self.state.current_level,
                total,
                clamped
            );
            self.state.current_level = clamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::models::Blind;

    fn running() -> TournamentManager {
        let mut manager = TournamentManager::new();
        manager.start().unwrap();
        manager
    }

    fn short_schedule(n: u32) -> Vec<Level> {
        (1..=n)
            .map(|id| Level::new(id, Blind::new(u64::from(id), u64::from(id) * 2)))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let manager = TournamentManager::new();
        assert_eq!(manager.phase(), ClockPhase::Idle);
        assert_eq!(manager.state().current_level, 1);
        assert_eq!(manager.state().time_remaining, 1200);
        assert_eq!(manager.state().start_time, None);
    }

    #[test]
    fn test_start_pause_resume() {
        let mut manager = TournamentManager::new();
        assert!(!manager.pause());
        assert!(!manager.resume());

        manager.start().unwrap();
        assert_eq!(manager.phase(), ClockPhase::Running);
        assert!(manager.state().start_time.is_some());

        assert!(manager.pause());
        assert!(!manager.pause());
        assert_eq!(manager.phase(), ClockPhase::Paused);

        assert!(manager.resume());
        assert_eq!(manager.phase(), ClockPhase::Running);
    }

    #[test]
    fn test_start_requires_idle() {
        let mut manager = running();
        let err = manager.start().unwrap_err();
        assert_eq!(
            err,
            TournamentError::InvalidState {
                expected: ClockPhase::Idle,
                actual: ClockPhase::Running,
            }
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut manager = running();
        manager
            .update_settings(SettingsUpdate {
                name: Some("Friday".to_string()),
                level_duration: Some(10),
                ..Default::default()
            })
            .unwrap();
        manager.update_blinds_structure(short_schedule(3)).unwrap();
        manager.next_level();

        manager.reset();

        assert_eq!(manager.phase(), ClockPhase::Idle);
        assert_eq!(manager.settings(), &TournamentSettings::default());
        assert_eq!(manager.state().current_level, 1);
        assert_eq!(manager.state().time_remaining, 1200);
    }

    #[test]
    fn test_level_navigation_bounds() {
        let mut manager = TournamentManager::new();
        assert!(!manager.previous_level());
        assert_eq!(manager.state().current_level, 1);

        for _ in 0..20 {
            manager.next_level();
        }
        assert_eq!(manager.state().current_level, 13);
        assert!(!manager.next_level());
        assert_eq!(manager.state().current_level, 13);
    }

    #[test]
    fn test_level_change_resets_clock() {
        let mut manager = TournamentManager::new();
        manager.update_time_remaining(17);
        assert!(manager.next_level());
        assert_eq!(manager.state().time_remaining, 1200);

        manager.update_time_remaining(5);
        assert!(manager.previous_level());
        assert_eq!(manager.state().time_remaining, 1200);
    }

    #[test]
    fn test_update_settings_restarts_clock_on_duration_change() {
        let mut manager = running();
        manager.update_time_remaining(100);

        manager
            .update_settings(SettingsUpdate {
                name: Some("No clock change".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(manager.state().time_remaining, 100);

        manager
            .update_settings(SettingsUpdate {
                level_duration: Some(15),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(manager.state().time_remaining, 900);
        assert_eq!(manager.settings().name, "No clock change");
    }

    #[test]
    fn test_update_settings_rejects_invalid_values() {
        let mut manager = TournamentManager::new();

        let err = manager
            .update_settings(SettingsUpdate {
                starting_chips: Some(0),
                name: Some("ignored".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidSetting {
                field: "startingChips",
                ..
            }
        ));
        assert_eq!(manager.settings().name, "Poker Tournament");

        assert!(
            manager
                .update_settings(SettingsUpdate {
                    entry_fee: Some(0.0),
                    ..Default::default()
                })
                .is_err()
        );
        assert!(
            manager
                .update_settings(SettingsUpdate {
                    level_duration: Some(0),
                    ..Default::default()
                })
                .is_err()
        );
    }

    #[test]
    fn test_oversized_level_duration_rejected() {
        let mut manager = TournamentManager::new();

        let err = manager
            .update_settings(SettingsUpdate {
                level_duration: Some(80_000_000),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidSetting {
                field: "levelDuration",
                ..
            }
        ));
        assert_eq!(manager.settings().level_duration, 20);

        manager
            .update_settings(SettingsUpdate {
                level_duration: Some(MAX_LEVEL_DURATION),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(manager.state().time_remaining, MAX_LEVEL_DURATION * 60);
    }

    #[test]
    fn test_level_duration_secs_saturates() {
        let settings = TournamentSettings {
            level_duration: u32::MAX,
            ..Default::default()
        };
        assert_eq!(settings.level_duration_secs(), u32::MAX);
    }

    #[test]
    fn test_update_blinds_structure_validation() {
        let mut manager = TournamentManager::new();
        assert_eq!(
            manager.update_blinds_structure(vec![]),
            Err(TournamentError::EmptyBlindsStructure)
        );

        let mut dupes = short_schedule(2);
        dupes[1].id = 1;
        assert_eq!(
            manager.update_blinds_structure(dupes),
            Err(TournamentError::DuplicateLevelId(1))
        );
    }

    #[test]
    fn test_shorter_structure_clamps_current_level() {
        let mut manager = running();
        for _ in 0..9 {
            manager.next_level();
        }
        assert_eq!(manager.state().current_level, 10);
        manager.update_time_remaining(321);

        manager.update_blinds_structure(short_schedule(4)).unwrap();
        assert_eq!(manager.state().current_level, 4);
        assert_eq!(manager.state().time_remaining, 321);
    }

    #[test]
    fn test_add_and_update_level() {
        let mut manager = TournamentManager::new();
        let id = manager.add_level();
        assert_eq!(id, 14);
        assert_eq!(manager.settings().total_levels(), 14);

        let custom = Level::new(14, Blind::new(60, 120).with_ante(120));
        manager.update_level(custom).unwrap();
        assert_eq!(manager.settings().level(14), Some(&custom));

        assert_eq!(
            manager.update_level(Level::new(99, Blind::new(1, 2))),
            Err(TournamentError::LevelNotFound(99))
        );
    }

    #[test]
    fn test_final_chips_overrides() {
        let mut manager = TournamentManager::new();
        manager.set_final_chips("p1", 1200);
        assert_eq!(manager.settings().final_chips_for("p1"), Some(1200));

        manager.update_final_chips(HashMap::new());
        assert_eq!(manager.settings().final_chips_for("p1"), None);
    }

    #[test]
    fn test_tick_idle_and_paused() {
        let mut manager = TournamentManager::new();
        assert_eq!(manager.tick(), TickOutcome::Idle);
        assert_eq!(manager.state().elapsed_time, 0);

        manager.start().unwrap();
        manager.pause();
        assert_eq!(manager.tick(), TickOutcome::Idle);
        assert_eq!(manager.state().time_remaining, 1200);
    }

    #[test]
    fn test_tick_countdown_then_advance() {
        let mut manager = running();
        manager.update_time_remaining(5);

        assert_eq!(manager.tick(), TickOutcome::Ticked);
        assert_eq!(manager.tick(), TickOutcome::Countdown { level: 1 });
        assert_eq!(manager.tick(), TickOutcome::Ticked);
        assert_eq!(manager.tick(), TickOutcome::Ticked);
        assert_eq!(manager.state().time_remaining, 1);
        assert_eq!(manager.tick(), TickOutcome::LevelAdvanced { level: 2 });

        assert_eq!(manager.state().current_level, 2);
        assert_eq!(manager.state().time_remaining, 1200);
        assert_eq!(manager.state().elapsed_time, 5);
    }

    #[test]
    fn test_tick_freezes_on_final_level() {
        let mut manager = running();
        manager.update_blinds_structure(short_schedule(1)).unwrap();
        manager.update_time_remaining(1);

        assert_eq!(manager.tick(), TickOutcome::FinalLevelExpired { level: 1 });
        assert_eq!(manager.state().time_remaining, 0);
        assert_eq!(manager.tick(), TickOutcome::Frozen);
        assert_eq!(manager.tick(), TickOutcome::Frozen);
        assert_eq!(manager.state().time_remaining, 0);
        assert_eq!(manager.state().elapsed_time, 3);
    }

    #[test]
    fn test_restore_validates() {
        let mut manager = TournamentManager::new();
        let mut snapshot = manager.snapshot();
        snapshot.settings.blinds_structure.clear();
        assert!(manager.restore(snapshot).is_err());
        assert_eq!(manager.settings().total_levels(), 13);
    }

    #[test]
    fn test_restore_rejects_oversized_level_duration() {
        let mut manager = TournamentManager::new();
        let mut snapshot = manager.snapshot();
        snapshot.settings.level_duration = 80_000_000;
        assert!(manager.restore(snapshot).is_err());
        assert_eq!(manager.settings().level_duration, 20);
    }

    #[test]
    fn test_restore_normalizes_state() {
        let mut manager = TournamentManager::new();
        let mut snapshot = manager.snapshot();
        snapshot.settings.level_duration = 10;
        snapshot.state.is_paused = true;
        snapshot.state.current_level = 40;
        snapshot.state.time_remaining = 5000;

        manager.restore(snapshot).unwrap();
        assert_eq!(manager.phase(), ClockPhase::Idle);
        assert!(!manager.state().is_paused);
        assert_eq!(manager.state().current_level, 13);
        assert_eq!(manager.state().time_remaining, 600);
    }
}
