//! Session controller owning every store of the live board.

use crate::{
    history::{HistoryStore, SavedTournament, create_tournament_record, generate_tournament_summary},
    persistence::PersistedState,
    players::{PlayerId, PlayerRoster},
    settings::AppSettings,
    stats::{Statistics, StatsResult, calculate_prize_distribution, calculate_statistics},
    tournament::TournamentManager,
};
use chrono::{DateTime, Utc};

/// All state of one board session.
///
/// Intents that touch more than one store (adding a player at the configured
/// stack, saving to history, a full reset) live here so every caller applies
/// them the same way.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tournament: TournamentManager,
    pub players: PlayerRoster,
    pub history: HistoryStore,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted sections.
    ///
    /// Sections are independent: a missing one keeps its defaults and a
    /// tournament section that fails validation is skipped.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        let mut app = Self::new();

        if let Some(snapshot) = persisted.tournament {
            if let Err(e) = app.tournament.restore(snapshot) {
                log::warn!("Ignoring saved tournament: {}", e);
            }
        }
        if let Some(snapshot) = persisted.players {
            app.players.restore(snapshot);
        }
        if let Some(settings) = persisted.settings {
            app.settings = settings;
        }
        if let Some(snapshot) = persisted.history {
            app.history.restore(snapshot);
        }

        log::info!(
            "Restored session: {} players, {} saved tournaments, level {}",
            app.players.len(),
            app.history.len(),
            app.tournament.state().current_level
        );
        app
    }

    /// Every section, ready for storage
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            tournament: Some(self.tournament.snapshot()),
            players: Some(self.players.snapshot()),
            settings: Some(self.settings.clone()),
            history: Some(self.history.snapshot()),
        }
    }

    /// Live figures for the board
    pub fn statistics(&self) -> Statistics {
        calculate_statistics(self.players.list(), self.tournament.settings().entry_fee)
    }

    /// Payouts for the configured number of paid places
    pub fn prize_distribution(&self) -> Vec<f64> {
        calculate_prize_distribution(
            self.statistics().total_prize_pool,
            self.tournament.settings().effective_cashout_places(),
        )
    }

    /// Register a player who bought `entries` entries up front.
    ///
    /// The stack is the starting stack once per entry; zero entries counts
    /// as one.
    pub fn add_player(&mut self, name: String, entries: u32) -> PlayerId {
        let entries = entries.max(1);
        let chips = self.tournament.settings().starting_chips * u64::from(entries);
        self.players.add_player(name, chips, entries - 1, None)
    }

    /// One more entry at the starting stack; revives an eliminated player
    pub fn rebuy(&mut self, player_id: &str) -> bool {
        let chips = self.tournament.settings().starting_chips;
        self.players.add_rebuys(player_id, chips)
    }

    /// Knock a player out at the level in play
    pub fn eliminate(&mut self, player_id: &str) -> bool {
        let level = self.tournament.state().current_level;
        self.players.eliminate_player(player_id, level)
    }

    /// Drop a player and any final chip count entered for them
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        if !self.players.remove_player(player_id) {
            return false;
        }
        let mut final_chips = self.tournament.settings().final_chips.clone();
        if final_chips.remove(player_id).is_some() {
            self.tournament.update_final_chips(final_chips);
        }
        true
    }

    /// Record the final chip count of an active player
    pub fn set_final_chips(&mut self, player_id: &str, chips: u64) -> bool {
        if !self.players.get(player_id).is_some_and(|p| p.active) {
            return false;
        }
        self.tournament.set_final_chips(player_id, chips);
        true
    }

    /// Freeze the session into history and return the saved record
    pub fn save_tournament(&mut self, now: DateTime<Utc>) -> StatsResult<SavedTournament> {
        let record = create_tournament_record(
            self.tournament.settings(),
            self.players.list(),
            self.tournament.state().elapsed_time,
            now,
        )?;
        log::info!(
            "Saving tournament '{}' with {} players to history",
            record.name,
            record.players.len()
        );
        self.history.save_tournament(record.clone());
        Ok(record)
    }

    /// Text report of the live session
    pub fn summary(&self, now: DateTime<Utc>) -> StatsResult<String> {
        generate_tournament_summary(self.tournament.settings(), self.players.list(), now)
    }

    /// New tournament: default settings and clock, empty roster.
    /// History and preferences are kept.
    pub fn reset(&mut self) {
        self.tournament.reset();
        self.players.reset_players();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 22, 0, 0).unwrap()
    }

    #[test]
    fn test_add_player_with_entries() {
        let mut app = AppState::new();
        let id = app.add_player("Ann".to_string(), 3);
        let ann = app.players.get(&id).unwrap();
        assert_eq!(ann.chips, 1500);
        assert_eq!(ann.rebuys, 2);
        assert_eq!(ann.entries(), 3);

        let id = app.add_player("Bo".to_string(), 0);
        assert_eq!(app.players.get(&id).unwrap().entries(), 1);
    }

    #[test]
    fn test_eliminate_at_current_level() {
        let mut app = AppState::new();
        let id = app.add_player("Ann".to_string(), 1);
        app.tournament.next_level();
        app.tournament.next_level();

        assert!(app.eliminate(&id));
        assert_eq!(app.players.get(&id).unwrap().eliminated_at, Some(3));
        assert!(app.rebuy(&id));
        let ann = app.players.get(&id).unwrap();
        assert!(ann.active);
        // elimination leaves the last known stack in place
        assert_eq!(ann.chips, 1000);
    }

    #[test]
    fn test_prize_distribution_uses_cashout_places() {
        let mut app = AppState::new();
        for name in ["A", "B", "C", "D"] {
            app.add_player(name.to_string(), 1);
        }
        assert_eq!(app.prize_distribution(), vec![200.0]);

        app.tournament
            .update_settings(crate::tournament::SettingsUpdate {
                cashout_places: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(app.prize_distribution(), vec![130.0, 70.0]);
    }

    #[test]
    fn test_final_chips_only_for_active_players() {
        let mut app = AppState::new();
        let ann = app.add_player("Ann".to_string(), 1);
        let bo = app.add_player("Bo".to_string(), 1);
        app.eliminate(&bo);

        assert!(app.set_final_chips(&ann, 900));
        assert!(!app.set_final_chips(&bo, 100));
        assert!(!app.set_final_chips("ghost", 100));
        assert_eq!(app.tournament.settings().final_chips_for(&ann), Some(900));

        assert!(app.remove_player(&ann));
        assert_eq!(app.tournament.settings().final_chips_for(&ann), None);
    }

    #[test]
    fn test_save_tournament_records_history() {
        let mut app = AppState::new();
        app.add_player("Ann".to_string(), 1);
        app.tournament.update_elapsed_time(4200);

        let record = app.save_tournament(now()).unwrap();
        assert_eq!(record.duration, 4200);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history.get(&record.id), Some(&record));
    }

    #[test]
    fn test_reset_keeps_history_and_preferences() {
        let mut app = AppState::new();
        app.add_player("Ann".to_string(), 1);
        app.save_tournament(now()).unwrap();
        app.settings.set_sound(false);
        app.tournament.start().unwrap();

        app.reset();
        assert!(app.players.is_empty());
        assert!(!app.tournament.state().is_running);
        assert_eq!(app.history.len(), 1);
        assert!(!app.settings.sound_enabled);
    }

    #[test]
    fn test_persisted_round_trip() {
        let mut app = AppState::new();
        app.add_player("Ann".to_string(), 2);
        app.tournament.start().unwrap();
        app.tournament.tick();
        app.save_tournament(now()).unwrap();
        app.settings.toggle_sound();

        let restored = AppState::from_persisted(app.persisted());
        assert_eq!(restored.players.list(), app.players.list());
        assert_eq!(restored.tournament.state(), app.tournament.state());
        assert_eq!(restored.history.list(), app.history.list());
        assert_eq!(restored.settings, app.settings);
    }

    #[test]
    fn test_invalid_tournament_section_keeps_defaults() {
        let mut snapshot = TournamentManager::new().snapshot();
        snapshot.settings.starting_chips = 0;
        snapshot.state.current_level = 5;

        let app = AppState::from_persisted(PersistedState {
            tournament: Some(snapshot),
            settings: Some(AppSettings::default()),
            ..Default::default()
        });
        assert_eq!(app.tournament.settings().starting_chips, 500);
        assert_eq!(app.tournament.state().current_level, 1);
    }
}
