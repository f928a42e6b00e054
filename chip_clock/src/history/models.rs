//! Saved tournament records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Saved tournament ID type
pub type SavedTournamentId = String;

/// A player's frozen result inside a saved tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub id: String,
    pub name: String,
    /// 1-based rank
    pub final_position: u32,
    pub entries: u32,
    pub final_chips: u64,
    pub cash_equivalent: f64,
    /// Cash equivalent minus entry costs
    pub profit: f64,
}

/// A completed tournament, detached from the live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTournament {
    pub id: SavedTournamentId,
    pub date: DateTime<Utc>,
    pub name: String,
    pub entry_fee: f64,
    pub starting_chips: u64,
    pub total_entries: u64,
    pub total_players: u64,
    pub total_prize_pool: f64,
    pub play_with_ante: bool,
    /// Seconds of play
    pub duration: u64,
    /// Ordered by final position
    pub players: Vec<PlayerResult>,
}

impl SavedTournament {
    /// Result for one player, if they played
    pub fn player(&self, player_id: &str) -> Option<&PlayerResult> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Sum of every player's profit
    pub fn total_profit(&self) -> f64 {
        self.players.iter().map(|p| p.profit).sum()
    }
}
