//! Roster store: add, remove, rebuy and eliminate players.

use super::models::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Persisted form of the roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersSnapshot {
    pub list: Vec<Player>,
}

/// Player roster owned by the live session
#[derive(Debug, Clone, Default)]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new active player.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `chips` - Starting stack, usually `starting_chips × entries`
    /// * `rebuys` - Extra entries bought up front
    /// * `id` - Caller-chosen id; a fresh UUID is used when absent or taken
    ///
    /// # Returns
    ///
    /// * `PlayerId` - Id of the new player
    pub fn add_player(
        &mut self,
        name: String,
        chips: u64,
        rebuys: u32,
        id: Option<PlayerId>,
    ) -> PlayerId {
        let id = match id {
            Some(id) if !self.contains(&id) => id,
            Some(taken) => {
                log::warn!("Player id {} already on the roster, assigning a new id", taken);
                Uuid::new_v4().to_string()
            }
            None => Uuid::new_v4().to_string(),
        };

        log::debug!("Adding player {} ({}) with {} chips", name, id, chips);
        self.players.push(Player::new(id.clone(), name, chips, rebuys));
        id
    }

    /// Remove a player unconditionally
    pub fn remove_player(&mut self, id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    /// Record a rebuy: one more entry, more chips, back in the game
    pub fn add_rebuys(&mut self, id: &str, chips_to_add: u64) -> bool {
        match self.get_mut(id) {
            Some(player) => {
                player.rebuy(chips_to_add);
                true
            }
            None => false,
        }
    }

    /// Mark a player as busted at `level`
    pub fn eliminate_player(&mut self, id: &str, level: u32) -> bool {
        match self.get_mut(id) {
            Some(player) => {
                player.eliminate(level);
                true
            }
            None => false,
        }
    }

    /// Overwrite a chip count (manual correction)
    pub fn update_player_chips(&mut self, id: &str, chips: u64) -> bool {
        match self.get_mut(id) {
            Some(player) => {
                player.chips = chips;
                true
            }
            None => false,
        }
    }

    /// Clear the roster
    pub fn reset_players(&mut self) {
        self.players.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Players in insertion order
    pub fn list(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    /// Board ordering: active players by chips (descending), then busted
    /// players by name
    pub fn sorted_for_board(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| match (a.active, b.active) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (true, true) => b.chips.cmp(&a.chips),
            (false, false) => a.name.cmp(&b.name),
        });
        sorted
    }

    /// Copy of the roster for persistence
    pub fn snapshot(&self) -> PlayersSnapshot {
        PlayersSnapshot {
            list: self.players.clone(),
        }
    }

    /// Replace the roster with a persisted one.
    ///
    /// Players whose `active`/`eliminated` flags disagree are normalized from
    /// `eliminated`. Duplicate ids keep their first occurrence.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of records that were dropped
    pub fn restore(&mut self, snapshot: PlayersSnapshot) -> usize {
        let total = snapshot.list.len();
        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(total);

        for mut player in snapshot.list {
            if !seen.insert(player.id.clone()) {
                log::warn!("Dropping duplicate player {} from saved roster", player.id);
                continue;
            }
            if player.active == player.eliminated {
                log::warn!(
                    "Player {} restored with inconsistent status, using eliminated={}",
                    player.id,
                    player.eliminated
                );
                player.active = !player.eliminated;
            }
            players.push(player);
        }

        self.players = players;
        total - self.players.len()
    }
}
