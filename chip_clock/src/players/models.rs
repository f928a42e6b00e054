//! Player data model.

use serde::{Deserialize, Serialize};

/// Player ID type
pub type PlayerId = String;

/// A player on the live roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Still in the tournament (always the inverse of `eliminated`)
    pub active: bool,
    pub chips: u64,
    /// Re-entries bought after the first entry
    pub rebuys: u32,
    pub eliminated: bool,
    /// Level at which the player busted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eliminated_at: Option<u32>,
}

impl Player {
    /// Create an active player
    pub fn new(id: PlayerId, name: String, chips: u64, rebuys: u32) -> Self {
        Self {
            id,
            name,
            active: true,
            chips,
            rebuys,
            eliminated: false,
            eliminated_at: None,
        }
    }

    /// Initial entry plus rebuys
    pub fn entries(&self) -> u32 {
        self.rebuys + 1
    }

    /// Bust the player at `level`. Re-applying only moves `eliminated_at`.
    pub fn eliminate(&mut self, level: u32) {
        self.active = false;
        self.eliminated = true;
        self.eliminated_at = Some(level);
    }

    /// Buy another entry. A rebuy always brings the player back in.
    pub fn rebuy(&mut self, chips_to_add: u64) {
        self.rebuys += 1;
        self.chips += chips_to_add;
        self.active = true;
        self.eliminated = false;
    }

    /// Chip count used for final standings, honoring a manual override
    pub fn final_chips(&self, override_chips: Option<u64>) -> u64 {
        override_chips.unwrap_or(self.chips)
    }
}
