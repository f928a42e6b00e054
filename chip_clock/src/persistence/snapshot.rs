//! The persisted blob and its section-by-section decoding.

use super::errors::{PersistenceError, PersistenceResult};
use crate::{
    history::HistorySnapshot, players::PlayersSnapshot, settings::AppSettings,
    tournament::TournamentSnapshot,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Everything the board keeps across restarts.
///
/// Each section is optional; a missing or corrupt section does not prevent
/// the others from loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayersSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistorySnapshot>,
}

fn section<T: DeserializeOwned>(blob: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = blob.remove(key)?;
    match serde_json::from_value(value) {
        Ok(section) => Some(section),
        Err(e) => {
            log::warn!("Skipping corrupt '{}' section of saved state: {}", key, e);
            None
        }
    }
}

impl PersistedState {
    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a blob, keeping every section that parses.
    ///
    /// # Errors
    ///
    /// Only when the blob itself is not a JSON object.
    pub fn from_json(data: &str) -> PersistenceResult<Self> {
        let mut blob = match serde_json::from_str::<Value>(data)? {
            Value::Object(map) => map,
            _ => return Err(PersistenceError::NotAnObject),
        };

        Ok(Self {
            tournament: section(&mut blob, "tournament"),
            players: section(&mut blob, "players"),
            settings: section(&mut blob, "settings"),
            history: section(&mut blob, "history"),
        })
    }
}
