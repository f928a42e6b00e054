//! History store: the persisted list of completed tournaments.

use super::models::SavedTournament;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persisted form of the history store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub saved_tournaments: Vec<SavedTournament>,
}

/// Completed tournaments, most recent first
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    tournaments: Vec<SavedTournament>,
}

fn sort_newest_first(tournaments: &mut [SavedTournament]) {
    tournaments.sort_by(|a, b| b.date.cmp(&a.date));
}

impl HistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert by id: replace in place, or prepend a new record
    pub fn save_tournament(&mut self, record: SavedTournament) {
        match self.tournaments.iter_mut().find(|t| t.id == record.id) {
            Some(existing) => {
                log::info!("Overwriting saved tournament {}", record.id);
                *existing = record;
            }
            None => {
                log::info!("Saved tournament {} '{}'", record.id, record.name);
                self.tournaments.insert(0, record);
            }
        }
    }

    /// Delete by id
    pub fn delete_tournament(&mut self, id: &str) -> bool {
        let before = self.tournaments.len();
        self.tournaments.retain(|t| t.id != id);
        self.tournaments.len() != before
    }

    /// Merge imported records. Existing ids win; the result is re-sorted by
    /// date, newest first.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of records actually added
    pub fn import_history(&mut self, records: Vec<SavedTournament>) -> usize {
        let mut known: HashSet<String> = self.tournaments.iter().map(|t| t.id.clone()).collect();
        let before = self.tournaments.len();

        for record in records {
            if known.insert(record.id.clone()) {
                self.tournaments.push(record);
            } else {
                log::debug!("Skipping imported tournament {}: id already present", record.id);
            }
        }

        sort_newest_first(&mut self.tournaments);
        self.tournaments.len() - before
    }

    /// Replace everything, sorted by date, newest first
    pub fn replace_history(&mut self, mut records: Vec<SavedTournament>) {
        sort_newest_first(&mut records);
        self.tournaments = records;
    }

    pub fn get(&self, id: &str) -> Option<&SavedTournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }

    pub fn list(&self) -> &[SavedTournament] {
        &self.tournaments
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            saved_tournaments: self.tournaments.clone(),
        }
    }

    /// Load persisted history, keeping the first record of any duplicated id.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of records that were dropped
    pub fn restore(&mut self, snapshot: HistorySnapshot) -> usize {
        let total = snapshot.saved_tournaments.len();
        let mut seen = HashSet::new();
        self.tournaments = snapshot
            .saved_tournaments
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();

        let dropped = total - self.tournaments.len();
        if dropped > 0 {
            log::warn!("Dropped {} duplicate saved tournaments on restore", dropped);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, day: u32, name: &str) -> SavedTournament {
        SavedTournament {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, day, 20, 0, 0).unwrap(),
            name: name.to_string(),
            entry_fee: 50.0,
            starting_chips: 500,
            total_entries: 4,
            total_players: 3,
            total_prize_pool: 200.0,
            play_with_ante: true,
            duration: 3600,
            players: vec![],
        }
    }

    fn ids(store: &HistoryStore) -> Vec<&str> {
        store.list().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_save_prepends_new_records() {
        let mut store = HistoryStore::new();
        store.save_tournament(record("a", 1, "A"));
        store.save_tournament(record("b", 2, "B"));
        assert_eq!(ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_save_replaces_in_place() {
        let mut store = HistoryStore::new();
        store.save_tournament(record("a", 1, "A"));
        store.save_tournament(record("b", 2, "B"));
        store.save_tournament(record("a", 1, "A again"));

        assert_eq!(ids(&store), vec!["b", "a"]);
        assert_eq!(store.get("a").unwrap().name, "A again");
    }

    #[test]
    fn test_delete() {
        let mut store = HistoryStore::new();
        store.save_tournament(record("a", 1, "A"));
        assert!(store.delete_tournament("a"));
        assert!(!store.delete_tournament("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_existing_ids_win() {
        let mut store = HistoryStore::new();
        store.save_tournament(record("a", 5, "first"));
        store.save_tournament(record("b", 1, "B"));

        let added = store.import_history(vec![record("a", 5, "imported"), record("c", 3, "C")]);

        assert_eq!(added, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("a").unwrap().name, "first");
        assert_eq!(ids(&store), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_replace_sorts_by_date() {
        let mut store = HistoryStore::new();
        store.save_tournament(record("old", 1, "old"));
        store.replace_history(vec![record("x", 2, "X"), record("y", 9, "Y")]);
        assert_eq!(ids(&store), vec!["y", "x"]);
    }

    #[test]
    fn test_restore_drops_duplicates() {
        let mut store = HistoryStore::new();
        let dropped = store.restore(HistorySnapshot {
            saved_tournaments: vec![record("a", 1, "first"), record("a", 2, "second")],
        });
        assert_eq!(dropped, 1);
        assert_eq!(store.get("a").unwrap().name, "first");
    }
}
