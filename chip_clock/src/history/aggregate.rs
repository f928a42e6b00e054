//! Cross-tournament statistics and chart series.

use super::models::SavedTournament;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of players in the per-player series
pub const TOP_PLAYERS: usize = 10;

/// Lifetime figures for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: String,
    /// Name from the player's first listed tournament
    pub name: String,
    pub total_tournaments: u32,
    pub total_entries: u64,
    pub total_profit: f64,
    pub average_profit: f64,
    pub best_position: u32,
    pub worst_position: u32,
    pub win_count: u32,
    /// Percentage of tournaments won
    pub win_rate: f64,
}

/// Leader of a per-player ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHighlight<T> {
    pub name: String,
    pub value: T,
}

/// Figures over the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_tournaments: u32,
    pub total_entries: u64,
    /// Sum of per-tournament player counts (not distinct)
    pub total_players: u64,
    pub unique_players: usize,
    pub total_duration: u64,
    pub average_duration: f64,
    pub average_entries: f64,
    pub most_profitable_player: PlayerHighlight<f64>,
    pub most_frequent_player: PlayerHighlight<u32>,
}

/// One labelled point of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<T> {
    pub name: String,
    pub value: T,
}

/// Per-player running totals in first-appearance order
struct PlayerTotals {
    name: String,
    profit: f64,
    entries: u64,
    appearances: u32,
}

fn totals_by_player(tournaments: &[SavedTournament]) -> Vec<PlayerTotals> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<PlayerTotals> = Vec::new();

    for player in tournaments.iter().flat_map(|t| &t.players) {
        let slot = *index.entry(player.id.as_str()).or_insert_with(|| {
            totals.push(PlayerTotals {
                name: String::new(),
                profit: 0.0,
                entries: 0,
                appearances: 0,
            });
            totals.len() - 1
        });

        let entry = &mut totals[slot];
        // latest listed name wins, matching how the board shows renames
        entry.name = player.name.clone();
        entry.profit += player.profit;
        entry.entries += u64::from(player.entries);
        entry.appearances += 1;
    }

    totals
}

/// Lifetime statistics for `player_id`; `None` if they never played.
pub fn calculate_player_stats(
    player_id: &str,
    tournaments: &[SavedTournament],
) -> Option<PlayerStats> {
    let results: Vec<_> = tournaments
        .iter()
        .filter_map(|t| t.player(player_id))
        .collect();
    let first = results.first()?;

    let total_tournaments = results.len() as u32;
    let total_profit: f64 = results.iter().map(|r| r.profit).sum();
    let win_count = results.iter().filter(|r| r.final_position == 1).count() as u32;

    Some(PlayerStats {
        id: player_id.to_string(),
        name: first.name.clone(),
        total_tournaments,
        total_entries: results.iter().map(|r| u64::from(r.entries)).sum(),
        total_profit,
        average_profit: total_profit / f64::from(total_tournaments),
        best_position: results.iter().map(|r| r.final_position).min()?,
        worst_position: results.iter().map(|r| r.final_position).max()?,
        win_count,
        win_rate: f64::from(win_count) / f64::from(total_tournaments) * 100.0,
    })
}

/// Statistics over every saved tournament; `None` for an empty history.
pub fn calculate_overall_stats(tournaments: &[SavedTournament]) -> Option<OverallStats> {
    if tournaments.is_empty() {
        return None;
    }

    let total_tournaments = tournaments.len() as u32;
    let total_entries: u64 = tournaments.iter().map(|t| t.total_entries).sum();
    let total_duration: u64 = tournaments.iter().map(|t| t.duration).sum();
    let mut totals = totals_by_player(tournaments);
    let unique_players = totals.len();

    totals.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    let most_profitable_player = totals
        .first()
        .map(|t| PlayerHighlight {
            name: t.name.clone(),
            value: t.profit,
        })
        .unwrap_or_else(|| PlayerHighlight {
            name: String::new(),
            value: 0.0,
        });

    // restore first-appearance order so frequency ties resolve the same way
    let mut totals = totals_by_player(tournaments);
    totals.sort_by(|a, b| b.appearances.cmp(&a.appearances));
    let most_frequent_player = totals
        .first()
        .map(|t| PlayerHighlight {
            name: t.name.clone(),
            value: t.appearances,
        })
        .unwrap_or_else(|| PlayerHighlight {
            name: String::new(),
            value: 0,
        });

    Some(OverallStats {
        total_tournaments,
        total_entries,
        total_players: tournaments.iter().map(|t| t.total_players).sum(),
        unique_players,
        total_duration,
        average_duration: total_duration as f64 / f64::from(total_tournaments),
        average_entries: total_entries as f64 / f64::from(total_tournaments),
        most_profitable_player,
        most_frequent_player,
    })
}

fn date_label(tournament: &SavedTournament) -> String {
    tournament.date.format("%-m/%-d/%Y").to_string()
}

fn chronological(tournaments: &[SavedTournament]) -> Vec<&SavedTournament> {
    let mut sorted: Vec<&SavedTournament> = tournaments.iter().collect();
    sorted.sort_by_key(|t| t.date);
    sorted
}

/// Total player profit per tournament, oldest first
pub fn profit_trend(tournaments: &[SavedTournament]) -> Vec<SeriesPoint<f64>> {
    chronological(tournaments)
        .into_iter()
        .map(|t| SeriesPoint {
            name: date_label(t),
            value: t.total_profit(),
        })
        .collect()
}

/// Entries per tournament, oldest first
pub fn entries_trend(tournaments: &[SavedTournament]) -> Vec<SeriesPoint<u64>> {
    chronological(tournaments)
        .into_iter()
        .map(|t| SeriesPoint {
            name: date_label(t),
            value: t.total_entries,
        })
        .collect()
}

/// Top players by lifetime profit, highest first
pub fn profit_by_player(tournaments: &[SavedTournament]) -> Vec<SeriesPoint<f64>> {
    let mut totals = totals_by_player(tournaments);
    totals.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    totals
        .into_iter()
        .take(TOP_PLAYERS)
        .map(|t| SeriesPoint {
            name: t.name,
            value: t.profit,
        })
        .collect()
}

/// Top players by lifetime entries, highest first
pub fn entries_by_player(tournaments: &[SavedTournament]) -> Vec<SeriesPoint<u64>> {
    let mut totals = totals_by_player(tournaments);
    totals.sort_by(|a, b| b.entries.cmp(&a.entries));
    totals
        .into_iter()
        .take(TOP_PLAYERS)
        .map(|t| SeriesPoint {
            name: t.name,
            value: t.entries,
        })
        .collect()
}

/// Tournament count per calendar month (`M/YYYY`), in calendar order
pub fn tournaments_by_month(tournaments: &[SavedTournament]) -> Vec<SeriesPoint<u32>> {
    let mut months: Vec<((i32, u32), u32)> = Vec::new();
    for tournament in tournaments {
        let key = (tournament.date.year(), tournament.date.month());
        match months.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => months.push((key, 1)),
        }
    }

    months.sort_by_key(|(key, _)| *key);
    months
        .into_iter()
        .map(|((year, month), count)| SeriesPoint {
            name: format!("{month}/{year}"),
            value: count,
        })
        .collect()
}

/// Distinct players seen in history as `(id, name)`, in first-appearance order
pub fn known_players(tournaments: &[SavedTournament]) -> Vec<(String, String)> {
    let mut seen = std::collections::HashSet::new();
    tournaments
        .iter()
        .flat_map(|t| &t.players)
        .filter(|p| seen.insert(p.id.as_str()))
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect()
}
