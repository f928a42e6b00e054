//! Pure tournament calculations.

use super::errors::{StatsError, StatsResult};
use crate::players::Player;
use serde::{Deserialize, Serialize};

/// Payout percentages keyed by number of paid places (1..=6)
const PAYOUT_TABLE: [&[f64]; 6] = [
    &[100.0],
    &[65.0, 35.0],
    &[50.0, 30.0, 20.0],
    &[45.0, 25.0, 18.0, 12.0],
    &[40.0, 25.0, 15.0, 12.0, 8.0],
    &[35.0, 22.0, 15.0, 12.0, 10.0, 6.0],
];

/// Place count used when the requested count has no table entry
const FALLBACK_PLACES: usize = 3;

/// Live tournament figures derived from the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Initial entries plus rebuys, over every player
    pub total_entries: u64,
    /// Players still in the tournament
    pub active_players: usize,
    /// Everyone on the roster
    pub total_players: usize,
    /// `total_entries × entry_fee`
    pub total_prize_pool: f64,
    /// Mean stack of the active players, rounded
    pub average_chip_stack: u64,
}

/// Calculate live statistics for a roster.
///
/// Entries count every player regardless of status. The average stack only
/// considers active players and is 0 when nobody is left.
pub fn calculate_statistics(players: &[Player], entry_fee: f64) -> Statistics {
    let total_entries: u64 = players.iter().map(|p| u64::from(p.entries())).sum();
    let active: Vec<&Player> = players.iter().filter(|p| p.active).collect();
    let active_players = active.len();

    let average_chip_stack = if active_players > 0 {
        let active_chips: u64 = active.iter().map(|p| p.chips).sum();
        (active_chips as f64 / active_players as f64).round() as u64
    } else {
        0
    };

    Statistics {
        total_entries,
        active_players,
        total_players: players.len(),
        total_prize_pool: total_entries as f64 * entry_fee,
        average_chip_stack,
    }
}

/// Convert a chip count into its cash value relative to the starting stack.
///
/// # Errors
///
/// Returns [`StatsError::ZeroStartingChips`] when `starting_chips` is 0.
pub fn calculate_cash_equivalent(
    chips: u64,
    starting_chips: u64,
    entry_fee: f64,
) -> StatsResult<f64> {
    if starting_chips == 0 {
        return Err(StatsError::ZeroStartingChips);
    }
    Ok(chips as f64 / starting_chips as f64 * entry_fee)
}

/// Payout percentages for a number of paid places.
///
/// Zero is treated as one place; counts beyond the table use the 3-place split.
pub fn payout_percentages(places: u32) -> &'static [f64] {
    let places = places.max(1) as usize;
    PAYOUT_TABLE
        .get(places - 1)
        .copied()
        .unwrap_or(PAYOUT_TABLE[FALLBACK_PLACES - 1])
}

/// Split a prize pool into per-place payouts, first place first.
pub fn calculate_prize_distribution(total_prize_pool: f64, number_of_winners: u32) -> Vec<f64> {
    payout_percentages(number_of_winners)
        .iter()
        .map(|pct| total_prize_pool * pct / 100.0)
        .collect()
}

/// Cash equivalent minus the cost of every entry bought.
///
/// # Errors
///
/// Returns [`StatsError::ZeroStartingChips`] when `starting_chips` is 0.
pub fn calculate_profit(
    chips: u64,
    starting_chips: u64,
    entry_fee: f64,
    entries: u32,
) -> StatsResult<f64> {
    let cash_equivalent = calculate_cash_equivalent(chips, starting_chips, entry_fee)?;
    Ok(cash_equivalent - entry_fee * f64::from(entries))
}
