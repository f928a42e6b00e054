//! Snapshot a live session into a [`SavedTournament`].

use super::models::{PlayerResult, SavedTournament};
use crate::{
    players::Player,
    stats::{StatsResult, calculate_cash_equivalent, calculate_statistics},
    tournament::TournamentSettings,
};
use chrono::{DateTime, SubsecRound, Utc};

/// Final standings for the live roster.
///
/// Players are ranked by profit, highest first. Active players are valued at
/// their final chip count (manual override, else live chips); eliminated
/// players hold no chips and lose every entry they bought. Ties keep roster
/// order.
pub fn rank_players(
    settings: &TournamentSettings,
    players: &[Player],
) -> StatsResult<Vec<PlayerResult>> {
    let mut results = players
        .iter()
        .map(|player| {
            let entries = player.entries();
            let entry_cost = settings.entry_fee * f64::from(entries);
            let (final_chips, cash_equivalent) = if player.active {
                let chips = player.final_chips(settings.final_chips_for(&player.id));
                let cash = calculate_cash_equivalent(
                    chips,
                    settings.starting_chips,
                    settings.entry_fee,
                )?;
                (chips, cash)
            } else {
                (0, 0.0)
            };

            Ok(PlayerResult {
                id: player.id.clone(),
                name: player.name.clone(),
                final_position: 0,
                entries,
                final_chips,
                cash_equivalent,
                profit: cash_equivalent - entry_cost,
            })
        })
        .collect::<StatsResult<Vec<_>>>()?;

    results.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    for (index, result) in results.iter_mut().enumerate() {
        result.final_position = index as u32 + 1;
    }
    Ok(results)
}

/// Build the history record for a finished session.
///
/// # Arguments
///
/// * `settings` - Tournament settings, including final chip overrides
/// * `players` - Live roster
/// * `elapsed_time` - Seconds played
/// * `now` - Save time, kept to the millisecond; also the source of the record id
pub fn create_tournament_record(
    settings: &TournamentSettings,
    players: &[Player],
    elapsed_time: u64,
    now: DateTime<Utc>,
) -> StatsResult<SavedTournament> {
    let stats = calculate_statistics(players, settings.entry_fee);
    let now = now.trunc_subsecs(3);

    Ok(SavedTournament {
        id: format!("tournament_{}", now.timestamp_millis()),
        date: now,
        name: settings.name.clone(),
        entry_fee: settings.entry_fee,
        starting_chips: settings.starting_chips,
        total_entries: stats.total_entries,
        total_players: stats.total_players as u64,
        total_prize_pool: stats.total_prize_pool,
        play_with_ante: settings.play_with_ante,
        duration: elapsed_time,
        players: rank_players(settings, players)?,
    })
}
