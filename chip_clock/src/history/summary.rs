//! Plain-text tournament summary export.

use super::record::rank_players;
use crate::{
    players::Player,
    stats::{StatsResult, calculate_prize_distribution, calculate_statistics, format_position},
    tournament::TournamentSettings,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const RULE: &str = "----------------";

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Render the live session as a shareable text report.
///
/// Standings use the same ranking as the saved history record.
pub fn generate_tournament_summary(
    settings: &TournamentSettings,
    players: &[Player],
    now: DateTime<Utc>,
) -> StatsResult<String> {
    let stats = calculate_statistics(players, settings.entry_fee);
    let prizes = calculate_prize_distribution(
        stats.total_prize_pool,
        settings.effective_cashout_places(),
    );
    let standings = rank_players(settings, players)?;

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "Tournament Summary: {}", settings.name);
    let _ = writeln!(out, "Generated: {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Tournament Details:");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Entry Fee: {}", money(settings.entry_fee));
    let _ = writeln!(out, "Starting Chips: {}", settings.starting_chips);
    let _ = writeln!(out, "Total Entries: {}", stats.total_entries);
    let _ = writeln!(out, "Total Players: {}", stats.total_players);
    let _ = writeln!(out, "Active Players: {}", stats.active_players);
    let _ = writeln!(
        out,
        "Play With Ante: {}",
        if settings.play_with_ante { "On" } else { "Off" }
    );
    let _ = writeln!(out, "Prize Pool: {}", money(stats.total_prize_pool));
    let _ = writeln!(out);

    let _ = writeln!(out, "Prize Distribution:");
    let _ = writeln!(out, "{RULE}");
    for (index, prize) in prizes.iter().enumerate() {
        let _ = writeln!(out, "{}: {}", format_position(index as u32 + 1), money(*prize));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Players:");
    let _ = writeln!(out, "{RULE}");
    for result in &standings {
        let active = players
            .iter()
            .find(|p| p.id == result.id)
            .is_some_and(|p| p.active);
        let status = if active {
            format!("Active - {} chips", result.final_chips)
        } else {
            "Eliminated".to_string()
        };
        let _ = writeln!(
            out,
            "{}. {} - {} - {} entries - Profit: {}",
            result.final_position,
            result.name,
            status,
            result.entries,
            money(result.profit)
        );
    }

    Ok(out)
}
