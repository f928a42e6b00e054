//! Plain-text rendering of the board.

use chip_clock::{
    AppState, ClockEvent, ClockView,
    history::{OverallStats, PlayerStats, SavedTournament},
    stats::{format_duration, format_percent, format_position},
};
use std::fmt::Write;

/// Terminal bell
const BELL: char = '\u{7}';

/// Clock headline followed by the live figures
pub fn status(view: &ClockView, app: &AppState) -> String {
    let stats = app.statistics();
    let mut out = String::new();

    let _ = writeln!(out, "{}  [{}]", app.tournament.settings().name, view.phase);
    let _ = writeln!(out, "{}", view.headline());
    let _ = writeln!(
        out,
        "Elapsed {}  ({:.0}% of level played)",
        view.formatted_elapsed, view.percent_complete
    );
    if let Some(next) = view.next_blinds {
        let _ = writeln!(out, "Next: {}/{}", next.small_blind, next.big_blind);
    }
    let _ = writeln!(
        out,
        "Players {}/{}  Entries {}  Pool {:.2}  Avg stack {}",
        stats.active_players,
        stats.total_players,
        stats.total_entries,
        stats.total_prize_pool,
        stats.average_chip_stack
    );
    out
}

/// Blind schedule with the level in play marked
pub fn blinds(app: &AppState) -> String {
    let settings = app.tournament.settings();
    let current = app.tournament.state().current_level;

    let mut out = String::new();
    for level in &settings.blinds_structure {
        let marker = if level.id == current { '>' } else { ' ' };
        let ante = level.blinds.effective_ante(settings.play_with_ante);
        let _ = write!(
            out,
            "{} {:>3}. {:>6}/{:<6}",
            marker, level.id, level.blinds.small_blind, level.blinds.big_blind
        );
        if ante > 0 {
            let _ = write!(out, " ante {}", ante);
        }
        out.push('\n');
    }
    out
}

/// Tournament settings as editable with `set`
pub fn settings(app: &AppState) -> String {
    let settings = app.tournament.settings();
    let mut out = String::new();
    let _ = writeln!(out, "name      {}", settings.name);
    let _ = writeln!(out, "fee       {:.2}", settings.entry_fee);
    let _ = writeln!(out, "chips     {}", settings.starting_chips);
    let _ = writeln!(out, "duration  {} min", settings.level_duration);
    let _ = writeln!(out, "places    {}", settings.effective_cashout_places());
    let _ = writeln!(
        out,
        "ante      {}",
        if settings.play_with_ante { "on" } else { "off" }
    );
    out
}

/// Numbered roster in board order; the numbers are what commands accept
pub fn players(app: &AppState) -> String {
    let board = app.players.sorted_for_board();
    if board.is_empty() {
        return "No players yet. Use 'add NAME [ENTRIES]'.\n".to_string();
    }

    let settings = app.tournament.settings();
    let mut out = String::new();
    for (index, player) in board.iter().enumerate() {
        let status = match player.eliminated_at {
            Some(level) if player.eliminated => format!("out (level {level})"),
            _ if player.eliminated => "out".to_string(),
            _ => "active".to_string(),
        };
        let chips = player.final_chips(settings.final_chips_for(&player.id));
        let _ = writeln!(
            out,
            "{:>3}. {:<20} {:<16} {:>8} chips  {} entries",
            index + 1,
            player.name,
            status,
            chips,
            player.entries()
        );
    }
    out
}

/// Payouts for the configured number of paid places
pub fn prizes(app: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prize pool: {:.2}", app.statistics().total_prize_pool);
    for (index, amount) in app.prize_distribution().iter().enumerate() {
        let _ = writeln!(out, "{}: {:.2}", format_position(index as u32 + 1), amount);
    }
    out
}

/// Numbered saved tournaments, newest first
pub fn history(tournaments: &[SavedTournament]) -> String {
    if tournaments.is_empty() {
        return "No saved tournaments.\n".to_string();
    }

    let mut out = String::new();
    for (index, record) in tournaments.iter().enumerate() {
        let winner = record
            .players
            .first()
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{:>3}. {}  {}  {} entries  pool {:.2}  {}  winner: {}",
            index + 1,
            record.date.format("%Y-%m-%d"),
            record.name,
            record.total_entries,
            record.total_prize_pool,
            format_duration(record.duration),
            winner
        );
    }
    out
}

pub fn overall_stats(stats: &OverallStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tournaments:      {}", stats.total_tournaments);
    let _ = writeln!(out, "Total entries:    {}", stats.total_entries);
    let _ = writeln!(out, "Unique players:   {}", stats.unique_players);
    let _ = writeln!(out, "Average entries:  {:.1}", stats.average_entries);
    let _ = writeln!(
        out,
        "Average duration: {}",
        format_duration(stats.average_duration.round() as u64)
    );
    let _ = writeln!(
        out,
        "Most profitable:  {} ({:.2})",
        stats.most_profitable_player.name, stats.most_profitable_player.value
    );
    let _ = writeln!(
        out,
        "Most frequent:    {} ({} tournaments)",
        stats.most_frequent_player.name, stats.most_frequent_player.value
    );
    out
}

pub fn player_stats(stats: &PlayerStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", stats.name);
    let _ = writeln!(
        out,
        "  {} tournaments, {} entries",
        stats.total_tournaments, stats.total_entries
    );
    let _ = writeln!(
        out,
        "  Profit {:.2} total, {:.2} average",
        stats.total_profit, stats.average_profit
    );
    let _ = writeln!(
        out,
        "  Best {}  Worst {}  Wins {} ({})",
        format_position(stats.best_position),
        format_position(stats.worst_position),
        stats.win_count,
        format_percent(stats.win_rate)
    );
    out
}

/// Line announcing a clock event, or `None` for plain redraws.
///
/// Events flagged with `sound` are prefixed with the terminal bell.
pub fn event_line(event: &ClockEvent) -> Option<String> {
    let (text, sound) = match event {
        ClockEvent::LevelAdvanced {
            level,
            blinds,
            sound,
        } => {
            let text = match blinds {
                Some(b) => format!("Level {level}: blinds {}/{}", b.small_blind, b.big_blind),
                None => format!("Level {level}"),
            };
            (text, *sound)
        }
        ClockEvent::Countdown {
            level,
            seconds,
            sound,
        } => (format!("Level {level} ends in {seconds}s"), *sound),
        ClockEvent::FinalLevelExpired { level, sound } => (
            format!("Level {level} was the last scheduled level"),
            *sound,
        ),
        ClockEvent::StateChanged => return None,
    };

    Some(if sound { format!("{BELL}{text}") } else { text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip_clock::tournament::Blind;

    #[test]
    fn test_players_numbered_in_board_order() {
        let mut app = AppState::new();
        app.add_player("Short".to_string(), 1);
        let big = app.add_player("Deep".to_string(), 2);
        app.eliminate(&big);

        let text = players(&app);
        let lines: Vec<&str> = text.lines().collect();
        // active players before eliminated ones
        assert!(lines[0].contains("Short"));
        assert!(lines[1].contains("Deep"));
        assert!(lines[1].contains("out (level 1)"));
    }

    #[test]
    fn test_empty_roster_hint() {
        assert!(players(&AppState::new()).contains("add NAME"));
    }

    #[test]
    fn test_prizes_lists_places() {
        let mut app = AppState::new();
        app.add_player("A".to_string(), 1);
        app.add_player("B".to_string(), 1);

        let text = prizes(&app);
        assert!(text.contains("Prize pool: 100.00"));
        assert!(text.contains("1st: 100.00"));
    }

    #[test]
    fn test_status_includes_headline() {
        let app = AppState::new();
        let view = ClockView::from_tournament(&app.tournament);
        let text = status(&view, &app);
        assert!(text.contains("[idle]"));
        assert!(text.contains("Level 1/"));
        assert!(text.contains("Pool 0.00"));
    }

    #[test]
    fn test_event_line_bell() {
        let loud = ClockEvent::LevelAdvanced {
            level: 2,
            blinds: Some(Blind::new(2, 4)),
            sound: true,
        };
        assert_eq!(
            event_line(&loud),
            Some(format!("{BELL}Level 2: blinds 2/4"))
        );

        let quiet = ClockEvent::Countdown {
            level: 1,
            seconds: 3,
            sound: false,
        };
        assert_eq!(event_line(&quiet), Some("Level 1 ends in 3s".to_string()));
        assert_eq!(event_line(&ClockEvent::StateChanged), None);
    }

    #[test]
    fn test_blinds_marks_current_level() {
        let mut app = AppState::new();
        app.tournament.next_level();

        let text = blinds(&app);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("    1."));
        assert!(lines[1].starts_with(">   2."));
    }

    #[test]
    fn test_settings_listing() {
        let text = settings(&AppState::new());
        assert!(text.contains("fee       50.00"));
        assert!(text.contains("duration  20 min"));
        assert!(text.contains("ante      on"));
    }

    #[test]
    fn test_history_empty() {
        assert_eq!(history(&[]), "No saved tournaments.\n");
    }
}
