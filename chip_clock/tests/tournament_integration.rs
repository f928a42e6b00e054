//! End-to-end tournament session tests: from registration to history.

use chip_clock::{
    app::AppState,
    history::{
        calculate_overall_stats, calculate_player_stats, export_history, import_history_csv,
        profit_by_player, tournaments_by_month,
    },
    tournament::{Blind, Level, SettingsUpdate, TickOutcome},
};
use chrono::{DateTime, TimeZone, Utc};

fn evening(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, day, 23, 0, 0).unwrap()
}

/// Play a short three-handed tournament and save it
fn play_night(app: &mut AppState, day: u32, winner_chips: u64) {
    let amy = app.add_player("Amy".to_string(), 1);
    let ben = app.add_player("Ben".to_string(), 1);
    let cal = app.add_player("Cal".to_string(), 1);

    app.tournament.start().unwrap();
    for _ in 0..90 {
        app.tournament.tick();
    }

    app.eliminate(&cal);
    app.rebuy(&cal);
    app.eliminate(&cal);
    app.eliminate(&ben);
    app.set_final_chips(&amy, winner_chips);

    app.save_tournament(evening(day)).unwrap();
    app.reset();
}

#[test]
fn test_full_tournament_flow() {
    let mut app = AppState::new();
    app.tournament
        .update_settings(SettingsUpdate {
            name: Some("Thursday Game".to_string()),
            entry_fee: Some(20.0),
            starting_chips: Some(1000),
            level_duration: Some(15),
            cashout_places: Some(2),
            ..Default::default()
        })
        .unwrap();

    let dee = app.add_player("Dee".to_string(), 1);
    let eli = app.add_player("Eli".to_string(), 2);
    let fay = app.add_player("Fay".to_string(), 1);

    app.tournament.start().unwrap();
    let mut advanced = Vec::new();
    for _ in 0..(15 * 60 * 2) {
        if let TickOutcome::LevelAdvanced { level } = app.tournament.tick() {
            advanced.push(level);
        }
    }
    assert_eq!(advanced, vec![2, 3]);
    assert_eq!(app.tournament.state().elapsed_time, 1800);

    app.eliminate(&fay);
    assert_eq!(app.players.get(&fay).unwrap().eliminated_at, Some(3));

    app.players.update_player_chips(&dee, 2500);
    app.players.update_player_chips(&eli, 1500);

    let stats = app.statistics();
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.active_players, 2);
    assert_eq!(stats.total_prize_pool, 80.0);
    assert_eq!(stats.average_chip_stack, 2000);
    assert_eq!(app.prize_distribution(), vec![52.0, 28.0]);

    let record = app.save_tournament(evening(5)).unwrap();
    assert_eq!(record.name, "Thursday Game");
    assert_eq!(record.duration, 1800);
    assert_eq!(record.total_entries, 4);

    let order: Vec<&str> = record.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, vec!["Dee", "Eli", "Fay"]);
    // 2500 of 1000 at 20 = 50, one entry
    assert_eq!(record.players[0].profit, 30.0);
    // 1500 of 1000 at 20 = 30, two entries
    assert_eq!(record.players[1].profit, -10.0);
    assert_eq!(record.players[2].profit, -20.0);

    let summary = app.summary(evening(5)).unwrap();
    assert!(summary.contains("Tournament Summary: Thursday Game"));
    assert!(summary.contains("1. Dee - Active - 2500 chips - 1 entries - Profit: 30.00"));
}

#[test]
fn test_blind_schedule_edits() {
    let mut app = AppState::new();
    while app.tournament.next_level() {}
    assert_eq!(app.tournament.state().current_level, 13);

    let short = vec![
        Level::new(1, Blind::new(25, 50)),
        Level::new(2, Blind::new(50, 100).with_ante(100)),
    ];
    app.tournament.update_blinds_structure(short).unwrap();
    assert_eq!(app.tournament.state().current_level, 2);

    let duplicate = vec![
        Level::new(1, Blind::new(25, 50)),
        Level::new(1, Blind::new(50, 100)),
    ];
    assert!(app.tournament.update_blinds_structure(duplicate).is_err());
    assert!(app.tournament.update_blinds_structure(Vec::new()).is_err());
    assert_eq!(app.tournament.settings().total_levels(), 2);

    let id = app.tournament.add_level();
    assert_eq!(id, 3);
    let added = app.tournament.settings().level(3).unwrap();
    assert_eq!(added.blinds.small_blind, 63);
    assert_eq!(added.blinds.big_blind, 125);
}

#[test]
fn test_history_across_nights() {
    let mut app = AppState::new();
    play_night(&mut app, 6, 1500);
    play_night(&mut app, 13, 2000);

    assert_eq!(app.history.len(), 2);
    assert_eq!(app.history.list()[0].date, evening(13));

    let names: Vec<(String, String)> = app.history.list()[0]
        .players
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();
    let amy_id = &names[0].0;
    let amy = calculate_player_stats(amy_id, app.history.list());
    // player ids are fresh each night, so this id covers one night only
    assert_eq!(amy.unwrap().total_tournaments, 1);

    let overall = calculate_overall_stats(app.history.list()).unwrap();
    assert_eq!(overall.total_tournaments, 2);
    assert_eq!(overall.total_entries, 8);
    assert_eq!(overall.total_duration, 180);
    assert_eq!(overall.unique_players, 6);
    assert_eq!(overall.most_profitable_player.name, "Amy");

    let months = tournaments_by_month(app.history.list());
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].name, "9/2024");
    assert_eq!(months[0].value, 2);

    let leaders = profit_by_player(app.history.list());
    assert_eq!(leaders[0].name, "Amy");
    assert_eq!(leaders[0].value, 150.0);
}

#[test]
fn test_history_survives_csv_interchange() {
    let mut app = AppState::new();
    play_night(&mut app, 6, 1500);
    play_night(&mut app, 13, 2000);

    let csv = export_history(app.history.list());
    let imported = import_history_csv(&csv).unwrap();

    let mut other = AppState::new();
    assert_eq!(other.history.import_history(imported.clone()), 2);
    assert_eq!(other.history.list(), app.history.list());

    // importing again adds nothing; existing records win
    assert_eq!(other.history.import_history(imported), 0);
    assert!(other.history.delete_tournament(&app.history.list()[1].id));
    assert_eq!(other.history.len(), 1);
}

#[test]
fn test_live_save_survives_csv_interchange() {
    let mut app = AppState::new();
    app.add_player("--- PLAYERS ---".to_string(), 2);
    app.add_player("Dee, \"the Shark\"".to_string(), 1);

    // clock readings carry nanoseconds
    let now = Utc.timestamp_opt(1_720_000_000, 123_456_789).unwrap();
    app.save_tournament(now).unwrap();

    let imported = import_history_csv(&export_history(app.history.list())).unwrap();
    assert_eq!(imported, app.history.list());
}
