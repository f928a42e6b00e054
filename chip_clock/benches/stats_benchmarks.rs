use chip_clock::{
    history::{
        PlayerResult, SavedTournament, calculate_overall_stats, calculate_player_stats,
        export_history, import_history_csv, profit_by_player, tournaments_by_month,
    },
    players::Player,
    stats::calculate_statistics,
};
use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Helper to create a roster of N players, every third one busted
fn roster(n_players: usize) -> Vec<Player> {
    (0..n_players)
        .map(|i| {
            let mut player = Player::new(
                format!("p{}", i),
                format!("Player {}", i),
                500 + (i as u64 * 37) % 2000,
                (i % 3) as u32,
            );
            if i % 3 == 0 {
                player.eliminate(1 + (i % 10) as u32);
            }
            player
        })
        .collect()
}

/// Helper to create a history of N tournaments drawn from a pool of 40 regulars
fn history(n_tournaments: usize) -> Vec<SavedTournament> {
    let start = Utc.with_ymd_and_hms(2020, 1, 3, 21, 0, 0).unwrap();
    (0..n_tournaments)
        .map(|t| {
            let players: Vec<PlayerResult> = (0..9)
                .map(|seat| {
                    let regular = (t * 7 + seat * 3) % 40;
                    PlayerResult {
                        id: format!("r{}", regular),
                        name: format!("Regular {}", regular),
                        final_position: seat as u32 + 1,
                        entries: 1 + (seat % 2) as u32,
                        final_chips: 0,
                        cash_equivalent: 0.0,
                        profit: 100.0 - seat as f64 * 25.0,
                    }
                })
                .collect();

            SavedTournament {
                id: format!("tournament_{}", t),
                date: start + Duration::days(7 * t as i64),
                name: format!("Week {}", t),
                entry_fee: 50.0,
                starting_chips: 500,
                total_entries: 13,
                total_players: 9,
                total_prize_pool: 650.0,
                play_with_ante: true,
                duration: 3 * 3600,
                players,
            }
        })
        .collect()
}

fn bench_live_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("live_statistics");

    for n_players in [10, 100, 1000] {
        let players = roster(n_players);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            &players,
            |b, players| b.iter(|| calculate_statistics(black_box(players), 50.0)),
        );
    }

    group.finish();
}

fn bench_history_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_aggregates");

    for n_tournaments in [52, 520] {
        let tournaments = history(n_tournaments);
        let label = format!("{}_tournaments", n_tournaments);

        group.bench_with_input(
            BenchmarkId::new("overall", &label),
            &tournaments,
            |b, t| b.iter(|| calculate_overall_stats(black_box(t))),
        );
        group.bench_with_input(
            BenchmarkId::new("player", &label),
            &tournaments,
            |b, t| b.iter(|| calculate_player_stats(black_box("r7"), black_box(t))),
        );
        group.bench_with_input(
            BenchmarkId::new("profit_by_player", &label),
            &tournaments,
            |b, t| b.iter(|| profit_by_player(black_box(t))),
        );
        group.bench_with_input(
            BenchmarkId::new("by_month", &label),
            &tournaments,
            |b, t| b.iter(|| tournaments_by_month(black_box(t))),
        );
    }

    group.finish();
}

fn bench_csv_interchange(c: &mut Criterion) {
    let tournaments = history(520);
    let csv = export_history(&tournaments);

    c.bench_function("export_history_520", |b| {
        b.iter(|| export_history(black_box(&tournaments)));
    });

    c.bench_function("import_history_520", |b| {
        b.iter(|| import_history_csv(black_box(&csv)));
    });
}

criterion_group!(statistics, bench_live_statistics, bench_history_aggregates);
criterion_group!(interchange, bench_csv_interchange);
criterion_main!(statistics, interchange);
