//! Two-section CSV interchange for tournament history.
//!
//! ```text
//! --- TOURNAMENTS ---
//! id,date,name,entryFee,startingChips,totalEntries,totalPlayers,totalPrizePool,playWithAnte,duration
//! ...
//! --- PLAYERS ---
//! tournamentId,playerId,name,finalPosition,entries,finalChips,cashEquivalent,profit
//! ...
//! ```

use super::{
    errors::{HistoryError, HistoryResult},
    models::{PlayerResult, SavedTournament},
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use std::{fmt::Display, str::FromStr};

pub const TOURNAMENTS_MARKER: &str = "--- TOURNAMENTS ---";
pub const PLAYERS_MARKER: &str = "--- PLAYERS ---";
pub const TOURNAMENTS_HEADER: &str =
    "id,date,name,entryFee,startingChips,totalEntries,totalPlayers,totalPrizePool,playWithAnte,duration";
pub const PLAYERS_HEADER: &str =
    "tournamentId,playerId,name,finalPosition,entries,finalChips,cashEquivalent,profit";

const TOURNAMENT_COLUMNS: usize = 10;
const PLAYER_COLUMNS: usize = 8;

/// Quote a field when it holds a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode the history. An empty history still yields both sections.
pub fn export_history(tournaments: &[SavedTournament]) -> String {
    let mut lines = vec![TOURNAMENTS_MARKER.to_string(), TOURNAMENTS_HEADER.to_string()];

    for t in tournaments {
        lines.push(row(&[
            t.id.clone(),
            t.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            t.name.clone(),
            t.entry_fee.to_string(),
            t.starting_chips.to_string(),
            t.total_entries.to_string(),
            t.total_players.to_string(),
            t.total_prize_pool.to_string(),
            t.play_with_ante.to_string(),
            t.duration.to_string(),
        ]));
    }

    lines.push(PLAYERS_MARKER.to_string());
    lines.push(PLAYERS_HEADER.to_string());

    for t in tournaments {
        for p in &t.players {
            lines.push(row(&[
                t.id.clone(),
                p.id.clone(),
                p.name.clone(),
                p.final_position.to_string(),
                p.entries.to_string(),
                p.final_chips.to_string(),
                p.cash_equivalent.to_string(),
                p.profit.to_string(),
            ]));
        }
    }

    lines.join("\n")
}

/// A decoded record and the line it started on
struct Record {
    line: usize,
    fields: Vec<String>,
    /// Some field was written in quotes
    quoted: bool,
}

/// Split section text into records, honoring quoted fields.
fn parse_records(text: &str, first_line: usize) -> HistoryResult<Vec<Record>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = first_line;
    let mut record_line = first_line;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => in_quotes = false,
            (true, c) => {
                if c == '\n' {
                    line += 1;
                }
                field.push(c);
            }
            (false, '"') if field.is_empty() => {
                in_quotes = true;
                quoted = true;
            }
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (false, '\r') => {}
            (false, '\n') => {
                fields.push(std::mem::take(&mut field));
                if quoted || !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push(Record {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                        quoted,
                    });
                }
                fields.clear();
                quoted = false;
                line += 1;
                record_line = line;
            }
            (false, c) => field.push(c),
        }
    }

    if in_quotes {
        return Err(HistoryError::MalformedRow {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }

    fields.push(field);
    if quoted || !(fields.len() == 1 && fields[0].is_empty()) {
        records.push(Record {
            line: record_line,
            fields,
            quoted,
        });
    }

    Ok(records)
}

fn parse_field<T>(record: &Record, index: usize, column: &str) -> HistoryResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    record.fields[index]
        .parse()
        .map_err(|e| HistoryError::MalformedRow {
            line: record.line,
            reason: format!("{column}: {e}"),
        })
}

fn expect_columns(record: &Record, expected: usize) -> HistoryResult<()> {
    if record.fields.len() != expected {
        return Err(HistoryError::MalformedRow {
            line: record.line,
            reason: format!(
                "expected {expected} columns, found {}",
                record.fields.len()
            ),
        });
    }
    Ok(())
}

fn parse_tournament(record: &Record) -> HistoryResult<SavedTournament> {
    expect_columns(record, TOURNAMENT_COLUMNS)?;

    let date = DateTime::parse_from_rfc3339(&record.fields[1])
        .map_err(|e| HistoryError::MalformedRow {
            line: record.line,
            reason: format!("date: {e}"),
        })?
        .with_timezone(&Utc);

    Ok(SavedTournament {
        id: record.fields[0].clone(),
        date,
        name: record.fields[2].clone(),
        entry_fee: parse_field(record, 3, "entryFee")?,
        starting_chips: parse_field(record, 4, "startingChips")?,
        total_entries: parse_field(record, 5, "totalEntries")?,
        total_players: parse_field(record, 6, "totalPlayers")?,
        total_prize_pool: parse_field(record, 7, "totalPrizePool")?,
        play_with_ante: parse_field(record, 8, "playWithAnte")?,
        duration: parse_field(record, 9, "duration")?,
        players: Vec::new(),
    })
}

fn parse_player(record: &Record) -> HistoryResult<PlayerResult> {
    expect_columns(record, PLAYER_COLUMNS)?;

    Ok(PlayerResult {
        id: record.fields[1].clone(),
        name: record.fields[2].clone(),
        final_position: parse_field(record, 3, "finalPosition")?,
        entries: parse_field(record, 4, "entries")?,
        final_chips: parse_field(record, 5, "finalChips")?,
        cash_equivalent: parse_field(record, 6, "cashEquivalent")?,
        profit: parse_field(record, 7, "profit")?,
    })
}

/// Split records off their header row, which must be present.
fn body(
    mut records: Vec<Record>,
    header: &str,
    section: &'static str,
) -> HistoryResult<Vec<Record>> {
    match records.first() {
        Some(first) if first.fields.join(",") == header => {
            records.remove(0);
            Ok(records)
        }
        _ => Err(HistoryError::MissingHeader(section)),
    }
}

/// True when a record is a bare section marker line
fn is_marker(record: &Record, marker: &str) -> bool {
    !record.quoted && record.fields.len() == 1 && record.fields[0] == marker
}

/// Decode a history previously produced by [`export_history`].
///
/// Section markers are only recognized as whole unquoted lines, so names
/// that happen to contain marker text survive a round trip. Tournaments
/// come back in file order. Player rows naming a tournament that is not in
/// the file are skipped.
pub fn import_history_csv(data: &str) -> HistoryResult<Vec<SavedTournament>> {
    let mut records = parse_records(data, 1)?;

    if records
        .first()
        .is_some_and(|r| is_marker(r, TOURNAMENTS_MARKER))
    {
        records.remove(0);
    }

    let markers: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| is_marker(r, PLAYERS_MARKER))
        .map(|(i, _)| i)
        .collect();
    let &[split] = markers.as_slice() else {
        return Err(HistoryError::SectionCount(markers.len() + 1));
    };

    let mut player_records = records.split_off(split);
    player_records.remove(0);

    let tournament_rows = body(records, TOURNAMENTS_HEADER, "tournaments")?;
    let mut tournaments = tournament_rows
        .iter()
        .map(parse_tournament)
        .collect::<HistoryResult<Vec<_>>>()?;

    let player_rows = body(player_records, PLAYERS_HEADER, "players")?;

    for record in &player_rows {
        let player = parse_player(record)?;
        let tournament_id = &record.fields[0];
        match tournaments.iter_mut().find(|t| &t.id == tournament_id) {
            Some(tournament) => tournament.players.push(player),
            None => warn!(
                "Skipping player {} for unknown tournament {}",
                player.id, tournament_id
            ),
        }
    }

    Ok(tournaments)
}
