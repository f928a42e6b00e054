//! Dispatch of prompt commands to the clock actor.

use crate::{
    commands::{Command, HELP, resolve_player, resolve_tournament},
    logging, render,
};
use anyhow::{Context, Result, anyhow, bail};
use chip_clock::{
    ClockHandle, ClockResponse,
    history::{
        calculate_overall_stats, calculate_player_stats, export_history, import_history_csv,
        known_players,
    },
};
use chrono::Utc;

/// Turn a clock response into the line to print
fn describe(command: &str, response: ClockResponse, done: &str) -> Result<String> {
    match response {
        ClockResponse::Success => Ok(done.to_string()),
        ClockResponse::Unchanged => Ok("Nothing changed.".to_string()),
        other => {
            let reason = other
                .error_message()
                .unwrap_or_else(|| "rejected".to_string());
            logging::log_rejected_command(command, &reason);
            bail!(reason)
        }
    }
}

/// Resolve a player reference against the current roster
async fn player_id(clock: &ClockHandle, key: &str) -> Result<String> {
    let state = clock.state().await?;
    resolve_player(&state, key).ok_or_else(|| anyhow!("No player matches '{}'", key))
}

/// Run one command and return the text to show.
///
/// `Quit` is the caller's business and yields an empty string.
pub async fn execute(clock: &ClockHandle, command: Command) -> Result<String> {
    match command {
        Command::Start => describe("start", clock.start().await?, "Clock started."),
        Command::Pause => describe("pause", clock.pause().await?, "Clock paused."),
        Command::Resume => describe("resume", clock.resume().await?, "Clock resumed."),
        Command::Reset => describe("reset", clock.reset().await?, "New tournament ready."),
        Command::Next => {
            let response = clock.next_level().await?;
            let view = clock.view().await?;
            describe("next", response, &view.headline())
        }
        Command::Prev => {
            let response = clock.previous_level().await?;
            let view = clock.view().await?;
            describe("prev", response, &view.headline())
        }

        Command::Set(change) => describe(
            "set",
            clock.update_settings(change.into_update()).await?,
            "Settings updated.",
        ),
        Command::Level(level) => describe(
            "level",
            clock.update_level(level).await?,
            &format!("Level {} updated.", level.id),
        ),
        Command::AddLevel => {
            let id = clock.add_level().await?;
            let state = clock.state().await?;
            match state.tournament.settings().level(id) {
                Some(level) => Ok(format!(
                    "Added level {}: {}/{}.",
                    id, level.blinds.small_blind, level.blinds.big_blind
                )),
                None => Ok(format!("Added level {}.", id)),
            }
        }
        Command::Blinds => Ok(render::blinds(&clock.state().await?)),
        Command::Settings => Ok(render::settings(&clock.state().await?)),

        Command::Add { name, entries } => {
            clock.add_player(name.clone(), entries).await?;
            Ok(format!("Added {} with {} entries.", name, entries.max(1)))
        }
        Command::Rebuy(key) => {
            let id = player_id(clock, &key).await?;
            describe("rebuy", clock.rebuy(id).await?, "Rebuy recorded.")
        }
        Command::Eliminate(key) => {
            let id = player_id(clock, &key).await?;
            describe("elim", clock.eliminate(id).await?, "Player eliminated.")
        }
        Command::Chips { player, chips } => {
            let id = player_id(clock, &player).await?;
            describe(
                "chips",
                clock.update_player_chips(id, chips).await?,
                "Chip count updated.",
            )
        }
        Command::Remove(key) => {
            let id = player_id(clock, &key).await?;
            describe("remove", clock.remove_player(id).await?, "Player removed.")
        }
        Command::FinalChips { player, chips } => {
            let id = player_id(clock, &player).await?;
            describe(
                "final",
                clock.set_final_chips(id, chips).await?,
                "Final chip count recorded.",
            )
        }

        Command::Status => {
            let view = clock.view().await?;
            let state = clock.state().await?;
            Ok(render::status(&view, &state))
        }
        Command::Players => Ok(render::players(&clock.state().await?)),
        Command::Prizes => Ok(render::prizes(&clock.state().await?)),
        Command::Summary => Ok(clock.state().await?.summary(Utc::now())?),

        Command::Save => {
            let record = clock.save_tournament().await??;
            Ok(format!(
                "Saved '{}' with {} players.",
                record.name,
                record.players.len()
            ))
        }
        Command::History => Ok(render::history(clock.state().await?.history.list())),
        Command::Stats(None) => {
            let state = clock.state().await?;
            calculate_overall_stats(state.history.list())
                .map(|stats| render::overall_stats(&stats))
                .ok_or_else(|| anyhow!("No saved tournaments yet"))
        }
        Command::Stats(Some(key)) => {
            let state = clock.state().await?;
            let tournaments = state.history.list();
            let id = known_players(tournaments)
                .into_iter()
                .find(|(id, name)| *id == key || name.eq_ignore_ascii_case(&key))
                .map(|(id, _)| id)
                .ok_or_else(|| anyhow!("No history for '{}'", key))?;
            calculate_player_stats(&id, tournaments)
                .map(|stats| render::player_stats(&stats))
                .ok_or_else(|| anyhow!("No history for '{}'", key))
        }
        Command::Export(path) => {
            let state = clock.state().await?;
            let csv = export_history(state.history.list());
            tokio::fs::write(&path, csv)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!(
                "Exported {} tournaments to {}.",
                state.history.len(),
                path.display()
            ))
        }
        Command::Import { path, replace } => {
            let data = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records = import_history_csv(&data)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            let found = records.len();
            let added = clock.import_history(records, replace).await?;
            Ok(format!("Imported {added} of {found} tournaments."))
        }
        Command::Delete(key) => {
            let state = clock.state().await?;
            let id = resolve_tournament(&state, &key)
                .ok_or_else(|| anyhow!("No saved tournament matches '{}'", key))?;
            describe(
                "delete",
                clock.delete_tournament(id).await?,
                "Tournament deleted.",
            )
        }

        Command::Sound => {
            let enabled = clock.toggle_sound().await?;
            Ok(format!("Sound {}.", if enabled { "on" } else { "off" }))
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}
