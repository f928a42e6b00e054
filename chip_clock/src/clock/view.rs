//! Derived display figures for the clock.

use crate::{
    stats::{format_clock, format_elapsed, percent_complete},
    tournament::{Blind, ClockPhase, TournamentManager},
};
use serde::Serialize;

/// What the board shows for the clock
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockView {
    pub phase: ClockPhase,
    /// Level countdown, `MM:SS`
    pub formatted_time: String,
    /// Time since start, `HH:MM:SS`
    pub formatted_elapsed: String,
    /// Share of the level played, 0 to 100
    pub percent_complete: f64,
    pub current_level: u32,
    pub total_levels: u32,
    pub blinds: Option<Blind>,
    pub next_blinds: Option<Blind>,
    pub play_with_ante: bool,
}

impl ClockView {
    pub fn from_tournament(tournament: &TournamentManager) -> Self {
        let settings = tournament.settings();
        let state = tournament.state();

        Self {
            phase: state.phase(),
            formatted_time: format_clock(state.time_remaining),
            formatted_elapsed: format_elapsed(state.elapsed_time),
            percent_complete: percent_complete(settings.level_duration_secs(), state.time_remaining),
            current_level: state.current_level,
            total_levels: settings.total_levels(),
            blinds: tournament.current_level().map(|l| l.blinds),
            next_blinds: tournament.upcoming_level().map(|l| l.blinds),
            play_with_ante: settings.play_with_ante,
        }
    }

    /// One-line rendering, e.g. `Level 2/13  19:59  5/10 (10)`
    pub fn headline(&self) -> String {
        let blinds = match self.blinds {
            Some(blinds) => {
                let ante = blinds.effective_ante(self.play_with_ante);
                if ante > 0 {
                    format!("{}/{} ({})", blinds.small_blind, blinds.big_blind, ante)
                } else {
                    format!("{}/{}", blinds.small_blind, blinds.big_blind)
                }
            }
            None => "-".to_string(),
        };

        format!(
            "Level {}/{}  {}  {}",
            self.current_level, self.total_levels, self.formatted_time, blinds
        )
    }
}
