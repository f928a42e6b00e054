//! Clock actor message types.

use super::view::ClockView;
use crate::{
    app::AppState,
    history::SavedTournament,
    players::PlayerId,
    settings::AppSettings,
    stats::StatsResult,
    tournament::{Blind, Level, SettingsUpdate},
};
use tokio::sync::{mpsc, oneshot};

/// Subscriber ID type
pub type SubscriberId = u64;

/// Messages that can be sent to a ClockActor
#[derive(Debug)]
pub enum ClockMessage {
    /// Start the tournament clock
    Start {
        response: oneshot::Sender<ClockResponse>,
    },

    Pause {
        response: oneshot::Sender<ClockResponse>,
    },

    Resume {
        response: oneshot::Sender<ClockResponse>,
    },

    /// New tournament: default settings and clock, empty roster
    Reset {
        response: oneshot::Sender<ClockResponse>,
    },

    NextLevel {
        response: oneshot::Sender<ClockResponse>,
    },

    PreviousLevel {
        response: oneshot::Sender<ClockResponse>,
    },

    /// Merge a partial settings update
    UpdateSettings {
        update: SettingsUpdate,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Replace the blind schedule
    UpdateBlindsStructure {
        levels: Vec<Level>,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Append a level escalated from the last one; responds with its id
    AddLevel {
        response: oneshot::Sender<u32>,
    },

    /// Replace the blinds of an existing level
    UpdateLevel {
        level: Level,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Register a player with `entries` entries bought up front
    AddPlayer {
        name: String,
        entries: u32,
        response: oneshot::Sender<PlayerId>,
    },

    Rebuy {
        player_id: PlayerId,
        response: oneshot::Sender<ClockResponse>,
    },

    Eliminate {
        player_id: PlayerId,
        response: oneshot::Sender<ClockResponse>,
    },

    UpdatePlayerChips {
        player_id: PlayerId,
        chips: u64,
        response: oneshot::Sender<ClockResponse>,
    },

    RemovePlayer {
        player_id: PlayerId,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Manual final chip count for an active player
    SetFinalChips {
        player_id: PlayerId,
        chips: u64,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Save the live session to history
    SaveTournament {
        response: oneshot::Sender<StatsResult<SavedTournament>>,
    },

    DeleteTournament {
        id: String,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Merge (or with `replace`, overwrite) history; responds with the
    /// number of records now added
    ImportHistory {
        records: Vec<SavedTournament>,
        replace: bool,
        response: oneshot::Sender<usize>,
    },

    /// Flip sound cues, responding with the new value
    ToggleSound {
        response: oneshot::Sender<bool>,
    },

    UpdateAppSettings {
        settings: AppSettings,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Display figures for the clock
    GetView {
        response: oneshot::Sender<ClockView>,
    },

    /// Copy of the whole session
    GetState {
        response: oneshot::Sender<AppState>,
    },

    /// Subscribe to clock events
    Subscribe {
        subscriber_id: SubscriberId,
        sender: mpsc::Sender<ClockEvent>,
    },

    Unsubscribe { subscriber_id: SubscriberId },

    /// Stop the actor; pending persistence is flushed by the writer
    Shutdown { response: oneshot::Sender<()> },
}

/// Notification pushed to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// A level expired and play moved to `level`
    LevelAdvanced {
        level: u32,
        blinds: Option<Blind>,
        sound: bool,
    },
    /// `seconds` left in the current level
    Countdown { level: u32, seconds: u32, sound: bool },
    /// The last scheduled level ran out
    FinalLevelExpired { level: u32, sound: bool },
    /// Anything else changed; redraw
    StateChanged,
}

/// Response from clock operations
#[derive(Debug, Clone, PartialEq)]
pub enum ClockResponse {
    /// Operation applied
    Success,

    /// Valid request that changed nothing (e.g. pause while paused)
    Unchanged,

    /// Unknown player or saved tournament
    NotFound(String),

    /// Operation rejected
    Error(String),
}

impl ClockResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ClockResponse::Success)
    }

    /// Map a store's "did anything change" flag
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            ClockResponse::Success
        } else {
            ClockResponse::Unchanged
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            ClockResponse::NotFound(id) => Some(format!("Not found: {}", id)),
            ClockResponse::Error(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}
