//! Tournament history: saved records, aggregation and interchange.
//!
//! This module provides:
//! - Freezing a live session into a [`SavedTournament`]
//! - An ordered store of saved tournaments
//! - Per-player and overall statistics plus chart series
//! - CSV export/import and the plain-text summary
//!
//! ## Example
//!
//! ```
//! use chip_clock::history::{HistoryStore, calculate_overall_stats, create_tournament_record};
//! use chip_clock::players::PlayerRoster;
//! use chip_clock::tournament::TournamentSettings;
//! use chrono::Utc;
//!
//! let mut roster = PlayerRoster::new();
//! roster.add_player("Alice".to_string(), 1000, 0, None);
//!
//! let record = create_tournament_record(
//!     &TournamentSettings::default(),
//!     roster.list(),
//!     3600,
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! let mut history = HistoryStore::new();
//! history.save_tournament(record);
//!
//! let overall = calculate_overall_stats(history.list()).unwrap();
//! assert_eq!(overall.total_tournaments, 1);
//! ```

pub mod aggregate;
pub mod csv;
pub mod errors;
pub mod manager;
pub mod models;
pub mod record;
pub mod summary;

pub use aggregate::{
    OverallStats, PlayerHighlight, PlayerStats, SeriesPoint, calculate_overall_stats,
    calculate_player_stats, entries_by_player, entries_trend, known_players, profit_by_player,
    profit_trend, tournaments_by_month,
};
pub use csv::{export_history, import_history_csv};
pub use errors::{HistoryError, HistoryResult};
pub use manager::{HistorySnapshot, HistoryStore};
pub use models::{PlayerResult, SavedTournament, SavedTournamentId};
pub use record::{create_tournament_record, rank_players};
pub use summary::generate_tournament_summary;
