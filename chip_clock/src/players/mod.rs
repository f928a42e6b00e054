//! Player roster for the live tournament.
//!
//! The roster owns every [`Player`] of the running session. Operations on an
//! unknown id are silent no-ops that report `false`; only
//! [`PlayerRoster::add_player`] always succeeds.
//!
//! ## Example
//!
//! ```
//! use chip_clock::players::PlayerRoster;
//!
//! let mut roster = PlayerRoster::new();
//! let id = roster.add_player("Dana".to_string(), 500, 0, None);
//!
//! roster.eliminate_player(&id, 3);
//! roster.add_rebuys(&id, 500);
//!
//! let dana = roster.get(&id).unwrap();
//! assert!(dana.active && !dana.eliminated);
//! assert_eq!(dana.entries(), 2);
//! ```

pub mod manager;
pub mod models;

pub use manager::{PlayerRoster, PlayersSnapshot};
pub use models::{Player, PlayerId};
