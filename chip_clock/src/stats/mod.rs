//! Statistics engine: live tournament figures, cash equivalence, payouts.
//!
//! Every function here is pure. The same numbers feed the live board, the
//! text summary export and the saved history records, so a profit shown on
//! the board is always the profit that ends up in history.
//!
//! ## Example
//!
//! ```
//! use chip_clock::stats::{calculate_prize_distribution, calculate_profit};
//!
//! let payouts = calculate_prize_distribution(1000.0, 3);
//! assert_eq!(payouts, vec![500.0, 300.0, 200.0]);
//!
//! // 1500 chips on a 500 stack at 50 per entry, two entries bought
//! let profit = calculate_profit(1500, 500, 50.0, 2).unwrap();
//! assert_eq!(profit, 50.0);
//! ```

pub mod calculations;
pub mod errors;
pub mod format;

pub use calculations::{
    Statistics, calculate_cash_equivalent, calculate_prize_distribution, calculate_profit,
    calculate_statistics, payout_percentages,
};
pub use errors::{StatsError, StatsResult};
pub use format::{
    format_clock, format_duration, format_elapsed, format_percent, format_position,
    percent_complete,
};
