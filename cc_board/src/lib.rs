//! Terminal board for a live poker tournament.
//!
//! This library provides the prompt command parser, text rendering and the
//! command dispatcher used by the `cc_board` binary. The clock itself lives
//! in `chip_clock`.

pub mod board;
pub mod commands;
pub mod logging;
pub mod render;
