//! Structured logging for the board.
//!
//! Library crates log through `log`; the subscriber installed here picks
//! those records up alongside the board's own `tracing` events.

use chip_clock::ClockEvent;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,cc_board=info,chip_clock=info";

/// Initialize logging, configurable through `RUST_LOG`.
///
/// Log lines go to stderr so they never interleave with the board output
/// written to stdout.
///
/// # Example
///
/// ```no_run
/// use cc_board::logging;
///
/// logging::init();
/// tracing::info!("Board starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Record a clock event with structured fields
pub fn log_clock_event(event: &ClockEvent) {
    match event {
        ClockEvent::LevelAdvanced { level, blinds, sound } => tracing::info!(
            level = level,
            small_blind = blinds.map(|b| b.small_blind),
            big_blind = blinds.map(|b| b.big_blind),
            sound = sound,
            "Level advanced"
        ),
        ClockEvent::Countdown {
            level,
            seconds,
            sound,
        } => tracing::debug!(level = level, seconds = seconds, sound = sound, "Countdown"),
        ClockEvent::FinalLevelExpired { level, sound } => {
            tracing::warn!(level = level, sound = sound, "Final level expired")
        }
        ClockEvent::StateChanged => tracing::trace!("State changed"),
    }
}

/// Log an operator command that the clock refused
pub fn log_rejected_command(command: &str, reason: &str) {
    tracing::warn!(command = command, reason = reason, "Command rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip_clock::tournament::Blind;

    #[test]
    fn test_log_helpers_without_subscriber() {
        // no subscriber installed: the calls must be harmless
        log_clock_event(&ClockEvent::LevelAdvanced {
            level: 2,
            blinds: Some(Blind::new(2, 4)),
            sound: true,
        });
        log_clock_event(&ClockEvent::StateChanged);
        log_rejected_command("start", "already running");
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
