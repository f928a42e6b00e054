//! Runtime configuration.
//!
//! Consolidates environment variable reads and validates the result.

use std::{path::PathBuf, time::Duration};

pub const STATE_FILE_VAR: &str = "CHIP_CLOCK_STATE_FILE";
pub const PERSIST_DEBOUNCE_VAR: &str = "CHIP_CLOCK_PERSIST_DEBOUNCE_MS";
pub const EVENT_BUFFER_VAR: &str = "CHIP_CLOCK_EVENT_BUFFER";

pub const DEFAULT_STATE_FILE: &str = "tournament_state.json";
pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Clock runtime configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// Where the persisted blob lives
    pub state_file: PathBuf,
    /// Bursts of changes within this window produce one write
    pub persist_debounce: Duration,
    /// Capacity of each subscriber's event channel
    pub event_buffer: usize,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            persist_debounce: Duration::from_millis(DEFAULT_PERSIST_DEBOUNCE_MS),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ClockConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `state_file_override` - State file path from CLI args
    /// * `debounce_ms_override` - Debounce window from CLI args
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env(
        state_file_override: Option<PathBuf>,
        debounce_ms_override: Option<u64>,
    ) -> Self {
        let state_file = state_file_override
            .or_else(|| std::env::var(STATE_FILE_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let debounce_ms = debounce_ms_override
            .unwrap_or_else(|| parse_env_or(PERSIST_DEBOUNCE_VAR, DEFAULT_PERSIST_DEBOUNCE_MS));

        Self {
            state_file,
            persist_debounce: Duration::from_millis(debounce_ms),
            event_buffer: parse_env_or(EVENT_BUFFER_VAR, DEFAULT_EVENT_BUFFER),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: STATE_FILE_VAR.to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.persist_debounce.is_zero() {
            return Err(ConfigError::Invalid {
                var: PERSIST_DEBOUNCE_VAR.to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: EVENT_BUFFER_VAR.to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
