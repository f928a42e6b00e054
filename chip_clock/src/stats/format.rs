//! Display helpers for clock and statistics figures.

/// Format a level countdown as `MM:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format total elapsed time as `HH:MM:SS`
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds % 60)
}

/// Format a tournament duration compactly: `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Ordinal finishing position (`1st`, `2nd`, `3rd`, `4th`, ...)
///
/// Only 1 to 3 get their own suffix; everything else takes `th`, so 21 reads
/// `21th`. Stored history and exported labels use this form, keep it stable.
pub fn format_position(position: u32) -> String {
    match position {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

/// Percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Share of the current level already played, clamped to `[0, 100]`.
///
/// A stale `time_remaining` (e.g. restored from storage after the level
/// duration was shortened) would otherwise push the bar past either end.
pub fn percent_complete(level_duration_secs: u32, time_remaining: u32) -> f64 {
    if level_duration_secs == 0 {
        return 100.0;
    }
    let total = f64::from(level_duration_secs);
    ((total - f64::from(time_remaining)) / total * 100.0).clamp(0.0, 100.0)
}
