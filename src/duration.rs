//! Conversions between track lengths and their `M:SS` display form.
//!
//! The graph stores whole seconds. These helpers are only used where a value
//! enters from the command line or leaves for the terminal.

use crate::clients::errors::{Error, Result};

/// Render milliseconds as `M:SS`, dropping the sub-second part.
pub fn format_millis(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}

/// Render whole seconds as `M:SS`.
pub fn format_seconds(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render whole seconds as `"{m} minutes, {s} seconds"`.
pub fn format_verbose(secs: u64) -> String {
    format!("{} minutes, {} seconds", secs / 60, secs % 60)
}

/// Parse a `M:SS` string into total seconds.
///
/// Minutes may have any number of digits. Seconds must be below 60.
pub fn parse_min_sec(input: &str) -> Result<u64> {
    let invalid = || {
        Error::UserInput(format!(
            "'{input}' is not a duration in 'minutes:seconds' form (e.g. 4:00)"
        ))
    };

    let (minutes, seconds) = input.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || !all_digits(seconds) {
        return Err(invalid());
    }

    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
    if seconds >= 60 {
        return Err(invalid());
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(invalid)
}
