//! Parsing and display of audit timestamps on the command line
//!
//! Accepted inputs:
//! - `now`
//! - a raw encoded timestamp (`63871286400000000`)
//! - a relative offset into the past (`30m`, `1h`, `2d`, `1w`)
//! - a date (`2024-01-01`), a datetime (`2024-01-01T12:00:00`) or RFC 3339

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use zenaudit_core::domain::Timestamp;

/// Parses a command-line time argument into an encoded timestamp
pub fn parse_time(input: &str) -> Result<Timestamp> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("now") {
        return Ok(Timestamp::now());
    }

    if let Ok(raw) = input.parse::<i64>() {
        return Ok(Timestamp::from_raw(raw));
    }

    if let Some(duration) = parse_relative_duration(input) {
        let instant = Utc::now()
            .checked_sub_signed(duration)
            .with_context(|| format!("Relative time '{}' is out of range", input))?;
        return Ok(Timestamp::from_datetime(instant));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let datetime = date
            .and_hms_opt(0, 0, 0)
            .context("Failed to create datetime from date")?;
        return Ok(Timestamp::encode(&datetime));
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Timestamp::encode(&datetime));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(Timestamp::from_datetime(datetime.with_timezone(&Utc)));
    }

    anyhow::bail!(
        "Could not parse '{}' as a time. Use 'now', a raw timestamp, relative (1h, 30m, 2d, 1w) or absolute (2024-01-01) format.",
        input
    )
}

/// Parse relative duration strings like "1h", "30m", "2d", "1w"
///
/// Returns `None` for unknown units and for amounts chrono cannot represent.
fn parse_relative_duration(input: &str) -> Option<chrono::Duration> {
    let (split, _) = input.char_indices().last()?;
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().ok()?;

    match unit {
        "m" => chrono::Duration::try_minutes(num),
        "h" => chrono::Duration::try_hours(num),
        "d" => chrono::Duration::try_days(num),
        "w" => chrono::Duration::try_weeks(num),
        _ => None,
    }
}

/// Human-readable form of a timestamp, or the raw value if it does not decode
pub fn format_timestamp(timestamp: Timestamp) -> String {
    match timestamp.to_datetime() {
        Ok(datetime) => datetime.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
