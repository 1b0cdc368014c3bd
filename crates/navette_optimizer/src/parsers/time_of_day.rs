use jiff::civil::Time;

/// Parses an `HH:MM:SS` clock time into seconds since midnight.
pub fn parse_seconds(text: &str) -> Option<i64> {
    let time: Time = text.parse().ok()?;
    Some(time.hour() as i64 * 3600 + time.minute() as i64 * 60 + time.second() as i64)
}

/// Formats seconds since midnight as `HH:MM:SS`.
pub fn format_seconds(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
