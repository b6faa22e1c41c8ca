use chrono::Duration;
use thiserror::Error;

/// Error for duration string parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("Duration is empty")]
    Empty,

    #[error("Invalid duration amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown duration unit: {0} (expected ms, s, m, h, d or w)")]
    UnknownUnit(String),

    #[error("Duration must be positive: {0}")]
    NotPositive(String),

    #[error("Duration out of range: {0}")]
    OutOfRange(String),
}

/// Parse a compact duration string into a concrete time span.
///
/// Accepts an integer amount followed by an optional unit: `ms`, `s`, `m`, `h`, `d`
/// or `w`. An amount without a unit is read as seconds.
///
/// # Arguments
/// * `input` - Duration string such as `"15m"` or `"7d"`
///
/// # Returns
/// Parsed duration
///
/// # Errors
/// * `Empty` - Input is blank
/// * `InvalidAmount` - Amount is missing or not an integer
/// * `UnknownUnit` - Unit suffix is not recognised
/// * `NotPositive` - Amount is zero
/// * `OutOfRange` - Duration overflows the supported range
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (amount, unit) = input.split_at(split);

    let amount: i64 = amount
        .parse()
        .map_err(|_| DurationError::InvalidAmount(input.to_string()))?;
    if amount == 0 {
        return Err(DurationError::NotPositive(input.to_string()));
    }

    let duration = match unit.trim() {
        "ms" => Duration::try_milliseconds(amount),
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        other => return Err(DurationError::UnknownUnit(other.to_string())),
    };

    duration.ok_or_else(|| DurationError::OutOfRange(input.to_string()))
}
