//! Compact duration tokens.
//!
//! Son delays and stats timeframes use the compact form the management
//! UI emits: a positive integer followed by a unit (`30m`, `2h`, `1d`,
//! `1w`). Parsing is strict: no fractions, no negatives, no locale.

use std::time::Duration;

/// Seconds per unit.
const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Timeframe tokens accepted by the stats endpoint.
pub const STATS_TIMEFRAMES: &[&str] = &["1h", "6h", "12h", "24h", "168h"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration format: {0:?}")]
    InvalidFormat(String),

    #[error("invalid stats timeframe: {0:?} (expected one of 1h, 6h, 12h, 24h, 168h)")]
    InvalidTimeframe(String),
}

/// Parse a compact duration token (`^(\d+)\s*(s|m|h|d|w)$`) into a
/// duration.
///
/// Any other shape fails with [`DurationError::InvalidFormat`],
/// including empty, negative, fractional, and unit-less input.
pub fn parse_duration(token: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::InvalidFormat(token.to_string());

    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    if digits_end == 0 {
        return Err(invalid());
    }

    let value: u64 = token[..digits_end].parse().map_err(|_| invalid())?;

    let rest = token[digits_end..].trim_start();
    let per_unit = match rest {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        _ => return Err(invalid()),
    };

    // A value large enough to overflow seconds is as invalid as a bad unit.
    let secs = value.checked_mul(per_unit).ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}

/// Render a duration as a compact token using the largest unit that
/// divides it exactly.
///
/// The output always re-parses to the same duration, so
/// `parse(format(parse(s))) == parse(s)` for every valid token.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }
    if secs % WEEK == 0 {
        format!("{}w", secs / WEEK)
    } else if secs % DAY == 0 {
        format!("{}d", secs / DAY)
    } else if secs % HOUR == 0 {
        format!("{}h", secs / HOUR)
    } else if secs % MINUTE == 0 {
        format!("{}m", secs / MINUTE)
    } else {
        format!("{secs}s")
    }
}

/// Parse a stats timeframe token, restricted to [`STATS_TIMEFRAMES`].
pub fn parse_timeframe(token: &str) -> Result<Duration, DurationError> {
    if !STATS_TIMEFRAMES.contains(&token) {
        return Err(DurationError::InvalidTimeframe(token.to_string()));
    }
    parse_duration(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_duration ------------------------------------------------------

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration("45s"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_duration("30m"), Ok(Duration::from_secs(1800)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
        assert_eq!(parse_duration("1d"), Ok(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("1w"), Ok(Duration::from_secs(604_800)));
    }

    #[test]
    fn allows_space_before_unit() {
        assert_eq!(parse_duration("30 m"), Ok(Duration::from_secs(1800)));
    }

    #[test]
    fn zero_is_valid() {
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "",
            "5x",
            "-3m",
            "m",
            "3.5h",
            "30",
            "h30",
            "30mm",
            " 30m",
            // u64::MAX minutes overflows the seconds computation.
            "18446744073709551615m",
        ] {
            assert_eq!(
                parse_duration(bad),
                Err(DurationError::InvalidFormat(bad.to_string())),
                "expected {bad:?} to be rejected",
            );
        }
    }

    // -- format_duration -----------------------------------------------------

    #[test]
    fn formats_largest_exact_unit() {
        assert_eq!(format_duration(Duration::from_secs(604_800)), "1w");
        assert_eq!(format_duration(Duration::from_secs(86_400)), "1d");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
        assert_eq!(format_duration(Duration::from_secs(1800)), "30m");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn ninety_minutes_stays_in_minutes() {
        assert_eq!(format_duration(Duration::from_secs(5400)), "90m");
    }

    #[test]
    fn round_trip_is_stable() {
        for token in ["30m", "2h", "1d", "1w", "90m", "48h", "0s", "7d"] {
            let once = parse_duration(token).unwrap();
            let twice = parse_duration(&format_duration(once)).unwrap();
            assert_eq!(once, twice, "round trip changed value for {token:?}");
        }
    }

    // -- parse_timeframe -----------------------------------------------------

    #[test]
    fn accepts_only_known_timeframes() {
        assert_eq!(parse_timeframe("24h"), Ok(Duration::from_secs(86_400)));
        assert_eq!(parse_timeframe("168h"), Ok(Duration::from_secs(604_800)));
        assert_eq!(
            parse_timeframe("3h"),
            Err(DurationError::InvalidTimeframe("3h".to_string()))
        );
        assert_eq!(
            parse_timeframe("1d"),
            Err(DurationError::InvalidTimeframe("1d".to_string()))
        );
    }
}
