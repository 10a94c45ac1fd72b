// src/config/duration.rs

use std::time::Duration;

/// Accepted suffixes and their length in milliseconds.
const UNITS: &[(&str, u64)] = &[("ms", 1), ("s", 1_000), ("m", 60_000), ("h", 3_600_000)];

/// Parse a pacing value such as `"250ms"`, `"2s"`, `"1m"` or `"2h"`.
///
/// The number must be a non-negative integer. Values that do not fit in a
/// `Duration` of whole milliseconds are rejected instead of wrapping.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("'{text}' needs a unit (ms, s, m or h)"))?;
    let (digits, suffix) = text.split_at(split);
    if digits.is_empty() {
        return Err(format!("'{text}' does not start with a number"));
    }

    let suffix = suffix.trim().to_ascii_lowercase();
    let scale = UNITS
        .iter()
        .find(|(unit, _)| *unit == suffix)
        .map(|(_, ms)| *ms)
        .ok_or_else(|| format!("unknown unit '{suffix}' in '{text}'; use ms, s, m or h"))?;

    let count: u64 = digits
        .parse()
        .map_err(|e| format!("'{digits}' is not a valid count: {e}"))?;
    let millis = count
        .checked_mul(scale)
        .ok_or_else(|| format!("'{text}' is too large"))?;

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
        assert_eq!(parse_duration(" 1m "), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration("2H"), Ok(Duration::from_secs(7200)));
    }

    #[test]
    fn rejects_missing_or_unknown_units() {
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn huge_values_are_errors_not_overflow() {
        let err = parse_duration("9999999999999999h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("99999999999999999999s").is_err());
        assert_eq!(
            parse_duration(&format!("{}ms", u64::MAX)),
            Ok(Duration::from_millis(u64::MAX))
        );
    }
}
