//! Duration and timestamp conversions
//!
//! Stored durations are always integer seconds. The display strings produced
//! here are lossy in one direction only: they are never parsed back into the
//! stored value.

use regex::Regex;
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid duration pattern")
});

/// Parse an ISO-8601 style duration (`PT1H2M10S`) into seconds.
///
/// Missing components count as zero and input that does not match yields 0.
/// Absurdly large components saturate at `u64::MAX`.
pub fn parse_iso_duration(value: &str) -> u64 {
    let Some(captures) = ISO_DURATION.captures(value) else {
        return 0;
    };

    let component = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}

/// Format seconds as `H:MM:SS` when there are hours, otherwise `M:SS`
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Parse a clock-style timestamp (`H:MM:SS` or `M:SS`) into seconds
pub fn parse_clock(value: &str) -> Option<u64> {
    let parts: Vec<u64> = value
        .trim()
        .split(':')
        .map(|part| part.parse::<u64>())
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [hours, minutes, seconds] => hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(*seconds),
        [minutes, seconds] => minutes.checked_mul(60)?.checked_add(*seconds),
        _ => None,
    }
}

/// Format a total as `"{h}h {m}m"`
pub fn format_hours_minutes(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration("PT1H2M10S"), 3722);
        assert_eq!(parse_iso_duration("PT20M"), 1200);
        assert_eq!(parse_iso_duration("PT45S"), 45);
        assert_eq!(parse_iso_duration("PT2H"), 7200);
    }

    #[test]
    fn test_parse_iso_duration_is_lenient() {
        assert_eq!(parse_iso_duration("garbage"), 0);
        assert_eq!(parse_iso_duration(""), 0);
        assert_eq!(parse_iso_duration("PT"), 0);
    }

    #[test]
    fn test_parse_iso_duration_saturates_huge_components() {
        assert_eq!(parse_iso_duration("PT9999999999999999999H"), u64::MAX);
        assert_eq!(parse_iso_duration("PT18446744073709551615S"), u64::MAX);
        assert_eq!(parse_iso_duration("PT1H18446744073709551615S"), u64::MAX);
        // too many digits for u64 at all counts as a missing component
        assert_eq!(parse_iso_duration("PT99999999999999999999999H5S"), 5);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0:00");
        assert_eq!(format_seconds(59), "0:59");
        assert_eq!(format_seconds(350), "5:50");
        assert_eq!(format_seconds(3661), "1:01:01");
        assert_eq!(format_seconds(36000), "10:00:00");
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("1:23"), Some(83));
        assert_eq!(parse_clock("01:02:03"), Some(3723));
        assert_eq!(parse_clock("12"), None);
        assert_eq!(parse_clock("a:bc"), None);
        assert_eq!(parse_clock("18446744073709551615:00"), None);
    }

    #[test]
    fn test_format_hours_minutes() {
        assert_eq!(format_hours_minutes(0), "0h 0m");
        assert_eq!(format_hours_minutes(5400), "1h 30m");
    }
}
