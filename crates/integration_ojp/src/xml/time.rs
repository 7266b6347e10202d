//! Timestamp and ISO-8601 duration codecs

use std::fmt::Write as _;

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};

/// Format a timestamp the way requests carry it (`2024-05-13T08:00:00.000Z`)
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into UTC
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("not an RFC 3339 timestamp: {e}"))
}

/// Format a duration as ISO-8601 (`PT1H2M`, `P1DT30S`, `PT0S`)
///
/// Sub-millisecond precision is dropped.
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    let negative = *duration < Duration::zero();
    let total_millis = duration.num_milliseconds().unsigned_abs();

    let days = total_millis / 86_400_000;
    let hours = (total_millis / 3_600_000) % 24;
    let minutes = (total_millis / 60_000) % 60;
    let seconds = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;

    let mut out = String::from(if negative { "-P" } else { "P" });
    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    if hours > 0 || minutes > 0 || seconds > 0 || millis > 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if millis > 0 {
            let _ = write!(out, "{seconds}.{millis:03}S");
        } else if seconds > 0 {
            let _ = write!(out, "{seconds}S");
        }
    }

    if total_millis == 0 {
        return String::from("PT0S");
    }
    out
}

/// Parse an ISO-8601 duration (`PnW`, `PnDTnHnMnS`, fractional seconds allowed)
///
/// Years and months are rejected since they have no fixed length.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let body = rest
        .strip_prefix('P')
        .ok_or_else(|| format!("duration must start with 'P': {value:?}"))?;

    let mut millis: i64 = 0;
    let mut number = String::new();
    let mut in_time = false;
    let mut last_rank = 0u8;
    let mut components = 0usize;

    for c in body.chars() {
        match c {
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            'T' => {
                if in_time || !number.is_empty() {
                    return Err(format!("misplaced 'T' in duration {value:?}"));
                }
                in_time = true;
            },
            designator => {
                let (rank, unit_millis) = match (in_time, designator) {
                    (false, 'W') => (1, 604_800_000),
                    (false, 'D') => (2, 86_400_000),
                    (true, 'H') => (3, 3_600_000),
                    (true, 'M') => (4, 60_000),
                    (true, 'S') => (5, 1000),
                    (false, 'Y' | 'M') => {
                        return Err(format!(
                            "calendar components are not supported: {value:?}"
                        ));
                    },
                    _ => return Err(format!("unexpected {designator:?} in duration {value:?}")),
                };
                if rank <= last_rank {
                    return Err(format!("components out of order in duration {value:?}"));
                }
                last_rank = rank;
                millis = millis
                    .checked_add(component_millis(&number, unit_millis, designator == 'S')?)
                    .ok_or_else(|| format!("duration overflows: {value:?}"))?;
                number.clear();
                components += 1;
            },
        }
    }

    if !number.is_empty() {
        return Err(format!("dangling number in duration {value:?}"));
    }
    if components == 0 {
        return Err(format!("duration has no components: {value:?}"));
    }

    let millis = if negative { -millis } else { millis };
    Duration::try_milliseconds(millis).ok_or_else(|| format!("duration overflows: {value:?}"))
}

fn component_millis(number: &str, unit_millis: i64, fraction_allowed: bool) -> Result<i64, String> {
    if number.is_empty() {
        return Err("duration component without a number".to_string());
    }
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if !fraction.is_empty() && !fraction_allowed {
        return Err(format!("fractional value only allowed for seconds: {number}"));
    }
    let whole: i64 = whole
        .parse()
        .map_err(|e| format!("invalid duration number {number:?}: {e}"))?;
    let mut millis = whole
        .checked_mul(unit_millis)
        .ok_or_else(|| format!("duration component overflows: {number}"))?;
    if !fraction.is_empty() {
        let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
        let fraction_millis: i64 = digits
            .parse()
            .map_err(|e| format!("invalid duration fraction {fraction:?}: {e}"))?;
        millis = millis
            .checked_add(fraction_millis)
            .ok_or_else(|| format!("duration component overflows: {number}"))?;
    }
    Ok(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn formats_timestamp_with_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-13T08:00:00.000Z");
    }

    #[test]
    fn parses_offset_timestamps_into_utc() {
        let ts = parse_timestamp("2024-05-13T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_timestamps_without_offset_as_utc() {
        let ts = parse_timestamp("2024-05-13T08:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn parses_common_durations() {
        assert_eq!(parse_duration("PT1H2M").unwrap(), Duration::minutes(62));
        assert_eq!(parse_duration("PT30S").unwrap(), Duration::seconds(30));
        assert_eq!(
            parse_duration("P1DT2H").unwrap(),
            Duration::hours(26)
        );
        assert_eq!(parse_duration("P2W").unwrap(), Duration::days(14));
        assert_eq!(
            parse_duration("PT1.5S").unwrap(),
            Duration::milliseconds(1500)
        );
        assert_eq!(parse_duration("-PT5M").unwrap(), Duration::minutes(-5));
    }

    #[test]
    fn rejects_malformed_durations() {
        for bad in ["", "P", "PT", "1H", "PT1H2", "P1Y", "P1M", "PT2M1H", "PT1.5M", "PTXS"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_overflowing_durations() {
        for bad in [
            "PT9223372036854775.999S",
            "PT9223372036854775808S",
            "P106751991167301D",
            "P9999999999999DT9999999999999H",
        ] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn formats_canonical_durations() {
        assert_eq!(format_duration(&Duration::minutes(62)), "PT1H2M");
        assert_eq!(format_duration(&Duration::zero()), "PT0S");
        assert_eq!(format_duration(&Duration::hours(24)), "P1D");
        assert_eq!(format_duration(&Duration::seconds(90_061)), "P1DT1H1M1S");
        assert_eq!(format_duration(&Duration::milliseconds(1500)), "PT1.500S");
        assert_eq!(format_duration(&Duration::minutes(-5)), "-PT5M");
    }

    proptest! {
        #[test]
        fn duration_survives_format_then_parse(millis in -10_000_000_000i64..10_000_000_000i64) {
            let duration = Duration::milliseconds(millis);
            let parsed = parse_duration(&format_duration(&duration)).unwrap();
            prop_assert_eq!(parsed, duration);
        }

        #[test]
        fn duration_parser_never_panics(value in "-?P[0-9DTHMS.]{0,40}") {
            let _ = parse_duration(&value);
        }
    }
}
