use chrono::{DateTime, NaiveDateTime, Utc};

const ORDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a gateway timestamp and renders it as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Fractional seconds and the offset are dropped. Timestamps without an
/// offset are taken as UTC.
pub fn to_order_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).format(ORDER_TIMESTAMP_FORMAT).to_string());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.format(ORDER_TIMESTAMP_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncates_millis_and_zone() {
        assert_eq!(
            to_order_timestamp("2024-01-15T10:30:00.000Z").as_deref(),
            Some("2024-01-15 10:30:00")
        );
    }

    #[test]
    fn test_converts_offset_to_utc() {
        assert_eq!(
            to_order_timestamp("2024-01-15T07:30:00-03:00").as_deref(),
            Some("2024-01-15 10:30:00")
        );
    }

    #[test]
    fn test_accepts_naive_timestamps() {
        assert_eq!(
            to_order_timestamp("2024-01-15 10:30:00").as_deref(),
            Some("2024-01-15 10:30:00")
        );
        assert_eq!(
            to_order_timestamp("2024-01-15T10:30:00.123").as_deref(),
            Some("2024-01-15 10:30:00")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(to_order_timestamp("ontem").is_none());
        assert!(to_order_timestamp("").is_none());
    }

    proptest! {
        #[test]
        fn utc_millis_timestamps_keep_date_and_time(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
            millis in 0u32..1000,
        ) {
            let raw = format!(
                "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z"
            );
            let expected = format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
            );
            prop_assert_eq!(to_order_timestamp(&raw), Some(expected));
        }
    }
}
