use crate::error::{OrgStatsError, Result};
use chrono::{DateTime, Utc};

/// Parse a GitHub `DateTime` scalar (`2024-03-01T17:04:05Z`).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| OrgStatsError::InvalidDate(format!("'{input}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_utc_scalar() {
        let dt = parse_timestamp("2024-03-01T17:04:05Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 17, 4, 5).unwrap());
    }

    #[test]
    fn normalizes_offsets() {
        let dt = parse_timestamp("2024-03-01T19:04:05+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 17, 4, 5).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(OrgStatsError::InvalidDate(_))
        ));
    }
}
