//! Timestamp handling for the remote FEWS representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{FewsError, FewsResult};

/// Format used for time bounds in outbound statements.
pub const JDBC_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the compact timestamp the remote returns in time-series rows.
///
/// The wire form is a digit string: 4-digit year, 2-digit month, then the
/// day-and-time tail (`20080115130000` = 2008-01-15 13:00:00). A date-only
/// string is accepted and read as midnight. Anything else fails with
/// `MalformedTimestamp`.
pub fn parse_fews_timestamp(raw: &str) -> FewsResult<DateTime<Utc>> {
    let compact = raw.trim();

    if let Ok(ndt) = NaiveDateTime::parse_from_str(compact, "%Y%m%d%H%M%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(nd) = NaiveDate::parse_from_str(compact, "%Y%m%d") {
        let ndt = nd
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| FewsError::MalformedTimestamp(raw.to_string()))?;
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(FewsError::MalformedTimestamp(raw.to_string()))
}

/// Render a date-time the way the remote statement syntax expects.
pub fn format_jdbc(dt: &DateTime<Utc>) -> String {
    dt.format(JDBC_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_compact_timestamp() {
        let dt = parse_fews_timestamp("20080115130000").unwrap();
        assert_eq!(dt.year(), 2008);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 13);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_fews_timestamp("20080115").unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_garbage_fails() {
        for raw in ["", "garbage", "2008-01-15", "200801", "20081315130000"] {
            assert!(
                matches!(
                    parse_fews_timestamp(raw),
                    Err(FewsError::MalformedTimestamp(_))
                ),
                "expected MalformedTimestamp for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_format_jdbc() {
        let dt = Utc.with_ymd_and_hms(2007, 1, 1, 13, 0, 0).unwrap();
        assert_eq!(format_jdbc(&dt), "2007-01-01 13:00:00");
    }
}
