//! HTTP-date utilities without timezone dependencies.
//!
//! Provides a lightweight `HttpDate` (always UTC, second precision) used for
//! `Last-Modified` and `If-Modified-Since`.
//!
//! # Formats
//!
//! - IMF-fixdate (preferred, the only one emitted): `Sun, 06 Nov 1994 08:49:37 GMT`
//! - RFC 850 (obsolete, accepted): `Sunday, 06-Nov-94 08:49:37 GMT`
//! - asctime (obsolete, accepted): `Sun Nov  6 08:49:37 1994`
//!
//! # Examples
//!
//! ```ignore
//! let date = HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
//! assert_eq!(date.to_unix(), 784111777);
//! assert_eq!(date.to_string(), "Sun, 06 Nov 1994 08:49:37 GMT");
//! ```

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// UTC datetime at second precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HttpDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl HttpDate {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Build from seconds since the Unix epoch.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self::new(
            year as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Seconds since the Unix epoch.
    #[allow(clippy::cast_sign_loss)]
    pub fn to_unix(self) -> u64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        (days.max(0) as u64) * 86_400
            + u64::from(self.hour) * 3600
            + u64::from(self.minute) * 60
            + u64::from(self.second)
    }

    /// Build from a `SystemTime`, truncating sub-second precision.
    ///
    /// Times before the epoch clamp to the epoch.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_unix(unix_seconds(time))
    }

    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.to_unix())
    }

    /// Parse any of the three HTTP-date formats.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let date = parse_imf_fixdate(s)
            .or_else(|| parse_rfc850(s))
            .or_else(|| parse_asctime(s))?;
        date.is_valid().then_some(date)
    }

    fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            // allow leap second notation
            && self.second <= 60
            && self.year >= 1970
    }

    /// Index into `WEEKDAYS` (0 = Monday).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn weekday_index(self) -> usize {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        // 1970-01-01 was a Thursday
        (days + 3).rem_euclid(7) as usize
    }
}

impl fmt::Display for HttpDate {
    /// IMF-fixdate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Whole seconds since the Unix epoch (0 for earlier times).
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Truncate a `SystemTime` to whole seconds.
pub fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(unix_seconds(time))
}

// ============================================================================
// Parsers
// ============================================================================

/// `Sun, 06 Nov 1994 08:49:37 GMT`
fn parse_imf_fixdate(s: &str) -> Option<HttpDate> {
    let (_, rest) = s.split_once(", ")?;
    let mut parts = rest.split(' ');
    let day = parse_num(parts.next()?, 2)?;
    let month = parse_month(parts.next()?)?;
    let year = parse_num(parts.next()?, 4)?;
    let (hour, minute, second) = parse_time(parts.next()?)?;
    if parts.next()? != "GMT" || parts.next().is_some() {
        return None;
    }
    Some(HttpDate::new(year as u16, month, day as u8, hour, minute, second))
}

/// `Sunday, 06-Nov-94 08:49:37 GMT`
fn parse_rfc850(s: &str) -> Option<HttpDate> {
    let (_, rest) = s.split_once(", ")?;
    let mut parts = rest.split(' ');
    let mut date = parts.next()?.split('-');
    let day = parse_num(date.next()?, 2)?;
    let month = parse_month(date.next()?)?;
    let yy = parse_num(date.next()?, 2)?;
    let (hour, minute, second) = parse_time(parts.next()?)?;
    if parts.next()? != "GMT" || parts.next().is_some() {
        return None;
    }
    // Two-digit years: 70-99 -> 19xx, 00-69 -> 20xx
    let year = if yy >= 70 { 1900 + yy } else { 2000 + yy };
    Some(HttpDate::new(year as u16, month, day as u8, hour, minute, second))
}

/// `Sun Nov  6 08:49:37 1994`
fn parse_asctime(s: &str) -> Option<HttpDate> {
    let mut parts = s.split_ascii_whitespace();
    let _weekday = parts.next()?;
    let month = parse_month(parts.next()?)?;
    let day_str = parts.next()?;
    if day_str.is_empty() || day_str.len() > 2 {
        return None;
    }
    let day: u8 = day_str.parse().ok()?;
    let (hour, minute, second) = parse_time(parts.next()?)?;
    let year = parse_num(parts.next()?, 4)?;
    if parts.next().is_some() {
        return None;
    }
    Some(HttpDate::new(year as u16, month, day, hour, minute, second))
}

/// Parse `HH:MM:SS`
fn parse_time(s: &str) -> Option<(u8, u8, u8)> {
    let mut parts = s.split(':');
    let hour = parse_num(parts.next()?, 2)? as u8;
    let minute = parse_num(parts.next()?, 2)? as u8;
    let second = parse_num(parts.next()?, 2)? as u8;
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

fn parse_month(s: &str) -> Option<u8> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(s))
        .map(|i| i as u8 + 1)
}

/// Parse exactly `len` ASCII digits.
fn parse_num(s: &str, len: usize) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != len {
        return None;
    }
    let mut result = 0u32;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u32::from(d);
    }
    Some(result)
}

// ============================================================================
// Calendar arithmetic (proleptic Gregorian)
// ============================================================================

#[inline]
#[allow(clippy::manual_is_multiple_of)]
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a civil date.
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a count of days since 1970-01-01.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_imf_fixdate() {
        let date = HttpDate::from_unix(784_111_777);
        assert_eq!(date.to_string(), "Sun, 06 Nov 1994 08:49:37 GMT");

        assert_eq!(
            HttpDate::from_unix(0).to_string(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_parse_all_formats() {
        let expected = HttpDate::new(1994, 11, 6, 8, 49, 37);
        assert_eq!(
            HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(
            HttpDate::parse("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(HttpDate::parse("Sun Nov  6 08:49:37 1994"), Some(expected));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(HttpDate::parse(""), None);
        assert_eq!(HttpDate::parse("yesterday"), None);
        assert_eq!(HttpDate::parse("Sun, 06 Nov 1994 08:49:37 PST"), None);
        assert_eq!(HttpDate::parse("Sun, 31 Feb 1994 08:49:37 GMT"), None);
        assert_eq!(HttpDate::parse("Sun, 06 Nov 1994 25:49:37 GMT"), None);
    }

    #[test]
    fn test_unix_roundtrip_across_leap_years() {
        for secs in [0, 951_782_400, 1_709_210_096, 4_102_444_800] {
            let date = HttpDate::from_unix(secs);
            assert_eq!(date.to_unix(), secs, "{date}");
            assert_eq!(HttpDate::parse(&date.to_string()), Some(date));
        }
        // 2000-02-29 exists, 1900 is before the epoch so never produced
        assert_eq!(HttpDate::from_unix(951_782_400), HttpDate::new(2000, 2, 29, 0, 0, 0));
    }

    #[test]
    fn test_truncate_to_seconds() {
        let time = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(truncate_to_seconds(time), UNIX_EPOCH + Duration::from_secs(1));
        assert_eq!(unix_seconds(time), 1);
        assert_eq!(HttpDate::from_system_time(time).to_unix(), 1);
    }

    #[test]
    fn test_ordering() {
        let a = HttpDate::new(2024, 6, 15, 14, 30, 45);
        let b = HttpDate::new(2024, 6, 15, 14, 30, 46);
        assert!(a < b);
        assert!(a.to_system_time() < b.to_system_time());
    }
}
