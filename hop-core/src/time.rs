//! Clock times and calendar dates used by scheduling runs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 3_600;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors returned by [`ClockTime::parse`] and [`ClockTime::from_seconds`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    /// The text is not of the form `HH:MM`.
    #[error("wrongly formatted time {value:?}, expected HH:MM")]
    Malformed {
        /// Offending text.
        value: String,
    },
    /// Hour or minute fall outside the 24-hour clock.
    #[error("time {value:?} is outside 00:00-23:59")]
    OutOfRange {
        /// Offending text.
        value: String,
    },
    /// A second offset was negative or too large.
    #[error("second offset {seconds} is not a valid time of day")]
    InvalidOffset {
        /// Offending offset.
        seconds: i64,
    },
}

/// Time of day as seconds since local midnight.
///
/// Parsed from `"HH:MM"` (a single-digit hour or minute is accepted) and
/// rendered zero-padded. Offsets reported by the route solver may run past
/// midnight; they render with an hour of 24 or more rather than wrapping.
///
/// # Examples
///
/// ```
/// use hop_core::ClockTime;
///
/// # fn main() -> Result<(), hop_core::ClockTimeError> {
/// let time = ClockTime::parse("18:00")?;
/// assert_eq!(time.seconds(), 64_800);
/// assert_eq!(time.to_string(), "18:00");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Parse a 24-hour `HH:MM` time.
    pub fn parse(value: &str) -> Result<Self, ClockTimeError> {
        let malformed = || ClockTimeError::Malformed {
            value: value.to_owned(),
        };
        let (hour_text, minute_text) = value.trim().split_once(':').ok_or_else(malformed)?;
        let hour = parse_component(hour_text).ok_or_else(malformed)?;
        let minute = parse_component(minute_text).ok_or_else(malformed)?;
        if hour > 23 || minute > 59 {
            return Err(ClockTimeError::OutOfRange {
                value: value.to_owned(),
            });
        }
        Ok(Self(hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE))
    }

    /// Build a time from a second offset as returned by the route solver.
    pub fn from_seconds(seconds: i64) -> Result<Self, ClockTimeError> {
        u32::try_from(seconds)
            .map(Self)
            .map_err(|_| ClockTimeError::InvalidOffset { seconds })
    }

    /// Seconds since midnight.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }
}

fn parse_component(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0.div_euclid(SECONDS_PER_HOUR);
        let minutes = self.0.rem_euclid(SECONDS_PER_HOUR).div_euclid(SECONDS_PER_MINUTE);
        write!(f, "{hours:02}:{minutes:02}")
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors returned by [`ScheduleDate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleDateError {
    /// The text does not follow the `YYYY-MM-DD` pattern.
    #[error("date {value:?} must be in the format 2022-01-31")]
    Malformed {
        /// Offending text.
        value: String,
    },
    /// The text follows the pattern but names no calendar day.
    #[error("date {value:?} is not a calendar day")]
    NotACalendarDay {
        /// Offending text.
        value: String,
    },
}

/// The calendar day a scheduling run plans for.
///
/// The text must match `\d{4}-[0-1]\d-[0-3]\d` in full and name a real day.
///
/// # Examples
///
/// ```
/// use hop_core::ScheduleDate;
///
/// assert!(ScheduleDate::parse("2022-01-31").is_ok());
/// assert!(ScheduleDate::parse("2022-1-31").is_err());
/// assert!(ScheduleDate::parse("2022-02-30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleDate(NaiveDate);

impl ScheduleDate {
    /// Validate and parse a `YYYY-MM-DD` date.
    pub fn parse(value: &str) -> Result<Self, ScheduleDateError> {
        if !matches_date_pattern(value) {
            return Err(ScheduleDateError::Malformed {
                value: value.to_owned(),
            });
        }
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ScheduleDateError::NotACalendarDay {
                value: value.to_owned(),
            })
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Whether `day`, as stored on a shipment record, names this date.
    #[must_use]
    pub fn matches(self, day: &str) -> bool {
        day.trim() == self.to_string()
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for ScheduleDate {
    type Err = ScheduleDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn matches_date_pattern(value: &str) -> bool {
    let bytes = value.as_bytes();
    let [y1, y2, y3, y4, b'-', m1, m2, b'-', d1, d2] = bytes else {
        return false;
    };
    [y1, y2, y3, y4, m2, d2].iter().all(|b| b.is_ascii_digit())
        && matches!(*m1, b'0'..=b'1')
        && matches!(*d1, b'0'..=b'3')
}

/// Parse a record deadline into a calendar date.
///
/// Returns `None` for empty or unparseable text.
#[must_use]
pub(crate) fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00:00", 0)]
    #[case("9:05", 32_700)]
    #[case("09:05", 32_700)]
    #[case("18:00", 64_800)]
    #[case(" 23:59 ", 86_340)]
    fn parses_valid_times(#[case] text: &str, #[case] seconds: u32) {
        let time = ClockTime::parse(text).expect("valid time");
        assert_eq!(time.seconds(), seconds);
    }

    #[rstest]
    #[case("24:00")]
    #[case("12:60")]
    fn rejects_out_of_range_times(#[case] text: &str) {
        let err = ClockTime::parse(text).expect_err("out of range");
        assert!(matches!(err, ClockTimeError::OutOfRange { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("1200")]
    #[case("12:3a")]
    #[case("-1:30")]
    #[case("123:00")]
    fn rejects_malformed_times(#[case] text: &str) {
        let err = ClockTime::parse(text).expect_err("malformed");
        assert!(matches!(err, ClockTimeError::Malformed { .. }));
    }

    #[rstest]
    #[case(0, "00:00")]
    #[case(29_700, "08:15")]
    #[case(29_759, "08:15")]
    #[case(90_000, "25:00")]
    fn formats_solver_offsets(#[case] seconds: i64, #[case] expected: &str) {
        let time = ClockTime::from_seconds(seconds).expect("valid offset");
        assert_eq!(time.to_string(), expected);
    }

    #[rstest]
    fn negative_offsets_are_rejected() {
        let err = ClockTime::from_seconds(-1).expect_err("negative offset");
        assert_eq!(err, ClockTimeError::InvalidOffset { seconds: -1 });
    }

    #[rstest]
    #[case("2022-01-31")]
    #[case("2024-02-29")]
    #[case("1999-12-01")]
    fn accepts_calendar_dates(#[case] text: &str) {
        let date = ScheduleDate::parse(text).expect("valid date");
        assert_eq!(date.to_string(), text);
    }

    #[rstest]
    #[case("2022-1-31")]
    #[case("22-01-31")]
    #[case("2022/01/31")]
    #[case("2022-21-01")]
    #[case("2022-01-41")]
    #[case("x2022-01-31")]
    #[case("2022-01-31 ")]
    fn rejects_malformed_dates(#[case] text: &str) {
        let err = ScheduleDate::parse(text).expect_err("malformed date");
        assert!(matches!(err, ScheduleDateError::Malformed { .. }));
    }

    #[rstest]
    #[case("2022-02-30")]
    #[case("2023-02-29")]
    #[case("2022-13-01")]
    fn rejects_impossible_dates(#[case] text: &str) {
        let err = ScheduleDate::parse(text).expect_err("impossible date");
        assert!(matches!(err, ScheduleDateError::NotACalendarDay { .. }));
    }

    #[rstest]
    fn date_matches_record_day() {
        let date = ScheduleDate::parse("2022-05-10").expect("valid date");
        assert!(date.matches("2022-05-10"));
        assert!(!date.matches("2022-05-11"));
        assert!(!date.matches(""));
    }

    #[rstest]
    #[case("2022-05-10", true)]
    #[case("", false)]
    #[case("soon", false)]
    fn deadlines_parse_leniently(#[case] text: &str, #[case] parsed: bool) {
        assert_eq!(parse_deadline(text).is_some(), parsed);
    }
}
