use crate::parser::{
    SyntaxError, ensure_complete, expect_char, four_digits, fraction, optional, two_digits,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A calendar timestamp with an optional timezone offset.
///
/// Fields are stored as they were written: parsing does not check that the date exists
/// (use [`Timestamp::validate`] for that). The second fraction is kept with a microsecond
/// resolution.
///
/// ```
/// use oxiso8601::{Timestamp, TimezoneOffset};
///
/// let timestamp: Timestamp = "2014-02-01T09:28:56.321-10:00".parse()?;
/// assert_eq!(timestamp.microsecond(), 321_000);
/// assert_eq!(timestamp.offset(), TimezoneOffset::Fixed(-600));
/// assert_eq!(timestamp.to_string(), "2014-02-01T09:28:56.321-10:00");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
    offset: TimezoneOffset,
}

impl Timestamp {
    /// Builds a timestamp at midnight of the given day, without timezone offset.
    #[inline]
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
            offset: TimezoneOffset::Absent,
        }
    }

    /// Sets the time of day, `microsecond` being the second fraction.
    #[inline]
    #[must_use]
    pub const fn with_time(self, hour: u8, minute: u8, second: u8, microsecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            microsecond,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_offset(self, offset: TimezoneOffset) -> Self {
        Self { offset, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn year(self) -> u16 {
        self.year
    }

    #[inline]
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    #[inline]
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    #[inline]
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[inline]
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    #[inline]
    #[must_use]
    pub const fn second(self) -> u8 {
        self.second
    }

    /// The second fraction in microseconds.
    #[inline]
    #[must_use]
    pub const fn microsecond(self) -> u32 {
        self.microsecond
    }

    #[inline]
    #[must_use]
    pub const fn offset(self) -> TimezoneOffset {
        self.offset
    }

    /// The offset with respect to UTC in minutes, [`None`] if the timestamp is naive.
    #[inline]
    #[must_use]
    pub const fn offset_minutes(self) -> Option<i16> {
        self.offset.minutes()
    }

    /// Checks that the timestamp denotes an existing instant of the proleptic Gregorian calendar
    /// and that its offset is between -14:00 and +14:00.
    ///
    /// ```
    /// use oxiso8601::Timestamp;
    ///
    /// assert!(Timestamp::new(2000, 2, 29).validate().is_ok());
    /// assert!(Timestamp::new(1900, 2, 29).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), InvalidTimestampError> {
        if !(1..=12).contains(&self.month) {
            return Err(InvalidTimestampErrorKind::Month { month: self.month }.into());
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(InvalidTimestampErrorKind::DayOfMonth {
                day: self.day,
                month: self.month,
            }
            .into());
        }
        if self.hour > 23 || self.minute > 59 || self.second > 59 {
            return Err(InvalidTimestampErrorKind::TimeOfDay {
                hour: self.hour,
                minute: self.minute,
                second: self.second,
            }
            .into());
        }
        if self.microsecond > 999_999 {
            return Err(InvalidTimestampErrorKind::Microsecond(self.microsecond).into());
        }
        if let TimezoneOffset::Fixed(minutes) = self.offset {
            if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
                return Err(InvalidTimestampErrorKind::Offset {
                    offset: self.offset,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(ensure_complete(input, timestamp_lexical_rep)?)
    }
}

impl fmt::Display for Timestamp {
    /// Naive timestamps and zero offsets are written with the `Z` designator, like UTC ones.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.microsecond / 1000
        )?;
        match self.offset {
            TimezoneOffset::Absent | TimezoneOffset::Utc | TimezoneOffset::Fixed(0) => {
                f.write_str("Z")
            }
            offset => write!(f, "{offset}"),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

const MAX_OFFSET_MINUTES: i16 = 14 * 60;

/// The timezone information carried by a [`Timestamp`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum TimezoneOffset {
    /// No timezone designator: a naive local time.
    #[default]
    Absent,
    /// The `Z` designator.
    Utc,
    /// A `±HH:MM` designator, stored as a signed number of minutes east of UTC.
    Fixed(i16),
}

impl TimezoneOffset {
    /// The offset in minutes, [`None`] if it is [`TimezoneOffset::Absent`].
    #[inline]
    #[must_use]
    pub const fn minutes(self) -> Option<i16> {
        match self {
            Self::Absent => None,
            Self::Utc => Some(0),
            Self::Fixed(offset) => Some(offset),
        }
    }
}

impl fmt::Display for TimezoneOffset {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Absent => Ok(()),
            Self::Utc => f.write_str("Z"),
            Self::Fixed(offset) => {
                let minutes = offset.unsigned_abs();
                write!(
                    f,
                    "{}{:02}:{:02}",
                    if offset < 0 { '-' } else { '+' },
                    minutes / 60,
                    minutes % 60
                )
            }
        }
    }
}

/// Parses an ISO 8601 timestamp, returning [`None`] if the text does not match
/// `YYYY-MM-DD[THH:MM:SS[.fraction][Z|±HH[:]MM]]`.
///
/// Only the first six digits of the second fraction are kept, without rounding.
/// No calendar validation is done: `2014-13-45` is a valid input.
///
/// ```
/// use oxiso8601::{TimezoneOffset, parse_timestamp};
///
/// let timestamp = parse_timestamp("2014-02-01T09:28:56.1234567+05:30").unwrap();
/// assert_eq!(timestamp.microsecond(), 123_456);
/// assert_eq!(timestamp.offset(), TimezoneOffset::Fixed(330));
/// assert_eq!(parse_timestamp("2014-02-01 09:28:56"), None);
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    Timestamp::from_str(text)
        .inspect_err(|error| debug!(input = text, %error, "not an ISO 8601 timestamp"))
        .ok()
}

/// Writes the canonical form `YYYY-MM-DDTHH:MM:SS.mmm(Z|±HH:MM)` of a timestamp.
///
/// The millisecond field is the microsecond value divided by 1000 written on at least
/// two digits. Naive timestamps and zero offsets like `+00:00` are written with the `Z`
/// designator, so they are read back as [`TimezoneOffset::Utc`].
///
/// ```
/// use oxiso8601::{Timestamp, TimezoneOffset, format_timestamp};
///
/// let timestamp = Timestamp::new(2014, 1, 1).with_time(23, 28, 56, 782_000);
/// assert_eq!(format_timestamp(&timestamp), "2014-01-01T23:28:56.782Z");
/// assert_eq!(
///     format_timestamp(&timestamp.with_offset(TimezoneOffset::Fixed(-330))),
///     "2014-01-01T23:28:56.782-05:30"
/// );
/// ```
#[must_use]
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_string()
}

/// Parses a timestamp and checks it with [`Timestamp::validate`].
///
/// ```
/// use oxiso8601::parse_timestamp_strict;
///
/// assert!(parse_timestamp_strict("2014-02-28T09:28:56Z").is_ok());
/// assert!(parse_timestamp_strict("2014-02-29T09:28:56Z").is_err());
/// ```
pub fn parse_timestamp_strict(text: &str) -> Result<Timestamp, StrictParseError> {
    let timestamp = Timestamp::from_str(text)?;
    timestamp.validate()?;
    Ok(timestamp)
}

// timestamp ::= year '-' month '-' day ('T' time)?
fn timestamp_lexical_rep(input: &str) -> Result<(Timestamp, &str), SyntaxError> {
    let (year, input) = four_digits(input, "The year must be encoded with four digits")?;
    let input = expect_char(input, '-', "The year and month must be separated by '-'")?;
    let (month, input) = two_digits(input, "The month must be encoded with two digits")?;
    let input = expect_char(input, '-', "The month and day must be separated by '-'")?;
    let (day, input) = two_digits(input, "The day must be encoded with two digits")?;
    let date = Timestamp::new(year, month, day);
    let (timestamp, input) = optional(input, 'T', |input| time_frag(date, input))?;
    Ok((timestamp.unwrap_or(date), input))
}

// time ::= hour ':' minute ':' second ('.' digit+)? timezone?
fn time_frag(date: Timestamp, input: &str) -> Result<(Timestamp, &str), SyntaxError> {
    let (hour, input) = two_digits(input, "The hours must be encoded with two digits")?;
    let input = expect_char(input, ':', "The hours and minutes must be separated by ':'")?;
    let (minute, input) = two_digits(input, "The minutes must be encoded with two digits")?;
    let input = expect_char(
        input,
        ':',
        "The minutes and seconds must be separated by ':'",
    )?;
    let (second, input) = two_digits(input, "The seconds must be encoded with two digits")?;
    let (microsecond, input) = optional(input, '.', |input| fraction(input, 6))?;
    let (offset, input) = timezone_frag(input)?;
    Ok((
        date.with_time(hour, minute, second, microsecond.unwrap_or(0))
            .with_offset(offset),
        input,
    ))
}

// timezone ::= 'Z' | ('+' | '-') hour ':'? minute
fn timezone_frag(input: &str) -> Result<(TimezoneOffset, &str), SyntaxError> {
    if let Some(left) = input.strip_prefix('Z') {
        return Ok((TimezoneOffset::Utc, left));
    }
    let (sign, input) = if let Some(left) = input.strip_prefix('-') {
        (-1, left)
    } else if let Some(left) = input.strip_prefix('+') {
        (1, left)
    } else {
        return Ok((TimezoneOffset::Absent, input));
    };
    let (hours, input) = two_digits(input, "The timezone hours must be encoded with two digits")?;
    let input = input.strip_prefix(':').unwrap_or(input);
    let (minutes, input) = two_digits(
        input,
        "The timezone minutes must be encoded with two digits",
    )?;
    Ok((
        TimezoneOffset::Fixed(sign * (i16::from(hours) * 60 + i16::from(minutes))),
        input,
    ))
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 => {
            if year % 4 != 0 || (year % 100 == 0 && year % 400 != 0) {
                28
            } else {
                29
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// The text is not an ISO 8601 timestamp.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error(transparent)]
pub struct ParseTimestampError(#[from] SyntaxError);

/// A [`Timestamp`] that does not denote an existing instant.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error(transparent)]
pub struct InvalidTimestampError(#[from] InvalidTimestampErrorKind);

#[derive(Debug, Clone, Copy, thiserror::Error)]
enum InvalidTimestampErrorKind {
    #[error("{month} is not a valid month")]
    Month { month: u8 },
    #[error("{day} is not a valid day of month {month}")]
    DayOfMonth { day: u8, month: u8 },
    #[error("{hour:02}:{minute:02}:{second:02} is not a valid time of day")]
    TimeOfDay { hour: u8, minute: u8, second: u8 },
    #[error("{0} microseconds are more than a second")]
    Microsecond(u32),
    #[error("invalid timezone offset {offset}")]
    Offset { offset: TimezoneOffset },
}

/// An error returned by [`parse_timestamp_strict`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum StrictParseError {
    /// The text is not an ISO 8601 timestamp.
    #[error(transparent)]
    Syntax(#[from] ParseTimestampError),
    /// The text is a timestamp that does not exist.
    #[error(transparent)]
    Invalid(#[from] InvalidTimestampError),
}
