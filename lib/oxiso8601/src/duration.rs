use crate::parser::{SyntaxError, digits, ensure_complete, expect_char, fraction, optional};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration as StdDuration;
use tracing::debug;

const NANOSECONDS_PER_SECOND: u32 = 1_000_000_000;

/// An ISO 8601 duration like `P3Y2M1DT12H11M10.5S`.
///
/// Each designator is kept in its own field: no normalization is done between them,
/// `PT90M` stays 90 minutes and `P1W2D` keeps both its week and its days.
///
/// ```
/// use oxiso8601::{Duration, Sign};
///
/// let duration: Duration = "-P1WT10M".parse()?;
/// assert_eq!(duration.sign(), Sign::Negative);
/// assert_eq!(duration.weeks(), 1);
/// assert_eq!(duration.minutes(), 10);
/// assert_eq!(duration.to_string(), "-P1WT10M");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct Duration {
    sign: Sign,
    years: u64,
    months: u64,
    weeks: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
    nanoseconds: u32,
}

impl Duration {
    /// The empty duration, written `P0D`.
    pub const ZERO: Self = Self {
        sign: Sign::Positive,
        years: 0,
        months: 0,
        weeks: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        nanoseconds: 0,
    };

    #[inline]
    #[must_use]
    pub const fn with_sign(self, sign: Sign) -> Self {
        Self { sign, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_years(self, years: u64) -> Self {
        Self { years, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_months(self, months: u64) -> Self {
        Self { months, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_weeks(self, weeks: u64) -> Self {
        Self { weeks, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_days(self, days: u64) -> Self {
        Self { days, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_hours(self, hours: u64) -> Self {
        Self { hours, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_minutes(self, minutes: u64) -> Self {
        Self { minutes, ..self }
    }

    /// Sets the seconds and their fraction.
    ///
    /// Whole seconds in `nanoseconds` are carried over to `seconds`, saturating at [`u64::MAX`].
    #[inline]
    #[must_use]
    pub fn with_seconds(self, seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds: seconds.saturating_add(u64::from(nanoseconds / NANOSECONDS_PER_SECOND)),
            nanoseconds: nanoseconds % NANOSECONDS_PER_SECOND,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn sign(self) -> Sign {
        self.sign
    }

    #[inline]
    #[must_use]
    pub const fn years(self) -> u64 {
        self.years
    }

    #[inline]
    #[must_use]
    pub const fn months(self) -> u64 {
        self.months
    }

    #[inline]
    #[must_use]
    pub const fn weeks(self) -> u64 {
        self.weeks
    }

    #[inline]
    #[must_use]
    pub const fn days(self) -> u64 {
        self.days
    }

    #[inline]
    #[must_use]
    pub const fn hours(self) -> u64 {
        self.hours
    }

    #[inline]
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.minutes
    }

    /// The whole seconds, without their fraction.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.seconds
    }

    /// The second fraction in nanoseconds.
    #[inline]
    #[must_use]
    pub const fn nanoseconds(self) -> u32 {
        self.nanoseconds
    }

    /// Returns `true` if every component is zero, whatever the sign.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0 && self.weeks == 0 && !self.has_time()
    }

    #[inline]
    const fn has_time(self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanoseconds != 0
    }
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ensure_complete(input, duration_lexical_rep)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        if self.sign == Sign::Negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        if !self.has_time() {
            return Ok(());
        }
        f.write_str("T")?;
        if self.hours != 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes != 0 {
            write!(f, "{}M", self.minutes)?;
        }
        if self.seconds != 0 || self.nanoseconds != 0 {
            write!(f, "{}", self.seconds)?;
            if self.nanoseconds != 0 {
                let mut fraction = self.nanoseconds;
                let mut width = 9;
                while fraction % 10 == 0 {
                    fraction /= 10;
                    width -= 1;
                }
                write!(f, ".{fraction:0width$}")?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl From<StdDuration> for Duration {
    /// Splits the duration into days, hours, minutes and seconds.
    #[inline]
    fn from(value: StdDuration) -> Self {
        let seconds = value.as_secs();
        Self::ZERO
            .with_days(seconds / 86400)
            .with_hours(seconds % 86400 / 3600)
            .with_minutes(seconds % 3600 / 60)
            .with_seconds(seconds % 60, value.subsec_nanos())
    }
}

impl TryFrom<Duration> for StdDuration {
    type Error = DurationConversionError;

    /// Weeks are 7 days long, days 24 hours long. Years and months do not have a fixed length
    /// and negative durations can't be represented so both are rejected.
    #[inline]
    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.sign == Sign::Negative {
            return Err(DurationConversionErrorKind::Negative.into());
        }
        if value.years != 0 || value.months != 0 {
            return Err(DurationConversionErrorKind::Nominal.into());
        }
        let seconds = [
            (value.weeks, 604_800),
            (value.days, 86400),
            (value.hours, 3600),
            (value.minutes, 60),
            (value.seconds, 1),
        ]
        .into_iter()
        .try_fold(0_u64, |total, (count, unit)| {
            total.checked_add(count.checked_mul(unit)?)
        })
        .ok_or(DurationConversionErrorKind::Overflow)?;
        Ok(Self::new(seconds, value.nanoseconds))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// The sign of a [`Duration`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum Sign {
    /// No sign prefix.
    #[default]
    Positive,
    /// The `-` prefix.
    Negative,
}

impl Sign {
    /// `1` or `-1`.
    #[inline]
    #[must_use]
    pub const fn signum(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

/// Parses an ISO 8601 duration, returning [`None`] if the text does not match
/// `[-]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`.
///
/// Only the seconds may have a fraction, kept with a nanosecond resolution.
///
/// ```
/// use oxiso8601::{Sign, parse_duration};
///
/// let duration = parse_duration("-PT10M").unwrap();
/// assert_eq!(duration.sign(), Sign::Negative);
/// assert_eq!(duration.minutes(), 10);
/// assert_eq!(parse_duration("P1D2Y"), None);
/// ```
#[must_use]
pub fn parse_duration(text: &str) -> Option<Duration> {
    Duration::from_str(text)
        .inspect_err(|error| debug!(input = text, %error, "not an ISO 8601 duration"))
        .ok()
}

/// Writes the canonical form of a duration.
///
/// Zero components are omitted and the empty duration is written `P0D`, without sign.
///
/// ```
/// use oxiso8601::{Duration, Sign, format_duration};
///
/// let duration = Duration::ZERO.with_days(1).with_seconds(10, 500_000_000);
/// assert_eq!(format_duration(&duration), "P1DT10.5S");
/// assert_eq!(format_duration(&Duration::ZERO.with_sign(Sign::Negative)), "P0D");
/// ```
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    duration.to_string()
}

// duration ::= '-'? 'P' (n 'Y')? (n 'M')? (n 'W')? (n 'D')? ('T' (n 'H')? (n 'M')? (n ('.' n)? 'S')?)?
fn duration_lexical_rep(input: &str) -> Result<(Duration, &str), ParseDurationError> {
    // States
    const START: u32 = 0;
    const AFTER_YEAR: u32 = 1;
    const AFTER_MONTH: u32 = 2;
    const AFTER_WEEK: u32 = 3;
    const AFTER_DAY: u32 = 4;
    const AFTER_T: u32 = 5;
    const AFTER_HOUR: u32 = 6;
    const AFTER_MINUTE: u32 = 7;
    const AFTER_SECOND: u32 = 8;

    let (sign, input) = if let Some(left) = input.strip_prefix('-') {
        (Sign::Negative, left)
    } else {
        (Sign::Positive, input)
    };
    let mut input = expect_char(input, 'P', "Durations must start with 'P'")?;
    let mut state = START;
    let mut duration = Duration::ZERO.with_sign(sign);
    while !input.is_empty() {
        if let Some(left) = input.strip_prefix('T') {
            if state >= AFTER_T {
                return Err(SyntaxError("Duplicated time separator 'T'").into());
            }
            state = AFTER_T;
            input = left;
            continue;
        }
        let (number_str, left) = digits(input);
        if number_str.is_empty() {
            return Err(SyntaxError("Duration components must start with a number").into());
        }
        let value = u64::from_str(number_str)
            .map_err(|e| ParseDurationError(ParseDurationErrorKind::Overflow(e)))?;
        let (nanoseconds, left) = optional(left, '.', |input| fraction(input, 9))?;
        let Some(designator) = left.chars().next() else {
            return Err(SyntaxError(
                "Numbers in durations must be followed by a designator",
            )
            .into());
        };
        if nanoseconds.is_some() && designator != 'S' {
            return Err(SyntaxError("Only seconds are allowed to have a fraction").into());
        }
        match designator {
            'Y' if state < AFTER_YEAR => {
                duration.years = value;
                state = AFTER_YEAR;
            }
            'M' if state < AFTER_MONTH => {
                duration.months = value;
                state = AFTER_MONTH;
            }
            'W' if state < AFTER_WEEK => {
                duration.weeks = value;
                state = AFTER_WEEK;
            }
            'D' if state < AFTER_DAY => {
                duration.days = value;
                state = AFTER_DAY;
            }
            'H' if state == AFTER_T => {
                duration.hours = value;
                state = AFTER_HOUR;
            }
            'M' if (AFTER_T..AFTER_MINUTE).contains(&state) => {
                duration.minutes = value;
                state = AFTER_MINUTE;
            }
            'S' if (AFTER_T..AFTER_SECOND).contains(&state) => {
                duration.seconds = value;
                duration.nanoseconds = nanoseconds.unwrap_or(0);
                state = AFTER_SECOND;
            }
            _ => {
                return Err(SyntaxError("Unexpected or misplaced duration designator").into());
            }
        }
        input = &left[designator.len_utf8()..];
    }
    Ok((duration, input))
}

/// The text is not an ISO 8601 duration.
#[derive(Debug, Clone, thiserror::Error)]
#[error(transparent)]
pub struct ParseDurationError(#[from] ParseDurationErrorKind);

#[derive(Debug, Clone, thiserror::Error)]
enum ParseDurationErrorKind {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("Duration component overflow: {0}")]
    Overflow(ParseIntError),
}

impl From<SyntaxError> for ParseDurationError {
    fn from(error: SyntaxError) -> Self {
        Self(ParseDurationErrorKind::Syntax(error))
    }
}

/// A [`Duration`] that can't be converted to a [`std::time::Duration`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error(transparent)]
pub struct DurationConversionError(#[from] DurationConversionErrorKind);

#[derive(Debug, Clone, Copy, thiserror::Error)]
enum DurationConversionErrorKind {
    #[error("negative durations are not supported by std::time::Duration")]
    Negative,
    #[error("years and months do not have a fixed length")]
    Nominal,
    #[error("the duration overflows std::time::Duration")]
    Overflow,
}
