// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for DATE, TIME and DATE-TIME values as defined in RFC 5545 Section 3.3.

use std::fmt::{self, Display};

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::prelude::*;

/// Errors from [`parse_date`] and [`parse_date_time`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeError {
    /// The text does not follow the grammar.
    #[error("invalid date-time {input:?}: {reason}")]
    Syntax {
        /// Offending input
        input: String,
        /// First parser complaint
        reason: String,
    },

    /// The fields are in range but do not name a real calendar day (e.g. Feb 30).
    #[error("{input:?} is not a valid calendar date")]
    InvalidDate {
        /// Offending input
        input: String,
    },
}

impl DateTimeError {
    fn syntax(input: &str, errs: &[Rich<'_, char>]) -> Self {
        Self::Syntax {
            input: input.to_owned(),
            reason: errs
                .first()
                .map_or_else(|| "unexpected input".to_owned(), ToString::to_string),
        }
    }
}

/// Parse a DATE value, e.g. `19970714`.
///
/// # Errors
///
/// See [`DateTimeError`].
pub fn parse_date(src: &str) -> Result<ValueDate, DateTimeError> {
    let date = value_date::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(src)
        .into_result()
        .map_err(|errs| DateTimeError::syntax(src, &errs))?;

    if date.is_valid() {
        Ok(date)
    } else {
        Err(DateTimeError::InvalidDate {
            input: src.to_owned(),
        })
    }
}

/// Parse a DATE-TIME value, e.g. `19970610T172345Z`.
///
/// A trailing `Z` (or `z`) marks UTC; without it the value is local or
/// floating time.
///
/// # Errors
///
/// See [`DateTimeError`].
///
/// ```
/// # use cical_ical::parse_date_time;
/// let dt = parse_date_time("19970610T172345Z").unwrap();
/// assert!(dt.is_utc());
/// assert_eq!((dt.date.year, dt.time.hour), (1997, 17));
/// ```
pub fn parse_date_time(src: &str) -> Result<ValueDateTime, DateTimeError> {
    let (date, time) = value_date::<'_, _, extra::Err<Rich<'_, char>>>()
        .then_ignore(just('T'))
        .then(value_time())
        .parse(src)
        .into_result()
        .map_err(|errs| DateTimeError::syntax(src, &errs))?;

    ValueDateTime::new(date, time).ok_or_else(|| DateTimeError::InvalidDate {
        input: src.to_owned(),
    })
}

/// Date value in the iCalendar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueDate {
    /// Year component.
    pub year: i16,

    /// Month component, 1-12.
    pub month: i8,

    /// Day component, 1-31.
    pub day: i8,
}

impl ValueDate {
    /// Whether this names a real calendar day.
    ///
    /// Without the `jiff` feature only the field ranges are checked.
    #[must_use]
    pub fn is_valid(self) -> bool {
        #[cfg(feature = "jiff")]
        {
            jiff::civil::Date::new(self.year, self.month, self.day).is_ok()
        }
        #[cfg(not(feature = "jiff"))]
        {
            (1..=12).contains(&self.month) && (1..=31).contains(&self.day)
        }
    }

    /// Convert to `jiff::civil::Date`, `None` if the day does not exist.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub fn civil_date(self) -> Option<jiff::civil::Date> {
        jiff::civil::Date::new(self.year, self.month, self.day).ok()
    }
}

impl Display for ValueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// date               = date-value
///
/// date-value         = date-fullyear date-month date-mday
/// date-fullyear      = 4DIGIT
/// date-month         = 2DIGIT        ;01-12
/// date-mday          = 2DIGIT        ;01-28, 01-29, 01-30, 01-31
///                                    ;based on month/year
/// ```
fn value_date<'src, I, E>() -> impl Parser<'src, I, ValueDate, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let year = i16_0_9()
        .then(i16_0_9())
        .then(i16_0_9())
        .then(i16_0_9())
        .map(|(((a, b), c), d)| 1000 * a + 100 * b + 10 * c + d);

    let month = choice((
        just('0').ignore_then(i8_1_9()),
        just('1').ignore_then(i8_0_2()).map(|b| 10 + b),
    ));

    let day = choice((
        just('0').ignore_then(i8_1_9()),
        i8_1_2().then(i8_0_9()).map(|(a, b)| 10 * a + b),
        just('3').ignore_then(i8_0_1()).map(|b| 30 + b),
    ));

    year.then(month)
        .then(day)
        .map(|((year, month), day)| ValueDate { year, month, day })
}

/// Time value defined in the RFC 5545 Section 3.3.12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueTime {
    /// Hour component, 0-23.
    pub hour: u8,

    /// Minute component, 0-59.
    pub minute: u8,

    /// Second component, 0-60 (60 for leap second).
    pub second: u8,

    /// Whether the time is in UTC (indicated by a trailing 'Z').
    pub utc: bool,
}

impl ValueTime {
    /// Create a new `ValueTime` from components.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8, utc: bool) -> Self {
        Self {
            hour,
            minute,
            second,
            utc,
        }
    }

    /// Convert to `jiff::civil::Time`, `None` if a field is out of range.
    ///
    /// A leap second is contracted to 59.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub fn civil_time(self) -> Option<jiff::civil::Time> {
        let hour = i8::try_from(self.hour).ok()?;
        let minute = i8::try_from(self.minute).ok()?;
        let second = i8::try_from(self.second.min(59)).ok()?;
        jiff::civil::Time::new(hour, minute, second, 0).ok()
    }
}

impl Display for ValueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.utc {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// time         = time-hour time-minute time-second [time-utc]
///
/// time-hour    = 2DIGIT        ;00-23
/// time-minute  = 2DIGIT        ;00-59
/// time-second  = 2DIGIT        ;00-60
/// ;The "60" value is used to account for positive "leap" seconds.
///
/// time-utc     = "Z"
/// ```
fn value_time<'src, I, E>() -> impl Parser<'src, I, ValueTime, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + chumsky::input::ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    time_hour()
        .then(time_minute())
        .then(time_second())
        .then(one_of("Zz").or_not())
        .map(|(((hour, minute), second), utc)| ValueTime::new(hour, minute, second, utc.is_some()))
}

/// Date-Time value defined in the RFC 5545 Section 3.3.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueDateTime {
    /// Date component.
    pub date: ValueDate,

    /// Time component.
    pub time: ValueTime,

    /// Cached parsed civil datetime (available with jiff feature)
    #[cfg(feature = "jiff")]
    jiff: jiff::civil::DateTime,
}

impl ValueDateTime {
    /// Combine a date and a time, `None` if the date does not exist.
    #[must_use]
    pub fn new(date: ValueDate, time: ValueTime) -> Option<Self> {
        #[cfg(feature = "jiff")]
        {
            let civil = date.civil_date()?.to_datetime(time.civil_time()?);
            Some(Self {
                date,
                time,
                jiff: civil,
            })
        }
        #[cfg(not(feature = "jiff"))]
        {
            date.is_valid().then_some(Self { date, time })
        }
    }

    /// Whether the value carries the UTC designator.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.time.utc
    }

    /// Get reference to cached `jiff::civil::DateTime`.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub const fn civil_date_time(&self) -> &jiff::civil::DateTime {
        &self.jiff
    }

    /// The instant this value names.
    ///
    /// UTC values are exact; local values are interpreted in the system time
    /// zone.
    ///
    /// # Errors
    ///
    /// Fails if the instant is outside the range `jiff` supports.
    #[cfg(feature = "jiff")]
    pub fn to_timestamp(&self) -> Result<jiff::Timestamp, jiff::Error> {
        self.to_timestamp_in(&jiff::tz::TimeZone::system())
    }

    /// Like [`ValueDateTime::to_timestamp`] with an explicit zone for local values.
    ///
    /// # Errors
    ///
    /// Fails if the instant is outside the range `jiff` supports.
    #[cfg(feature = "jiff")]
    pub fn to_timestamp_in(&self, tz: &jiff::tz::TimeZone) -> Result<jiff::Timestamp, jiff::Error> {
        if self.time.utc {
            jiff::tz::TimeZone::UTC.to_timestamp(self.jiff)
        } else {
            tz.to_timestamp(self.jiff)
        }
    }
}

impl Display for ValueDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

fn time_hour<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_1().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('2').ignore_then(u8_0_3()).map(|b| 20 + b),
    ))
}

fn time_minute<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b)
}

fn time_second<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('6').ignore_then(just('0').ignored().to(60)), // leap second
    ))
}

macro_rules! define_digit_select {
    ($fname:ident : $ty:ty => { $($ch:literal),+ $(,)? }) => {
        #[allow(trivial_numeric_casts, clippy::cast_lossless, clippy::char_lit_as_u8, clippy::cast_possible_wrap)]
        const fn $fname<'src, I, E>() -> impl Parser<'src, I, $ty, E> + Copy
        where
            I: Input<'src, Token = char, Span = SimpleSpan>,
            E: ParserExtra<'src, I>,
        {
            select! {
                $(
                    $ch => (($ch as u8 - b'0') as $ty),
                )+
            }
        }
    };
}

define_digit_select!(u8_0_1 : u8 => { '0', '1' });
define_digit_select!(u8_0_3 : u8 => { '0', '1', '2', '3' });
define_digit_select!(u8_0_5 : u8 => { '0', '1', '2', '3', '4', '5' });
define_digit_select!(u8_0_9 : u8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_0_1 : i8 => { '0', '1' });
define_digit_select!(i8_0_2 : i8 => { '0', '1', '2' });
define_digit_select!(i8_0_9 : i8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_1_2 : i8 => { '1', '2' });
define_digit_select!(i8_1_9 : i8 => { '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i16_0_9 : i16 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
