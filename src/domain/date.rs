use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

/// A calendar month, parsed from the GEDCOM three-letter abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Parses a case-insensitive three-letter abbreviation (`JAN`..`DEC`).
    #[must_use]
    pub fn from_abbrev(s: &str) -> Option<Self> {
        let month = match s.to_ascii_uppercase().as_str() {
            "JAN" => Self::Jan,
            "FEB" => Self::Feb,
            "MAR" => Self::Mar,
            "APR" => Self::Apr,
            "MAY" => Self::May,
            "JUN" => Self::Jun,
            "JUL" => Self::Jul,
            "AUG" => Self::Aug,
            "SEP" => Self::Sep,
            "OCT" => Self::Oct,
            "NOV" => Self::Nov,
            "DEC" => Self::Dec,
            _ => return None,
        };
        Some(month)
    }

    /// Constructs a month from its 1-based calendar number.
    #[must_use]
    pub const fn from_number(n: u32) -> Option<Self> {
        let month = match n {
            1 => Self::Jan,
            2 => Self::Feb,
            3 => Self::Mar,
            4 => Self::Apr,
            5 => Self::May,
            6 => Self::Jun,
            7 => Self::Jul,
            8 => Self::Aug,
            9 => Self::Sep,
            10 => Self::Oct,
            11 => Self::Nov,
            12 => Self::Dec,
            _ => return None,
        };
        Some(month)
    }

    /// Returns the 1-based calendar number of the month.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Returns the uppercase three-letter abbreviation.
    #[must_use]
    pub const fn abbrev(self) -> &'static str {
        match self {
            Self::Jan => "JAN",
            Self::Feb => "FEB",
            Self::Mar => "MAR",
            Self::Apr => "APR",
            Self::May => "MAY",
            Self::Jun => "JUN",
            Self::Jul => "JUL",
            Self::Aug => "AUG",
            Self::Sep => "SEP",
            Self::Oct => "OCT",
            Self::Nov => "NOV",
            Self::Dec => "DEC",
        }
    }
}

/// A GEDCOM event date in the literal `DAY MONTH YEAR` format, e.g.
/// `4 JUL 1776`.
///
/// Dates are totally ordered by (year, month, day). A date can be
/// syntactically well-formed yet calendar-invalid (`31 FEB 2000`); such
/// dates are stored as written and reported by the validity rule, never
/// silently corrected. Use [`Date::is_valid`] to test calendar validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
    /// Day of month as written; may exceed the month's length.
    pub day: u32,
}

impl Date {
    /// Creates a date from its components, without calendar validation.
    #[must_use]
    pub const fn new(day: u32, month: Month, year: i32) -> Self {
        Self { year, month, day }
    }

    /// Converts a `chrono` date into a [`Date`].
    #[must_use]
    pub fn from_naive(date: NaiveDate) -> Self {
        // A NaiveDate month is always 1..=12.
        let month = Month::from_number(date.month()).unwrap_or(Month::Jan);
        Self {
            year: date.year(),
            month,
            day: date.day(),
        }
    }

    /// Converts to a `chrono` date, or `None` when calendar-invalid.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number(), self.day)
    }

    /// Whether the date exists in the proleptic Gregorian calendar.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.to_naive().is_some()
    }

    /// Whole years elapsed from this date to `later`.
    ///
    /// The naive year difference is decremented by one when the anniversary
    /// has not yet occurred in `later`'s year. Negative when `later` precedes
    /// this date's anniversary-adjusted year.
    #[must_use]
    pub const fn years_until(self, later: Self) -> i32 {
        let mut years = later.year - self.year;
        let anniversary_pending = (later.month.number() < self.month.number())
            || (later.month.number() == self.month.number() && later.day < self.day);
        if anniversary_pending {
            years -= 1;
        }
        years
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month.abbrev(), self.year)
    }
}

/// Errors that can occur when parsing a date string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The string does not have exactly three whitespace-separated fields.
    #[error("expected 'DAY MONTH YEAR', got '{0}'")]
    Structure(String),
    /// The day field is not a non-negative integer.
    #[error("invalid day '{0}'")]
    Day(String),
    /// The month field is not a recognized three-letter abbreviation.
    #[error("unrecognized month '{0}'")]
    Month(String),
    /// The year field is not an integer.
    #[error("invalid year '{0}'")]
    Year(String),
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [day, month, year] = fields.as_slice() else {
            return Err(ParseError::Structure(s.to_string()));
        };

        let day: u32 = day.parse().map_err(|_| ParseError::Day((*day).to_string()))?;
        let month =
            Month::from_abbrev(month).ok_or_else(|| ParseError::Month((*month).to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| ParseError::Year((*year).to_string()))?;

        Ok(Self { year, month, day })
    }
}
