//! Calendar helpers for a fixed 365-day (non-leap) year.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Days in the non-leap calendar year used for the annual series.
pub const DAYS_PER_YEAR: usize = 365;
/// Hours in one day.
pub const HOURS_PER_DAY: usize = 24;
/// Hours in the non-leap calendar year.
pub const HOURS_PER_YEAR: usize = DAYS_PER_YEAR * HOURS_PER_DAY;

/// Calendar day each monthly sample is centred on.
const ANCHOR_DAY_OF_MONTH: u32 = 15;
/// Any non-leap year; day-of-year arithmetic is done against its calendar.
const NON_LEAP_YEAR: i32 = 2013;

/// A calendar month, January through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the year (January = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full English month name, as used in column headers.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// One-based month number (January = 1).
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    fn day_of_year(self, day: u32) -> usize {
        NaiveDate::from_ymd_opt(NON_LEAP_YEAR, self.number(), day)
            .map_or(0, |d| d.ordinal() as usize)
    }

    /// Number of days in this month of a non-leap year.
    pub fn days(self) -> usize {
        let next_first = match self {
            Month::December => DAYS_PER_YEAR + 1,
            _ => Month::ALL[self.index() + 1].first_day_of_year(),
        };
        next_first - self.first_day_of_year()
    }

    /// One-based day-of-year of the first day of this month (non-leap year).
    pub fn first_day_of_year(self) -> usize {
        self.day_of_year(1)
    }

    /// One-based day-of-year of the 15th, where the monthly sample is anchored.
    ///
    /// ```
    /// use demand_prep::calendar::Month;
    ///
    /// assert_eq!(Month::January.anchor_day_of_year(), 15);
    /// assert_eq!(Month::December.anchor_day_of_year(), 349);
    /// ```
    pub fn anchor_day_of_year(self) -> usize {
        self.day_of_year(ANCHOR_DAY_OF_MONTH)
    }

    /// Month containing the given one-based day-of-year (non-leap year).
    ///
    /// Day 0 is treated as January and days past 365 as December.
    pub fn from_day_of_year(day: usize) -> Month {
        let day = day.clamp(1, DAYS_PER_YEAR) as u32;
        NaiveDate::from_yo_opt(NON_LEAP_YEAR, day)
            .map_or(Month::December, |d| Month::ALL[d.month0() as usize])
    }

    /// Parses a column header into a month.
    ///
    /// Accepts the full name or its three-letter abbreviation, ignoring case
    /// and surrounding whitespace (`"January"`, `"jan"`, `" SEP "`, `"Sept"`).
    pub fn parse(name: &str) -> Option<Month> {
        let lower = name.trim().to_ascii_lowercase();
        if lower == "sept" {
            return Some(Month::September);
        }
        Month::ALL.iter().copied().find(|m| {
            let full = m.name().to_ascii_lowercase();
            lower == full || (lower.len() == 3 && full.starts_with(&lower))
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `year` has a February 29th in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}
