//! Calendar periods used to group transactions for reports.

use std::ops::RangeInclusive;

use time::{Date, Month};

use crate::validation::ValidationError;

/// The first and last years that can be used in a report.
const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9998;

/// A calendar month or a whole calendar year.
///
/// Periods are derived from transaction dates when a report is requested,
/// they are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month { year: i32, month: Month },
    Year(i32),
}

impl Period {
    /// The month numbered `month` (1 = January) of `year`.
    ///
    /// # Errors
    /// Returns [ValidationError::InvalidMonth] or [ValidationError::InvalidYear]
    /// if either number is out of range.
    pub fn month(year: i32, month: u8) -> Result<Self, ValidationError> {
        let year = check_year(year)?;
        let month = Month::try_from(month).map_err(|_| ValidationError::InvalidMonth(month))?;

        Ok(Period::Month { year, month })
    }

    /// The whole of `year`.
    ///
    /// # Errors
    /// Returns [ValidationError::InvalidYear] if the year is out of range.
    pub fn year(year: i32) -> Result<Self, ValidationError> {
        check_year(year).map(Period::Year)
    }

    /// The month that `date` falls in.
    pub fn containing(date: Date) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The twelve months of `year`, January first.
    pub fn months_of(year: i32) -> impl Iterator<Item = Period> {
        (1..=12u8).filter_map(move |month| Period::month(year, month).ok())
    }

    pub fn calendar_year(&self) -> i32 {
        match self {
            Period::Month { year, .. } | Period::Year(year) => *year,
        }
    }

    /// Whether `date` falls inside the period.
    pub fn contains(&self, date: Date) -> bool {
        match self {
            Period::Month { year, month } => date.year() == *year && date.month() == *month,
            Period::Year(year) => date.year() == *year,
        }
    }

    /// The period of the same length that comes directly before this one.
    ///
    /// The month before January is December of the previous year. Years
    /// saturate at [i32::MIN], the earliest period has no earlier one.
    pub fn previous(&self) -> Period {
        match *self {
            Period::Month {
                year,
                month: Month::January,
            } => Period::Month {
                year: year.saturating_sub(1),
                month: Month::December,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month.previous(),
            },
            Period::Year(year) => Period::Year(year.saturating_sub(1)),
        }
    }

    /// The first and last day of the period.
    ///
    /// # Errors
    /// Returns [ValidationError::InvalidYear] if the period lies outside the
    /// dates that can be represented.
    pub fn date_range(&self) -> Result<RangeInclusive<Date>, ValidationError> {
        let year = self.calendar_year();
        let invalid_year = |_| ValidationError::InvalidYear(year);

        let (first_month, last_month) = match *self {
            Period::Month { month, .. } => (month, month),
            Period::Year(_) => (Month::January, Month::December),
        };

        let first_day = Date::from_calendar_date(year, first_month, 1).map_err(invalid_year)?;

        let (next_year, next_month) = match last_month {
            Month::December => (
                year.checked_add(1).ok_or(ValidationError::InvalidYear(year))?,
                Month::January,
            ),
            month => (year, month.next()),
        };
        let last_day = Date::from_calendar_date(next_year, next_month, 1)
            .map_err(invalid_year)?
            .previous_day()
            .ok_or(ValidationError::InvalidYear(year))?;

        Ok(first_day..=last_day)
    }

    /// A human readable name, e.g. "January 2026" or "2026".
    pub fn label(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{month} {year}"),
            Period::Year(year) => year.to_string(),
        }
    }

    /// A short month name for chart axes, e.g. "Jan".
    pub fn short_label(&self) -> String {
        match self {
            Period::Month { month, .. } => {
                let name = month.to_string();
                name.chars().take(3).collect()
            }
            Period::Year(year) => year.to_string(),
        }
    }
}

fn check_year(year: i32) -> Result<i32, ValidationError> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::InvalidYear(year))
    }
}
