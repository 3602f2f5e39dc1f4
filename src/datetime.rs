//! Parsing and formatting of the naive local dates and times used by bookings
//! and transactions.
//!
//! All values are wall-clock values in the mosque's local time. No timezone
//! conversion happens here, two instants are compared with ordinary ordering.

use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::validation::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");
const TIME_WITH_SECONDS_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second]");

/// Parse a date in the format YYYY-MM-DD.
///
/// # Errors
/// Returns [ValidationError::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// Parse a time of day in the format HH:MM, with optional seconds (HH:MM:SS).
///
/// # Errors
/// Returns [ValidationError::InvalidTime] if `text` is not a valid time of day.
pub fn parse_time(text: &str) -> Result<Time, ValidationError> {
    let trimmed = text.trim();

    Time::parse(trimmed, TIME_FORMAT)
        .or_else(|_| Time::parse(trimmed, TIME_WITH_SECONDS_FORMAT))
        .map_err(|_| ValidationError::InvalidTime(text.to_owned()))
}

/// Combine a date (YYYY-MM-DD) and a time (HH:MM) into a single instant.
///
/// # Errors
/// Returns [ValidationError::InvalidDate] or [ValidationError::InvalidTime]
/// if either part cannot be parsed.
pub fn combine_date_time(date: &str, time: &str) -> Result<PrimitiveDateTime, ValidationError> {
    Ok(PrimitiveDateTime::new(parse_date(date)?, parse_time(time)?))
}

/// Format a time of day as HH:MM.
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Format an instant as "YYYY-MM-DD HH:MM".
pub fn format_date_time(date_time: PrimitiveDateTime) -> String {
    format!("{} {}", date_time.date(), format_time(date_time.time()))
}
