//! Errors for user supplied data that cannot be turned into a domain value.

use time::PrimitiveDateTime;

use crate::booking::BookingStatus;

/// Malformed or inconsistent input.
///
/// These errors are raised as early as possible, i.e. when text from a form,
/// query string or JSON body is parsed, so that the core algorithms only ever
/// see well formed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The text is not a calendar date in the format YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The text is not a time of day in the format HH:MM.
    #[error("\"{0}\" is not a valid time, use the format HH:MM")]
    InvalidTime(String),

    /// A booking must end strictly after it starts.
    #[error("the booking must end after it starts")]
    EmptyTimeWindow {
        /// When the booking starts.
        start: PrimitiveDateTime,
        /// When the booking ends.
        end: PrimitiveDateTime,
    },

    /// The text is neither "income" nor "expense".
    #[error("\"{0}\" is not a valid direction, use \"income\" or \"expense\"")]
    InvalidDirection(String),

    /// The text is not one of the booking statuses.
    #[error("\"{0}\" is not a valid booking status")]
    InvalidBookingStatus(String),

    /// The booking lifecycle does not allow moving between these statuses.
    #[error("a {from} booking cannot be marked as {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },

    /// A required field was left blank.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// The text is not a whole number of Rupiah.
    #[error("\"{0}\" is not a valid amount of Rupiah")]
    InvalidAmount(String),

    /// The text is not a whole number of people.
    #[error("\"{0}\" is not a valid capacity, use a whole number")]
    InvalidCapacity(String),

    /// Amounts are recorded as positive numbers, the direction carries the sign.
    #[error("the amount cannot be negative, got {0}")]
    NegativeAmount(i64),

    /// Amounts are capped so that totals over many transactions stay exact.
    #[error("the amount cannot be more than Rp 1,000,000,000,000,000, got {0}")]
    AmountTooLarge(i64),

    /// Month numbers run from 1 (January) to 12 (December).
    #[error("{0} is not a valid month, use a number from 1 to 12")]
    InvalidMonth(u8),

    /// The year cannot be represented as a calendar date.
    #[error("{0} is not a supported year")]
    InvalidYear(i32),

    /// The schedule can only be shown for a quarter, half a year or a full year.
    #[error("the schedule can show 3, 6 or 12 months, got {0}")]
    InvalidMonthCount(u8),
}
