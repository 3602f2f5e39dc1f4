//! The booking domain model: statuses, time windows and booking records.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::{
    database_id::DatabaseId,
    datetime::combine_date_time,
    ledger::{Money, check_amount},
    room::RoomId,
    validation::ValidationError,
};

pub type BookingId = DatabaseId;

/// Where a booking is in its review lifecycle.
///
/// New bookings start as [BookingStatus::Pending]. A reviewer approves or
/// rejects them, and an approved booking is marked as completed by hand once
/// the event is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Completed,
    ];

    /// The lowercase name used in storage, URLs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
        }
    }

    /// The name to show in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Completed => "Completed",
        }
    }

    /// Whether a booking with this status may be moved to `next`.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Approved)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Approved, BookingStatus::Completed)
        )
    }

    /// Whether a booking with this status occupies its room.
    ///
    /// Rejected bookings never block other bookings.
    pub fn blocks_room(self) -> bool {
        self != BookingStatus::Rejected
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(ValidationError::InvalidBookingStatus(other.to_owned())),
        }
    }
}

impl ToSql for BookingStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookingStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The half-open interval `[start, end)` during which a booking holds a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

impl BookingWindow {
    /// Create a window that starts at `start` and ends at `end`.
    ///
    /// # Errors
    /// Returns [ValidationError::EmptyTimeWindow] if `end` is not after `start`.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, ValidationError> {
        let window = Self { start, end };
        window.validate()?;

        Ok(window)
    }

    /// Create a window without checking that it ends after it starts.
    ///
    /// Used for rows read back from the database, which are checked again
    /// whenever they take part in a conflict check.
    pub fn new_unchecked(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self { start, end }
    }

    /// Build a window from the date and time fields of a booking form.
    ///
    /// # Errors
    /// Returns a [ValidationError] if any field cannot be parsed or if the
    /// window would not end after it starts.
    pub fn parse(
        start_date: &str,
        start_time: &str,
        end_date: &str,
        end_time: &str,
    ) -> Result<Self, ValidationError> {
        let start = combine_date_time(start_date, start_time)?;
        let end = combine_date_time(end_date, end_time)?;

        Self::new(start, end)
    }

    pub fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    pub fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    /// Check that the window ends strictly after it starts.
    ///
    /// # Errors
    /// Returns [ValidationError::EmptyTimeWindow] otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(ValidationError::EmptyTimeWindow {
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Whether the two half-open windows share any instant.
    ///
    /// Windows that only touch, e.g. one ends at 10:00 and the other starts at
    /// 10:00, do not overlap.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether any part of the window falls on `date`, comparing calendar days.
    pub fn covers_date(&self, date: Date) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }
}

/// A request to use a room for a period of time.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    /// The person or organisation renting the room.
    pub renter: String,
    pub phone: String,
    pub window: BookingWindow,
    /// What the room will be used for.
    pub purpose: String,
    pub status: BookingStatus,
    /// Reviewer notes, e.g. the reason for a rejection.
    pub notes: String,
    pub total_cost: Money,
}

/// The fields of a booking that the renter provides.
///
/// The status is not part of this struct: new bookings are always pending and
/// editing a booking keeps its current status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub room_id: RoomId,
    pub renter: String,
    pub phone: String,
    pub window: BookingWindow,
    pub purpose: String,
    pub notes: String,
    pub total_cost: Money,
}

impl NewBooking {
    /// Check the fields that the database cannot check for us.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the renter is blank, the cost is negative
    /// or too large, or the window does not end after it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.renter.trim().is_empty() {
            return Err(ValidationError::MissingField("renter"));
        }

        check_amount(self.total_cost)?;

        self.window.validate()
    }
}

#[cfg(test)]
mod booking_status_tests {
    use std::str::FromStr;

    use crate::validation::ValidationError;

    use super::BookingStatus;

    #[test]
    fn round_trips_through_text() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn rejects_unknown_text() {
        assert_eq!(
            BookingStatus::from_str("Approved"),
            Err(ValidationError::InvalidBookingStatus("Approved".to_owned()))
        );
    }

    #[test]
    fn allows_only_lifecycle_transitions() {
        use BookingStatus::*;

        let allowed = [
            (Pending, Approved),
            (Pending, Rejected),
            (Approved, Completed),
        ];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "unexpected result for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn only_rejected_bookings_free_the_room() {
        assert!(BookingStatus::Pending.blocks_room());
        assert!(BookingStatus::Approved.blocks_room());
        assert!(BookingStatus::Completed.blocks_room());
        assert!(!BookingStatus::Rejected.blocks_room());
    }
}
