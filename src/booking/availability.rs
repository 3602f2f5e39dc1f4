//! Checks a room is free before a booking is saved or approved.

use rusqlite::Connection;

use crate::{
    Error,
    booking::{BookingCandidate, BookingId, find_conflicts, get_bookings_for_room},
    datetime::format_date_time,
};

/// Check that no booking which still holds the candidate's room overlaps the
/// candidate's time window.
///
/// The booking with the ID `exclude_id` is skipped, so that a booking does
/// not conflict with its own saved version.
///
/// # Errors
/// Returns [Error::ScheduleConflict] describing the clashing bookings, a
/// [crate::ValidationError] if any window is empty, or an SQL error.
pub fn ensure_room_is_free(
    connection: &Connection,
    candidate: &BookingCandidate,
    exclude_id: Option<BookingId>,
) -> Result<(), Error> {
    let existing = get_bookings_for_room(candidate.room_id, connection)?;
    let conflicts = find_conflicts(candidate, &existing, exclude_id)?;

    if conflicts.is_empty() {
        return Ok(());
    }

    let description = conflicts
        .iter()
        .map(|booking| {
            format!(
                "{} ({} to {}, {})",
                booking.renter,
                format_date_time(booking.window.start()),
                format_date_time(booking.window.end()),
                booking.status.label().to_lowercase(),
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    tracing::debug!(
        "room {} is not free from {} to {}: {description}",
        candidate.room_id,
        candidate.window.start(),
        candidate.window.end()
    );

    Err(Error::ScheduleConflict(description))
}
