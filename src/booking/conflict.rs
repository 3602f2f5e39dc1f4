//! Reservation conflict detection.
//!
//! A candidate booking conflicts with an existing booking when both are for
//! the same room, the existing booking has not been rejected, and their
//! half-open time windows overlap. The functions here are pure: they never
//! touch the database and never modify their inputs.

use serde::Serialize;

use crate::{
    booking::{Booking, BookingId, BookingWindow},
    room::RoomId,
    validation::ValidationError,
};

/// The room and time window of a booking that has not been saved yet, or of
/// an existing booking that is being edited or reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingCandidate {
    pub room_id: RoomId,
    pub window: BookingWindow,
}

impl From<&Booking> for BookingCandidate {
    fn from(booking: &Booking) -> Self {
        Self {
            room_id: booking.room_id,
            window: booking.window,
        }
    }
}

/// Whether `candidate` overlaps any booking in `existing` that still holds
/// the same room.
///
/// The booking with the ID `exclude_id` is ignored, so that a booking being
/// edited does not conflict with its own saved version.
///
/// # Errors
/// Returns [ValidationError::EmptyTimeWindow] if the candidate window, or the
/// window of any booking it is compared against, does not end after it starts.
pub fn has_conflict(
    candidate: &BookingCandidate,
    existing: &[Booking],
    exclude_id: Option<BookingId>,
) -> Result<bool, ValidationError> {
    find_conflicts(candidate, existing, exclude_id).map(|conflicts| !conflicts.is_empty())
}

/// Every booking in `existing` that blocks `candidate`, in the order given.
///
/// See [has_conflict] for which bookings are compared.
///
/// # Errors
/// Returns [ValidationError::EmptyTimeWindow] if the candidate window, or the
/// window of any booking it is compared against, does not end after it starts.
pub fn find_conflicts<'a>(
    candidate: &BookingCandidate,
    existing: &'a [Booking],
    exclude_id: Option<BookingId>,
) -> Result<Vec<&'a Booking>, ValidationError> {
    candidate.window.validate()?;

    let mut conflicts = Vec::new();

    for booking in existing.iter().filter(|booking| {
        Some(booking.id) != exclude_id
            && booking.status.blocks_room()
            && booking.room_id == candidate.room_id
    }) {
        booking.window.validate()?;

        if candidate.window.overlaps(&booking.window) {
            conflicts.push(booking);
        }
    }

    Ok(conflicts)
}

/// A short description of a booking that blocks a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictSummary {
    pub id: BookingId,
    pub renter: String,
    pub start: String,
    pub end: String,
    pub status: String,
}

impl From<&Booking> for ConflictSummary {
    fn from(booking: &Booking) -> Self {
        use crate::datetime::format_date_time;

        Self {
            id: booking.id,
            renter: booking.renter.clone(),
            start: format_date_time(booking.window.start()),
            end: format_date_time(booking.window.end()),
            status: booking.status.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod has_conflict_tests {
    use time::{PrimitiveDateTime, macros::datetime};

    use crate::{
        booking::{Booking, BookingId, BookingStatus, BookingWindow},
        room::RoomId,
        validation::ValidationError,
    };

    use super::{BookingCandidate, find_conflicts, has_conflict};

    const AULA: RoomId = 1;
    const CLASSROOM: RoomId = 2;

    fn window(start: PrimitiveDateTime, end: PrimitiveDateTime) -> BookingWindow {
        BookingWindow::new(start, end).expect("test windows should be valid")
    }

    fn booking(
        id: BookingId,
        room_id: RoomId,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id,
            room_id,
            renter: format!("Renter {id}"),
            phone: "081234567890".to_owned(),
            window: window(start, end),
            purpose: "Kajian".to_owned(),
            status,
            notes: String::new(),
            total_cost: 0,
        }
    }

    fn candidate(
        room_id: RoomId,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> BookingCandidate {
        BookingCandidate {
            room_id,
            window: window(start, end),
        }
    }

    #[test]
    fn detects_overlap_in_same_room() {
        let existing = [booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Approved,
        )];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 10:00),
            datetime!(2026-02-15 11:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(true));
    }

    #[test]
    fn pending_bookings_also_block() {
        let existing = [booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Pending,
        )];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 16:00),
            datetime!(2026-02-15 18:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(true));
    }

    #[test]
    fn touching_boundaries_do_not_conflict() {
        let existing = [booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 10:00),
            BookingStatus::Approved,
        )];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 10:00),
            datetime!(2026-02-15 12:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(false));
    }

    #[test]
    fn overlap_is_symmetric() {
        let first = booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 12:00),
            BookingStatus::Approved,
        );
        let second = booking(
            2,
            AULA,
            datetime!(2026-02-15 11:00),
            datetime!(2026-02-15 14:00),
            BookingStatus::Approved,
        );

        let first_against_second =
            has_conflict(&(&first).into(), std::slice::from_ref(&second), None);
        let second_against_first =
            has_conflict(&(&second).into(), std::slice::from_ref(&first), None);

        assert_eq!(first_against_second, Ok(true));
        assert_eq!(first_against_second, second_against_first);
    }

    #[test]
    fn rejected_bookings_are_ignored() {
        let existing = [booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Rejected,
        )];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 10:00),
            datetime!(2026-02-15 11:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(false));
    }

    #[test]
    fn excluded_booking_does_not_conflict_with_itself() {
        let existing = [booking(
            7,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Approved,
        )];
        let edited = candidate(
            AULA,
            datetime!(2026-02-15 09:00),
            datetime!(2026-02-15 18:00),
        );

        assert_eq!(has_conflict(&edited, &existing, Some(7)), Ok(false));
        assert_eq!(has_conflict(&edited, &existing, Some(8)), Ok(true));
    }

    #[test]
    fn other_rooms_do_not_conflict() {
        let existing = [booking(
            1,
            CLASSROOM,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Approved,
        )];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(false));
    }

    #[test]
    fn multi_day_bookings_overlap_across_days() {
        let existing = [booking(
            1,
            CLASSROOM,
            datetime!(2026-02-20 09:00),
            datetime!(2026-02-22 15:00),
            BookingStatus::Approved,
        )];
        let candidate = candidate(
            CLASSROOM,
            datetime!(2026-02-21 19:00),
            datetime!(2026-02-21 21:00),
        );

        assert_eq!(has_conflict(&candidate, &existing, None), Ok(true));
    }

    #[test]
    fn no_existing_bookings_means_no_conflict() {
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );

        assert_eq!(has_conflict(&candidate, &[], None), Ok(false));
    }

    #[test]
    fn invalid_candidate_window_is_an_error() {
        let candidate = BookingCandidate {
            room_id: AULA,
            window: BookingWindow::new_unchecked(
                datetime!(2026-02-15 17:00),
                datetime!(2026-02-15 08:00),
            ),
        };

        assert!(matches!(
            has_conflict(&candidate, &[], None),
            Err(ValidationError::EmptyTimeWindow { .. })
        ));
    }

    #[test]
    fn invalid_existing_window_is_an_error() {
        let mut broken = booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Approved,
        );
        broken.window =
            BookingWindow::new_unchecked(datetime!(2026-02-15 17:00), datetime!(2026-02-15 17:00));
        let candidate = candidate(
            AULA,
            datetime!(2026-02-16 08:00),
            datetime!(2026-02-16 09:00),
        );

        assert!(matches!(
            has_conflict(&candidate, &[broken], None),
            Err(ValidationError::EmptyTimeWindow { .. })
        ));
    }

    #[test]
    fn invalid_windows_of_ignored_bookings_are_not_checked() {
        let mut rejected = booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Rejected,
        );
        rejected.window =
            BookingWindow::new_unchecked(datetime!(2026-02-15 17:00), datetime!(2026-02-15 08:00));
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 09:00),
        );

        assert_eq!(has_conflict(&candidate, &[rejected], None), Ok(false));
    }

    #[test]
    fn finds_every_conflicting_booking() {
        let existing = [
            booking(
                1,
                AULA,
                datetime!(2026-02-15 08:00),
                datetime!(2026-02-15 10:00),
                BookingStatus::Approved,
            ),
            booking(
                2,
                AULA,
                datetime!(2026-02-15 10:00),
                datetime!(2026-02-15 12:00),
                BookingStatus::Pending,
            ),
            booking(
                3,
                AULA,
                datetime!(2026-02-15 13:00),
                datetime!(2026-02-15 15:00),
                BookingStatus::Approved,
            ),
        ];
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 09:00),
            datetime!(2026-02-15 11:00),
        );

        let conflicts = find_conflicts(&candidate, &existing, None).unwrap();
        let ids: Vec<_> = conflicts.iter().map(|booking| booking.id).collect();

        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn does_not_modify_inputs() {
        let existing = vec![booking(
            1,
            AULA,
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
            BookingStatus::Approved,
        )];
        let snapshot = existing.clone();
        let candidate = candidate(
            AULA,
            datetime!(2026-02-15 10:00),
            datetime!(2026-02-15 11:00),
        );

        let _ = has_conflict(&candidate, &existing, None);

        assert_eq!(existing, snapshot);
    }
}
