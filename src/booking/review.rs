//! Endpoints for moving a booking through its review lifecycle.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    booking::{
        BookingCandidate, BookingId, BookingStatus, ensure_room_is_free, get_booking,
        set_booking_status,
    },
    endpoints,
};

/// The state needed for approving, rejecting and completing bookings.
#[derive(Debug, Clone)]
pub struct ReviewBookingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReviewBookingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The reviewer's reason for rejecting a booking.
#[derive(Debug, Default, Deserialize)]
pub struct RejectBookingForm {
    #[serde(default)]
    pub notes: String,
}

/// Approve a pending booking.
///
/// Another booking may have taken the room since this one was made, so the
/// room is checked again before approving.
pub async fn approve_booking_endpoint(
    Path(booking_id): Path<BookingId>,
    State(state): State<ReviewBookingState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let booking = match get_booking(booking_id, &connection) {
        Ok(booking) => booking,
        Err(Error::NotFound) => return Error::UpdateMissingBooking.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) =
        ensure_room_is_free(&connection, &BookingCandidate::from(&booking), Some(booking_id))
    {
        return error.into_alert_response();
    }

    transition(booking_id, BookingStatus::Approved, None, &connection)
}

/// Reject a pending booking, optionally recording why.
pub async fn reject_booking_endpoint(
    Path(booking_id): Path<BookingId>,
    State(state): State<ReviewBookingState>,
    Form(form): Form<RejectBookingForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let notes = form.notes.trim();
    let notes = (!notes.is_empty()).then_some(notes);

    transition(booking_id, BookingStatus::Rejected, notes, &connection)
}

/// Mark an approved booking as completed once the event is over.
pub async fn complete_booking_endpoint(
    Path(booking_id): Path<BookingId>,
    State(state): State<ReviewBookingState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    transition(booking_id, BookingStatus::Completed, None, &connection)
}

fn transition(
    booking_id: BookingId,
    status: BookingStatus,
    notes: Option<&str>,
    connection: &Connection,
) -> Response {
    match set_booking_status(booking_id, status, notes, connection) {
        Ok(booking) => {
            tracing::info!("Booking {} is now {}", booking.id, booking.status);
            (
                HxRedirect(endpoints::BOOKINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::UpdateMissingBooking | Error::Validation(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while marking booking {booking_id} as {status}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::{PrimitiveDateTime, macros::datetime};

    use crate::{
        booking::{
            Booking, BookingStatus, approve_booking_endpoint, complete_booking_endpoint,
            create_booking, get_booking, new_booking_fixture, reject_booking_endpoint,
            set_booking_status,
        },
        db::initialize,
        endpoints,
        room::{RoomId, create_room, new_room_fixture},
        test_utils::{assert_hx_redirect, assert_schedule_conflict},
    };

    use super::{RejectBookingForm, ReviewBookingState};

    fn get_state() -> (ReviewBookingState, RoomId) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let room = create_room(new_room_fixture("Aula Utama"), &connection).unwrap();

        let state = ReviewBookingState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, room.id)
    }

    fn book(
        state: &ReviewBookingState,
        room_id: RoomId,
        renter: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Booking {
        create_booking(
            new_booking_fixture(room_id, renter, start, end),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
    }

    fn status_of(state: &ReviewBookingState, booking: &Booking) -> BookingStatus {
        get_booking(booking.id, &state.db_connection.lock().unwrap())
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn approves_pending_booking() {
        let (state, room_id) = get_state();
        let booking = book(
            &state,
            room_id,
            "PT ABC Indonesia",
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );

        let response = approve_booking_endpoint(Path(booking.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BOOKINGS_VIEW);
        assert_eq!(status_of(&state, &booking), BookingStatus::Approved);
    }

    #[tokio::test]
    async fn approval_fails_when_room_was_taken() {
        let (state, room_id) = get_state();
        let first = book(
            &state,
            room_id,
            "PT ABC Indonesia",
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );
        // Saved directly, so it skipped the availability check.
        let second = book(
            &state,
            room_id,
            "Komunitas Pemuda",
            datetime!(2026-02-15 16:00),
            datetime!(2026-02-15 19:00),
        );
        set_booking_status(
            first.id,
            BookingStatus::Approved,
            None,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = approve_booking_endpoint(Path(second.id), State(state.clone()))
            .await
            .into_response();

        assert_schedule_conflict(response, "PT ABC Indonesia").await;
        assert_eq!(status_of(&state, &second), BookingStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_with_notes() {
        let (state, room_id) = get_state();
        let booking = book(
            &state,
            room_id,
            "Komunitas Pemuda",
            datetime!(2026-02-10 19:00),
            datetime!(2026-02-10 22:00),
        );
        let form = RejectBookingForm {
            notes: "Bentrok dengan kajian rutin".to_owned(),
        };

        let response = reject_booking_endpoint(Path(booking.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let rejected = get_booking(booking.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(rejected.status, BookingStatus::Rejected);
        assert_eq!(rejected.notes, "Bentrok dengan kajian rutin");
    }

    #[tokio::test]
    async fn cannot_complete_pending_booking() {
        let (state, room_id) = get_state();
        let booking = book(
            &state,
            room_id,
            "PT ABC Indonesia",
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );

        let response = complete_booking_endpoint(Path(booking.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(&state, &booking), BookingStatus::Pending);
    }

    #[tokio::test]
    async fn completes_approved_booking() {
        let (state, room_id) = get_state();
        let booking = book(
            &state,
            room_id,
            "PT ABC Indonesia",
            datetime!(2026-02-15 08:00),
            datetime!(2026-02-15 17:00),
        );
        set_booking_status(
            booking.id,
            BookingStatus::Approved,
            None,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = complete_booking_endpoint(Path(booking.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(status_of(&state, &booking), BookingStatus::Completed);
    }

    #[tokio::test]
    async fn reviewing_missing_booking_returns_not_found() {
        let (state, _) = get_state();

        let response = approve_booking_endpoint(Path(42), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
