//! Booking deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    booking::{BookingId, delete_booking},
};

/// The state needed for deleting a booking.
#[derive(Debug, Clone)]
pub struct DeleteBookingEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBookingEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle booking deletion. Returns success alert or error.
pub async fn delete_booking_endpoint(
    Path(booking_id): Path<BookingId>,
    State(state): State<DeleteBookingEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_booking(booking_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Booking deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingBooking) => Error::DeleteMissingBooking.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting booking {booking_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        booking::{create_booking, delete_booking_endpoint, get_booking, new_booking_fixture},
        db::initialize,
        room::{create_room, new_room_fixture},
        test_utils::{assert_content_type, must_get_error_alert},
    };

    use super::DeleteBookingEndpointState;

    fn get_state() -> DeleteBookingEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DeleteBookingEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_booking() {
        let state = get_state();
        let booking = {
            let connection = state.db_connection.lock().unwrap();
            let room = create_room(new_room_fixture("Aula Utama"), &connection).unwrap();
            create_booking(
                new_booking_fixture(
                    room.id,
                    "PT ABC Indonesia",
                    datetime!(2026-02-15 08:00),
                    datetime!(2026-02-15 17:00),
                ),
                &connection,
            )
            .unwrap()
        };

        let response = delete_booking_endpoint(Path(booking.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_booking(booking.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_booking_returns_error_html() {
        let state = get_state();

        let response = delete_booking_endpoint(Path(999), State(state))
            .await
            .into_response();

        assert_content_type(&response, "text/html; charset=utf-8");
        let alert = must_get_error_alert(response, StatusCode::NOT_FOUND).await;
        assert_eq!(alert.message, "Could not delete booking");
    }
}
