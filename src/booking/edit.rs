//! Booking editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    booking::{
        BookingCandidate, BookingId, BookingStatus, ensure_room_is_free,
        form::{BookingForm, booking_form_view},
        get_booking, update_booking,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, status_badge},
    navigation::NavBar,
    room::{Room, get_all_rooms},
};

/// The state needed for the edit booking page and endpoint.
#[derive(Debug, Clone)]
pub struct EditBookingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBookingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the booking editing page.
pub async fn get_edit_booking_page(
    Path(booking_id): Path<BookingId>,
    State(state): State<EditBookingState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let booking = get_booking(booking_id, &connection)?;
    let rooms = get_all_rooms(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    Ok(edit_booking_view(
        booking_id,
        booking.status,
        &BookingForm::from(&booking),
        &rooms,
    )
    .into_response())
}

/// Handle booking update form submission.
///
/// The booking keeps its status. Its new window is checked against every
/// other booking for the room.
pub async fn update_booking_endpoint(
    Path(booking_id): Path<BookingId>,
    State(state): State<EditBookingState>,
    Form(form): Form<BookingForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BOOKING, booking_id);

    let booking = match form.parse() {
        Ok(booking) => booking,
        Err(error) => {
            let rooms = match get_all_rooms(&connection) {
                Ok(rooms) => rooms,
                Err(error) => return error.into_alert_response(),
            };

            return booking_form_view(
                FormAction::Update(&update_endpoint),
                &form,
                &rooms,
                "Update Booking",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let current = match get_booking(booking_id, &connection) {
        Ok(current) => current,
        Err(Error::NotFound) => return Error::UpdateMissingBooking.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    };

    if current.status.blocks_room() {
        let candidate = BookingCandidate {
            room_id: booking.room_id,
            window: booking.window,
        };

        if let Err(error) = ensure_room_is_free(&connection, &candidate, Some(booking_id)) {
            return error.into_alert_response();
        }
    }

    match update_booking(booking_id, booking, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::BOOKINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingBooking | Error::InvalidRoom)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating booking {booking_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_booking_view(
    booking_id: BookingId,
    status: BookingStatus,
    values: &BookingForm,
    rooms: &[Room],
) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_BOOKING_VIEW, booking_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BOOKING, booking_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = booking_form_view(
        FormAction::Update(&update_endpoint),
        values,
        rooms,
        "Update Booking",
        "",
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full mb-4 flex items-center justify-between"
            {
                h1 class="text-xl font-bold" { "Booking #" (booking_id) }
                (status_badge(status))
            }

            (form)
        }
    };

    base("Edit Booking", &[], &content)
}
