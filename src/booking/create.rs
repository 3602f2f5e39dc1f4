//! Booking creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    booking::{
        BookingCandidate, create_booking, ensure_room_is_free,
        form::{BookingForm, booking_form_view},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
    room::{Room, RoomId, get_all_rooms},
    timezone::local_today,
};

/// The state needed for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBookingState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateBookingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Optional values to fill in on the new booking page, e.g. when following a
/// link from the schedule.
#[derive(Debug, Default, Deserialize)]
pub struct NewBookingQuery {
    pub room_id: Option<RoomId>,
    pub date: Option<String>,
}

/// Render the booking creation page.
pub async fn get_new_booking_page(
    State(state): State<CreateBookingState>,
    Query(query): Query<NewBookingQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rooms = get_all_rooms(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    let date = match query.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?.to_string(),
    };

    let values = BookingForm {
        room_id: query
            .room_id
            .map(|room_id| room_id.to_string())
            .unwrap_or_default(),
        start_date: date.clone(),
        start_time: "08:00".to_owned(),
        end_date: date,
        end_time: "17:00".to_owned(),
        ..Default::default()
    };

    Ok(new_booking_view(&values, &rooms).into_response())
}

/// Handle booking creation form submission.
///
/// The booking is only saved if its room is free for the whole window.
pub async fn create_booking_endpoint(
    State(state): State<CreateBookingState>,
    Form(form): Form<BookingForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let booking = match form.parse() {
        Ok(booking) => booking,
        Err(error) => {
            let rooms = match get_all_rooms(&connection) {
                Ok(rooms) => rooms,
                Err(error) => return error.into_alert_response(),
            };

            return booking_form_view(
                FormAction::Create(endpoints::POST_BOOKING),
                &form,
                &rooms,
                "Create Booking",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let candidate = BookingCandidate {
        room_id: booking.room_id,
        window: booking.window,
    };

    if let Err(error) = ensure_room_is_free(&connection, &candidate, None) {
        return error.into_alert_response();
    }

    match create_booking(booking, &connection) {
        Ok(booking) => {
            tracing::info!(
                "Created booking {} for room {} by \"{}\"",
                booking.id,
                booking.room_id,
                booking.renter
            );
            (
                HxRedirect(endpoints::BOOKINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::InvalidRoom) => Error::InvalidRoom.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a booking: {error}");
            error.into_alert_response()
        }
    }
}

fn new_booking_view(values: &BookingForm, rooms: &[Room]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_BOOKING_VIEW).into_html();
    let form = booking_form_view(
        FormAction::Create(endpoints::POST_BOOKING),
        values,
        rooms,
        "Create Booking",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Booking", &[], &content)
}
