//! Room editing page and endpoint.

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
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
    room::{
        RoomId,
        form::{RoomForm, room_form_view},
        get_room, update_room,
    },
};

/// The state needed for the edit room page and endpoint.
#[derive(Debug, Clone)]
pub struct EditRoomState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRoomState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the room editing page.
pub async fn get_edit_room_page(
    Path(room_id): Path<RoomId>,
    State(state): State<EditRoomState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ROOM_VIEW, room_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ROOM, room_id);

    let (values, error_message) = match get_room(room_id, &connection) {
        Ok(room) => (RoomForm::from(&room), ""),
        Err(Error::NotFound) => (RoomForm::default(), "Room not found"),
        Err(error) => {
            tracing::error!("Failed to retrieve room {room_id}: {error}");
            (RoomForm::default(), "Failed to load room")
        }
    };

    Ok(edit_room_view(&edit_endpoint, &update_endpoint, &values, error_message).into_response())
}

/// Handle room update form submission.
pub async fn update_room_endpoint(
    Path(room_id): Path<RoomId>,
    State(state): State<EditRoomState>,
    Form(form): Form<RoomForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ROOM, room_id);

    let room = match form.parse() {
        Ok(room) => room,
        Err(error) => {
            return room_form_view(
                FormAction::Update(&update_endpoint),
                &form,
                "Update Room",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_room(room_id, room, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::ROOMS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingRoom | Error::DuplicateRoomName(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating room {room_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_room_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    values: &RoomForm,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = room_form_view(
        FormAction::Update(update_endpoint),
        values,
        "Update Room",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Room", &[], &content)
}
