//! Room creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
        create_room,
        form::{RoomForm, room_form_view},
    },
};

/// The state needed for creating a room.
#[derive(Debug, Clone)]
pub struct CreateRoomEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRoomEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the room creation page.
pub async fn get_new_room_page() -> Response {
    new_room_view().into_response()
}

/// Handle room creation form submission.
pub async fn create_room_endpoint(
    State(state): State<CreateRoomEndpointState>,
    Form(form): Form<RoomForm>,
) -> Response {
    let room = match form.parse() {
        Ok(room) => room,
        Err(error) => {
            return room_form_view(
                FormAction::Create(endpoints::POST_ROOM),
                &form,
                "Create Room",
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

    match create_room(room, &connection) {
        Ok(room) => {
            tracing::info!("Created room {} \"{}\"", room.id, room.name);
            (
                HxRedirect(endpoints::ROOMS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateRoomName(name)) => Error::DuplicateRoomName(name).into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a room: {error}");
            error.into_alert_response()
        }
    }
}

fn new_room_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ROOM_VIEW).into_html();
    let form = room_form_view(
        FormAction::Create(endpoints::POST_ROOM),
        &RoomForm {
            available_for_rent: Some("on".to_owned()),
            ..Default::default()
        },
        "Create Room",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Room", &[], &content)
}
