//! JSON endpoint for checking whether a booking would clash with another.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    booking::{
        BookingCandidate, BookingId, BookingWindow, ConflictSummary, find_conflicts,
        get_bookings_for_room,
    },
    room::RoomId,
};

/// The state needed for the conflict check endpoint.
#[derive(Debug, Clone)]
pub struct ConflictCheckState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ConflictCheckState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The booking to check, with dates as YYYY-MM-DD and times as HH:MM.
#[derive(Debug, Clone, Deserialize)]
pub struct ConflictCheckRequest {
    pub room_id: RoomId,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    /// The booking being edited, which never conflicts with itself.
    #[serde(default)]
    pub exclude_id: Option<BookingId>,
}

/// The result of a conflict check.
#[derive(Debug, PartialEq, Serialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflicts: Vec<ConflictSummary>,
}

/// Check a candidate booking against the stored bookings for its room.
///
/// Nothing is saved. Malformed dates or an empty window give a 400 response
/// with an `error` message.
pub async fn check_conflicts_endpoint(
    State(state): State<ConflictCheckState>,
    Json(request): Json<ConflictCheckRequest>,
) -> Response {
    let window = match BookingWindow::parse(
        &request.start_date,
        &request.start_time,
        &request.end_date,
        &request.end_time,
    ) {
        Ok(window) => window,
        Err(error) => return Error::from(error).into_json_response(),
    };

    let candidate = BookingCandidate {
        room_id: request.room_id,
        window,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    let existing = match get_bookings_for_room(candidate.room_id, &connection) {
        Ok(existing) => existing,
        Err(error) => return error.into_json_response(),
    };

    match find_conflicts(&candidate, &existing, request.exclude_id) {
        Ok(conflicts) => Json(ConflictCheckResponse {
            has_conflict: !conflicts.is_empty(),
            conflicts: conflicts.into_iter().map(ConflictSummary::from).collect(),
        })
        .into_response(),
        Err(error) => Error::from(error).into_json_response(),
    }
}
