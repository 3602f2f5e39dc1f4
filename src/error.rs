//! Defines the app level error type and conversions to rendered HTML pages,
//! alerts and JSON.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    alert::Alert, html::error_view, internal_server_error::InternalServerError,
    not_found::NotFoundError, validation::ValidationError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent data that could not be turned into a domain value.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested time window overlaps another booking for the same room.
    ///
    /// The string describes the bookings that hold the room.
    #[error("the room is already booked: {0}")]
    ScheduleConflict(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The specified room name already exists in the database.
    #[error("the room \"{0}\" already exists in the database")]
    DuplicateRoomName(String),

    /// The room ID used for a booking does not refer to a room.
    #[error("the room ID does not refer to a valid room")]
    InvalidRoom,

    /// Tried to delete a room that still has bookings.
    #[error("the room \"{0}\" still has bookings")]
    RoomInUse(String),

    /// The report could not be written as CSV.
    #[error("could not write the CSV file: {0}")]
    CsvError(String),

    /// Tried to update a booking that does not exist
    #[error("tried to update a booking that is not in the database")]
    UpdateMissingBooking,

    /// Tried to delete a booking that does not exist
    #[error("tried to delete a booking that is not in the database")]
    DeleteMissingBooking,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a room that does not exist
    #[error("tried to update a room that is not in the database")]
    UpdateMissingRoom,

    /// Tried to delete a room that does not exist
    #[error("tried to delete a room that is not in the database")]
    DeleteMissingRoom,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 787 =>
            {
                tracing::debug!("foreign key constraint failed: {desc}");
                Error::InvalidRoom
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidRoom | Error::DuplicateRoomName(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::ScheduleConflict(_) | Error::RoomInUse(_) => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingBooking
            | Error::DeleteMissingBooking
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingRoom
            | Error::DeleteMissingRoom => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::Validation(error) => Alert::Error {
                message: "Invalid input".to_owned(),
                details: capitalise(&error.to_string()),
            },
            Error::ScheduleConflict(description) => Alert::Error {
                message: "Room already booked".to_owned(),
                details: description,
            },
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::DuplicateRoomName(name) => Alert::Error {
                message: "Duplicate Room Name".to_owned(),
                details: format!(
                    "The room {name} already exists. \
                    Choose a different room name, or edit the existing room.",
                ),
            },
            Error::InvalidRoom => Alert::Error {
                message: "Invalid room".to_owned(),
                details: "The selected room could not be found. \
                    Try refreshing the page to see the current list of rooms."
                    .to_owned(),
            },
            Error::RoomInUse(name) => Alert::Error {
                message: "Could not delete room".to_owned(),
                details: format!(
                    "The room {name} still has bookings. \
                    Delete its bookings before deleting the room."
                ),
            },
            Error::NotFound => Alert::ErrorSimple {
                message: "The requested resource could not be found.".to_owned(),
            },
            Error::UpdateMissingBooking => Alert::Error {
                message: "Could not update booking".to_owned(),
                details: "The booking could not be found.".to_owned(),
            },
            Error::DeleteMissingBooking => Alert::Error {
                message: "Could not delete booking".to_owned(),
                details: "The booking could not be found. \
                    Try refreshing the page to see if the booking has already been deleted."
                    .to_owned(),
            },
            Error::UpdateMissingTransaction => Alert::Error {
                message: "Could not update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            },
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            },
            Error::UpdateMissingRoom => Alert::Error {
                message: "Could not update room".to_owned(),
                details: "The room could not be found.".to_owned(),
            },
            Error::DeleteMissingRoom => Alert::Error {
                message: "Could not delete room".to_owned(),
                details: "The room could not be found. \
                    Try refreshing the page to see if the room has already been deleted."
                    .to_owned(),
            },
            Error::SqlError(_) | Error::DatabaseLockError | Error::CsvError(_) => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        };

        (status_code, alert.into_html()).into_response()
    }

    /// Convert the error into an HTTP response with a JSON body of the form
    /// `{"error": "..."}`.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "an unexpected error occurred".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "Sorry, that request did not make sense.",
                    &capitalise(&error.to_string()),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        test_utils::{assert_schedule_conflict, must_get_error_alert},
        validation::ValidationError,
    };

    use super::Error;

    #[test]
    fn maps_no_rows_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            Error::Validation(ValidationError::InvalidMonth(13)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::ScheduleConflict("Aula Utama".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::DeleteMissingBooking.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DatabaseLockError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_alert_shows_message() {
        let response =
            Error::Validation(ValidationError::MissingField("renter")).into_alert_response();

        let alert = must_get_error_alert(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(alert.message, "Invalid input");
        assert_eq!(alert.details, "Renter cannot be empty");
    }

    #[tokio::test]
    async fn conflict_alert_names_the_other_booking() {
        let response = Error::ScheduleConflict(
            "PT ABC Indonesia (2026-02-15 08:00 to 2026-02-15 17:00, approved)".to_owned(),
        )
        .into_alert_response();

        assert_schedule_conflict(response, "PT ABC Indonesia").await;
    }

    #[tokio::test]
    async fn json_response_hides_internal_details() {
        let response = Error::CsvError("disk full".to_owned()).into_json_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "an unexpected error occurred");
    }

    #[test]
    fn capitalises_first_letter() {
        assert_eq!(super::capitalise("renter cannot be empty"), "Renter cannot be empty");
        assert_eq!(super::capitalise(""), "");
    }
}
