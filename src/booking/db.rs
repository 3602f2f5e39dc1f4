//! Database operations for bookings.

use rusqlite::{Connection, Row, types::Type};
use time::{Date, PrimitiveDateTime};

use crate::{
    Error,
    booking::{Booking, BookingId, BookingStatus, BookingWindow, NewBooking},
    datetime::{format_time, parse_time},
    room::RoomId,
    validation::ValidationError,
};

const SELECT_BOOKING: &str = "SELECT id, room_id, renter, phone, start_date, start_time,
    end_date, end_time, purpose, status, notes, total_cost FROM booking";

/// Create a pending booking and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidRoom] if `booking.room_id` does not refer to a room.
pub fn create_booking(booking: NewBooking, connection: &Connection) -> Result<Booking, Error> {
    let start = booking.window.start();
    let end = booking.window.end();

    connection
        .prepare(
            "INSERT INTO booking
            (room_id, renter, phone, start_date, start_time, end_date, end_time,
             purpose, status, notes, total_cost)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            RETURNING id, room_id, renter, phone, start_date, start_time,
                end_date, end_time, purpose, status, notes, total_cost;",
        )?
        .query_row(
            (
                booking.room_id,
                &booking.renter,
                &booking.phone,
                start.date(),
                format_time(start.time()),
                end.date(),
                format_time(end.time()),
                &booking.purpose,
                BookingStatus::Pending,
                &booking.notes,
                booking.total_cost,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single booking by ID.
pub fn get_booking(booking_id: BookingId, connection: &Connection) -> Result<Booking, Error> {
    connection
        .prepare(&format!("{SELECT_BOOKING} WHERE id = :id;"))?
        .query_row(&[(":id", &booking_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all bookings, most recent start first.
pub fn get_all_bookings(connection: &Connection) -> Result<Vec<Booking>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BOOKING} ORDER BY start_date DESC, start_time DESC, id DESC;"
        ))?
        .query_map([], map_row)?
        .map(|maybe_booking| maybe_booking.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every booking for `room_id`, earliest start first.
///
/// This includes rejected bookings, the conflict check decides which ones
/// still hold the room.
pub fn get_bookings_for_room(room_id: RoomId, connection: &Connection) -> Result<Vec<Booking>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BOOKING} WHERE room_id = :room_id ORDER BY start_date, start_time, id;"
        ))?
        .query_map(&[(":room_id", &room_id)], map_row)?
        .map(|maybe_booking| maybe_booking.map_err(|error| error.into()))
        .collect()
}

/// Replace the renter supplied fields of a booking, keeping its status.
///
/// # Errors
/// Returns [Error::UpdateMissingBooking] if the booking doesn't exist.
pub fn update_booking(
    booking_id: BookingId,
    booking: NewBooking,
    connection: &Connection,
) -> Result<(), Error> {
    let start = booking.window.start();
    let end = booking.window.end();

    let rows_affected = connection.execute(
        "UPDATE booking
        SET room_id = ?1, renter = ?2, phone = ?3, start_date = ?4, start_time = ?5,
            end_date = ?6, end_time = ?7, purpose = ?8, notes = ?9, total_cost = ?10
        WHERE id = ?11",
        (
            booking.room_id,
            &booking.renter,
            &booking.phone,
            start.date(),
            format_time(start.time()),
            end.date(),
            format_time(end.time()),
            &booking.purpose,
            &booking.notes,
            booking.total_cost,
            booking_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBooking);
    }

    Ok(())
}

/// Move a booking to `status`.
///
/// If `notes` is given it replaces the booking's notes, e.g. with the reason
/// for a rejection.
///
/// # Errors
/// Returns [Error::UpdateMissingBooking] if the booking doesn't exist and
/// [ValidationError::InvalidStatusTransition] if the booking's current status
/// cannot move to `status`.
pub fn set_booking_status(
    booking_id: BookingId,
    status: BookingStatus,
    notes: Option<&str>,
    connection: &Connection,
) -> Result<Booking, Error> {
    let booking = get_booking(booking_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingBooking,
        error => error,
    })?;

    if !booking.status.can_transition_to(status) {
        return Err(ValidationError::InvalidStatusTransition {
            from: booking.status,
            to: status,
        }
        .into());
    }

    let notes = notes.unwrap_or(&booking.notes).to_owned();

    connection.execute(
        "UPDATE booking SET status = ?1, notes = ?2 WHERE id = ?3",
        (status, &notes, booking_id),
    )?;

    Ok(Booking {
        status,
        notes,
        ..booking
    })
}

/// Delete a booking by ID. Returns an error if the booking doesn't exist.
pub fn delete_booking(booking_id: BookingId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM booking WHERE id = ?1", [booking_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBooking);
    }

    Ok(())
}

/// Count the bookings that currently have `status`.
pub fn count_bookings_with_status(
    status: BookingStatus,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(1) FROM booking WHERE status = ?1",
            [status],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the booking table and indexes.
///
/// The room table must exist before calling this function.
pub fn create_booking_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS booking (
            id INTEGER PRIMARY KEY,
            room_id INTEGER NOT NULL,
            renter TEXT NOT NULL,
            phone TEXT NOT NULL,
            start_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_date TEXT NOT NULL,
            end_time TEXT NOT NULL,
            purpose TEXT NOT NULL,
            status TEXT NOT NULL,
            notes TEXT NOT NULL,
            total_cost INTEGER NOT NULL,
            FOREIGN KEY(room_id) REFERENCES room(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_booking_room ON booking(room_id);
        CREATE INDEX IF NOT EXISTS idx_booking_start_date ON booking(start_date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Booking, rusqlite::Error> {
    let start = combine_row_date_time(row, 4, 5)?;
    let end = combine_row_date_time(row, 6, 7)?;

    Ok(Booking {
        id: row.get(0)?,
        room_id: row.get(1)?,
        renter: row.get(2)?,
        phone: row.get(3)?,
        window: BookingWindow::new_unchecked(start, end),
        purpose: row.get(8)?,
        status: row.get(9)?,
        notes: row.get(10)?,
        total_cost: row.get(11)?,
    })
}

fn combine_row_date_time(
    row: &Row,
    date_index: usize,
    time_index: usize,
) -> Result<PrimitiveDateTime, rusqlite::Error> {
    let date: Date = row.get(date_index)?;
    let raw_time: String = row.get(time_index)?;
    let time = parse_time(&raw_time).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(time_index, Type::Text, Box::new(error))
    })?;

    Ok(PrimitiveDateTime::new(date, time))
}

#[cfg(test)]
pub(crate) fn new_booking_fixture(
    room_id: RoomId,
    renter: &str,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> NewBooking {
    NewBooking {
        room_id,
        renter: renter.to_owned(),
        phone: "08123456789".to_owned(),
        window: BookingWindow::new_unchecked(start, end),
        purpose: "Seminar".to_owned(),
        notes: String::new(),
        total_cost: 2_500_000,
    }
}
