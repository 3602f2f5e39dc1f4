//! Database operations for rooms.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    room::{NewRoom, Room, RoomId},
};

/// Create a room and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateRoomName] if a room with the same name exists.
pub fn create_room(room: NewRoom, connection: &Connection) -> Result<Room, Error> {
    connection
        .prepare(
            "INSERT INTO room (name, capacity, rental_rate, available_for_rent, rules, facilities)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, name, capacity, rental_rate, available_for_rent, rules, facilities;",
        )?
        .query_row(
            (
                &room.name,
                room.capacity,
                room.rental_rate,
                room.available_for_rent,
                &room.rules,
                &room.facilities,
            ),
            map_row,
        )
        .map_err(|error| map_unique_name_error(error, &room.name))
}

/// Retrieve a single room by ID.
pub fn get_room(room_id: RoomId, connection: &Connection) -> Result<Room, Error> {
    connection
        .prepare(
            "SELECT id, name, capacity, rental_rate, available_for_rent, rules, facilities
            FROM room WHERE id = :id;",
        )?
        .query_row(&[(":id", &room_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all rooms ordered alphabetically by name.
pub fn get_all_rooms(connection: &Connection) -> Result<Vec<Room>, Error> {
    connection
        .prepare(
            "SELECT id, name, capacity, rental_rate, available_for_rent, rules, facilities
            FROM room ORDER BY name ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_room| maybe_room.map_err(|error| error.into()))
        .collect()
}

/// Replace the fields of a room. Returns an error if the room doesn't exist.
pub fn update_room(room_id: RoomId, room: NewRoom, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE room
            SET name = ?1, capacity = ?2, rental_rate = ?3, available_for_rent = ?4,
                rules = ?5, facilities = ?6
            WHERE id = ?7",
            (
                &room.name,
                room.capacity,
                room.rental_rate,
                room.available_for_rent,
                &room.rules,
                &room.facilities,
                room_id,
            ),
        )
        .map_err(|error| map_unique_name_error(error, &room.name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRoom);
    }

    Ok(())
}

/// Delete a room by ID.
///
/// # Errors
/// Returns [Error::RoomInUse] if any booking refers to the room and
/// [Error::DeleteMissingRoom] if the room doesn't exist.
pub fn delete_room(room_id: RoomId, connection: &Connection) -> Result<(), Error> {
    let booking_count: i64 = connection.query_row(
        "SELECT COUNT(1) FROM booking WHERE room_id = ?1",
        [room_id],
        |row| row.get(0),
    )?;

    if booking_count > 0 {
        let room = get_room(room_id, connection)?;
        return Err(Error::RoomInUse(room.name));
    }

    let rows_affected = connection.execute("DELETE FROM room WHERE id = ?1", [room_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRoom);
    }

    Ok(())
}

/// Initialize the room table.
pub fn create_room_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS room (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            capacity INTEGER NOT NULL,
            rental_rate INTEGER NOT NULL,
            available_for_rent INTEGER NOT NULL,
            rules TEXT NOT NULL,
            facilities TEXT NOT NULL
        );",
    )?;

    Ok(())
}

// Code 2067 occurs when a UNIQUE constraint failed.
fn map_unique_name_error(error: rusqlite::Error, name: &str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("room.name") =>
        {
            Error::DuplicateRoomName(name.to_owned())
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Room, rusqlite::Error> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        rental_rate: row.get(3)?,
        available_for_rent: row.get(4)?,
        rules: row.get(5)?,
        facilities: row.get(6)?,
    })
}

#[cfg(test)]
pub(crate) fn new_room_fixture(name: &str) -> NewRoom {
    NewRoom {
        name: name.to_owned(),
        capacity: 500,
        rental_rate: 2_500_000,
        available_for_rent: true,
        rules: "Dilarang merokok".to_owned(),
        facilities: "AC, Sound System".to_owned(),
    }
}
