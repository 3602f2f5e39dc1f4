//! Rooms listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, edit_delete_action_links, format_rupiah,
    },
    navigation::NavBar,
    room::{Room, RoomId, get_all_rooms},
};

/// The state needed for the rooms listing page.
#[derive(Debug, Clone)]
pub struct RoomsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RoomsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

struct RoomRow {
    room: Room,
    booking_count: u32,
}

/// Render the rooms listing page with the number of bookings per room.
pub async fn get_rooms_page(State(state): State<RoomsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rooms = get_all_rooms(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    let bookings_per_room = count_bookings_per_room(&connection)
        .inspect_err(|error| tracing::error!("Could not count bookings per room: {error}"))?;

    let rows = rooms
        .into_iter()
        .map(|room| RoomRow {
            booking_count: *bookings_per_room.get(&room.id).unwrap_or(&0),
            room,
        })
        .collect::<Vec<_>>();

    Ok(rooms_view(&rows).into_response())
}

fn count_bookings_per_room(connection: &Connection) -> Result<HashMap<RoomId, u32>, Error> {
    let result: Result<HashMap<RoomId, u32>, rusqlite::Error> = connection
        .prepare("SELECT room_id, COUNT(1) FROM booking GROUP BY room_id")?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    result.map_err(Error::from)
}

fn rooms_view(rows: &[RoomRow]) -> Markup {
    let new_room_route = endpoints::NEW_ROOM_VIEW;
    let nav_bar = NavBar::new(endpoints::ROOMS_VIEW).into_html();

    let table_row = |row: &RoomRow| {
        let room = &row.room;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_ROOM_VIEW, room.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_ROOM, room.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", room.name);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    (room.name)

                    @if !room.facilities.is_empty() {
                        p class="text-xs font-normal text-gray-500 dark:text-gray-400"
                        {
                            (room.facilities)
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (room.capacity) }
                td class={ (TABLE_CELL_STYLE) " tabular-nums" } { (format_rupiah(room.rental_rate)) }
                td class=(TABLE_CELL_STYLE)
                {
                    @if room.available_for_rent { "Yes" } @else { "No" }
                }
                td class=(TABLE_CELL_STYLE) { (row.booking_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Rooms" }

                    a href=(new_room_route) class=(LINK_STYLE) { "Add Room" }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Capacity" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Rate per Day" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "For Rent" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bookings" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No rooms yet. "
                                        a href=(new_room_route) class=(LINK_STYLE)
                                        {
                                            "Add the first room"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Rooms", &[], &content)
}
