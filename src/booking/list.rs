//! The bookings page: every booking with its room, status and review actions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    booking::{Booking, BookingStatus, count_bookings_with_status, get_all_bookings},
    datetime::format_date_time,
    endpoints,
    html::{
        BUTTON_SMALL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
        edit_delete_action_links, format_rupiah, status_badge,
    },
    navigation::NavBar,
    room::{RoomId, get_all_rooms},
};

/// The state needed for the bookings page.
#[derive(Debug, Clone)]
pub struct BookingsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BookingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Filters for the bookings page.
#[derive(Debug, Default, Deserialize)]
pub struct BookingsQuery {
    /// Matched case-insensitively against the renter and room name.
    pub search: Option<String>,
    /// One of the lowercase booking statuses.
    pub status: Option<String>,
}

struct BookingRow {
    booking: Booking,
    room_name: String,
}

/// Render the bookings page.
///
/// # Errors
/// Returns a validation error if the status filter is not a booking status.
pub async fn get_bookings_page(
    State(state): State<BookingsPageState>,
    Query(query): Query<BookingsQuery>,
) -> Result<Response, Error> {
    let status_filter = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(status) => Some(status.parse::<BookingStatus>()?),
    };
    let search = query.search.unwrap_or_default();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let room_names: HashMap<RoomId, String> = get_all_rooms(&connection)?
        .into_iter()
        .map(|room| (room.id, room.name))
        .collect();
    let bookings = get_all_bookings(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve bookings: {error}"))?;
    let pending_count = count_bookings_with_status(BookingStatus::Pending, &connection)?;

    let rows = filter_bookings(bookings, &room_names, status_filter, &search);

    Ok(bookings_view(&rows, pending_count, status_filter, &search).into_response())
}

fn filter_bookings(
    bookings: Vec<Booking>,
    room_names: &HashMap<RoomId, String>,
    status_filter: Option<BookingStatus>,
    search: &str,
) -> Vec<BookingRow> {
    let needle = search.trim().to_lowercase();

    bookings
        .into_iter()
        .map(|booking| BookingRow {
            room_name: room_names
                .get(&booking.room_id)
                .cloned()
                .unwrap_or_else(|| format!("Room #{}", booking.room_id)),
            booking,
        })
        .filter(|row| status_filter.is_none_or(|status| row.booking.status == status))
        .filter(|row| {
            needle.is_empty()
                || row.booking.renter.to_lowercase().contains(&needle)
                || row.room_name.to_lowercase().contains(&needle)
        })
        .collect()
}

fn review_actions(booking: &Booking) -> Markup {
    let approve_url = endpoints::format_endpoint(endpoints::APPROVE_BOOKING, booking.id);
    let reject_url = endpoints::format_endpoint(endpoints::REJECT_BOOKING, booking.id);
    let complete_url = endpoints::format_endpoint(endpoints::COMPLETE_BOOKING, booking.id);

    html!(
        @match booking.status {
            BookingStatus::Pending => {
                button
                    type="button"
                    hx-post=(approve_url)
                    hx-target-error="#alert-container"
                    class=(BUTTON_SMALL_STYLE)
                {
                    "Approve"
                }

                form
                    hx-post=(reject_url)
                    hx-target-error="#alert-container"
                    class="flex gap-2 items-center"
                {
                    input
                        type="text"
                        name="notes"
                        placeholder="Reason"
                        aria-label="Reason for rejection"
                        class=(FORM_TEXT_INPUT_STYLE);

                    button type="submit" class=(BUTTON_SMALL_STYLE) { "Reject" }
                }
            }
            BookingStatus::Approved => {
                button
                    type="button"
                    hx-post=(complete_url)
                    hx-confirm="Mark this booking as completed?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_SMALL_STYLE)
                {
                    "Complete"
                }
            }
            BookingStatus::Rejected | BookingStatus::Completed => {}
        }
    )
}

fn bookings_view(
    rows: &[BookingRow],
    pending_count: u32,
    status_filter: Option<BookingStatus>,
    search: &str,
) -> Markup {
    let new_booking_route = endpoints::NEW_BOOKING_VIEW;
    let nav_bar = NavBar::new(endpoints::BOOKINGS_VIEW).into_html();

    let table_row = |row: &BookingRow| {
        let booking = &row.booking;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_BOOKING_VIEW, booking.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_BOOKING, booking.id);
        let confirm_message = format!(
            "Are you sure you want to delete the booking by '{}'?",
            booking.renter
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-booking-id=(booking.id)
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    (booking.renter)

                    @if !booking.purpose.is_empty() {
                        p class="text-xs font-normal text-gray-500 dark:text-gray-400"
                        {
                            (booking.purpose)
                        }
                    }
                }
                td class=(TABLE_CELL_STYLE) { (row.room_name) }
                td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
                {
                    (format_date_time(booking.window.start()))
                    br;
                    (format_date_time(booking.window.end()))
                }
                td class=(TABLE_CELL_STYLE) { (status_badge(booking.status)) }
                td class={ (TABLE_CELL_STYLE) " tabular-nums" } { (format_rupiah(booking.total_cost)) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex flex-wrap gap-2 items-center" { (review_actions(booking)) }

                    @if !booking.notes.is_empty() {
                        p class="mt-1 text-xs" { (booking.notes) }
                    }
                }
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

    let status_filter_value = status_filter.map(|status| status.as_str()).unwrap_or("");

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Bookings" }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (pending_count) " waiting for review"
                        }
                    }

                    a href=(new_booking_route) class=(LINK_STYLE) { "New Booking" }
                }

                form method="get" action=(endpoints::BOOKINGS_VIEW) class="flex flex-wrap gap-2"
                {
                    input
                        type="search"
                        name="search"
                        value=(search)
                        placeholder="Search renter or room"
                        aria-label="Search bookings"
                        class=(FORM_TEXT_INPUT_STYLE);

                    select name="status" aria-label="Status" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[status_filter.is_none()] { "All statuses" }

                        @for status in BookingStatus::ALL {
                            option
                                value=(status.as_str())
                                selected[status_filter_value == status.as_str()]
                            {
                                (status.label())
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_SMALL_STYLE) { "Filter" }
                }

                ul class="lg:hidden space-y-4"
                {
                    @for row in rows {
                        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                            data-booking-card="true"
                        {
                            div class="flex items-start justify-between gap-3"
                            {
                                div
                                {
                                    p class="font-medium" { (row.booking.renter) }
                                    p class="text-xs text-gray-500 dark:text-gray-400"
                                    {
                                        (row.room_name) ", "
                                        (format_date_time(row.booking.window.start()))
                                    }
                                }
                                (status_badge(row.booking.status))
                            }

                            div class="mt-2 flex flex-wrap items-center gap-2 text-sm"
                            {
                                (review_actions(&row.booking))
                                (edit_delete_action_links(
                                    &endpoints::format_endpoint(endpoints::EDIT_BOOKING_VIEW, row.booking.id),
                                    &endpoints::format_endpoint(endpoints::DELETE_BOOKING, row.booking.id),
                                    "Are you sure you want to delete this booking?",
                                    "closest [data-booking-card='true']",
                                    "outerHTML",
                                ))
                            }
                        }
                    }

                    @if rows.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            "No bookings found."
                        }
                    }
                }

                section class="hidden lg:block dark:bg-gray-800 lg:w-full overflow-x-auto"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Renter" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Room" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "When" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Cost" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Review" }
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
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No bookings found. "
                                        a href=(new_booking_route) class=(LINK_STYLE)
                                        {
                                            "Make a booking"
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

    base("Bookings", &[], &content)
}
