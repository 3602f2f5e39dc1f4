//! The schedule page: month calendars showing which days each room is booked.

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
use time::Date;

use crate::{
    AppState, Error,
    booking::{Booking, BookingStatus, get_all_bookings},
    datetime::format_time,
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    ledger::Period,
    navigation::NavBar,
    room::{RoomId, get_all_rooms},
    timezone::local_today,
    validation::ValidationError,
};

/// The number of months shown when none is requested.
const DEFAULT_MONTH_COUNT: u8 = 3;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The state needed for the schedule page.
#[derive(Debug, Clone)]
pub struct SchedulePageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for SchedulePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Which months to show on the schedule page.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
    /// 3, 6 or 12 months, starting in January.
    pub months: Option<u8>,
}

/// One day cell of a month calendar.
#[derive(Debug)]
struct DayCell<'a> {
    date: Date,
    bookings: Vec<&'a Booking>,
}

/// A month calendar laid out in weeks starting on Sunday.
///
/// Days before the first and after the last of the month are `None`.
#[derive(Debug)]
struct MonthCalendar<'a> {
    period: Period,
    weeks: Vec<[Option<DayCell<'a>>; 7]>,
}

/// Render the schedule page.
///
/// # Errors
/// Returns a validation error if the year is unsupported or the number of
/// months is not 3, 6 or 12.
pub async fn get_schedule_page(
    State(state): State<SchedulePageState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Response, Error> {
    let month_count = query.months.unwrap_or(DEFAULT_MONTH_COUNT);

    if ![3, 6, 12].contains(&month_count) {
        return Err(ValidationError::InvalidMonthCount(month_count).into());
    }

    let year = match query.year {
        Some(year) => year,
        None => local_today(&state.local_timezone)?.year(),
    };
    let periods = (1..=month_count)
        .map(|month| Period::month(year, month))
        .collect::<Result<Vec<_>, _>>()?;

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

    let calendars = periods
        .into_iter()
        .map(|period| month_calendar(period, &bookings))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(schedule_view(year, month_count, &calendars, &room_names).into_response())
}

fn month_calendar(period: Period, bookings: &[Booking]) -> Result<MonthCalendar<'_>, Error> {
    let days = period.date_range()?;
    let first_day = *days.start();
    let leading_blanks = first_day.weekday().number_days_from_sunday() as usize;

    let mut cells: Vec<Option<DayCell<'_>>> = (0..leading_blanks).map(|_| None).collect();

    let mut date = first_day;
    while date <= *days.end() {
        let mut covering = bookings
            .iter()
            .filter(|booking| booking.window.covers_date(date))
            .collect::<Vec<_>>();
        covering.sort_by_key(|booking| booking.window.start());

        cells.push(Some(DayCell {
            date,
            bookings: covering,
        }));

        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }

    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    let mut weeks = Vec::with_capacity(cells.len() / 7);
    let mut cells = cells.into_iter();
    loop {
        let week: [Option<DayCell<'_>>; 7] = std::array::from_fn(|_| cells.next().flatten());
        if week.iter().all(Option::is_none) {
            break;
        }
        weeks.push(week);
    }

    Ok(MonthCalendar { period, weeks })
}

fn status_colour(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-300",
        BookingStatus::Approved => "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
        BookingStatus::Rejected => {
            "bg-red-100 text-red-800 line-through dark:bg-red-900 dark:text-red-300"
        }
        BookingStatus::Completed => "bg-gray-100 text-gray-700 dark:bg-gray-700 dark:text-gray-300",
    }
}

fn schedule_view(
    year: i32,
    month_count: u8,
    calendars: &[MonthCalendar<'_>],
    room_names: &HashMap<RoomId, String>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SCHEDULE_VIEW).into_html();

    let day_cell = |cell: &DayCell<'_>| {
        let new_booking_url = format!(
            "{}?date={}",
            endpoints::NEW_BOOKING_VIEW,
            cell.date
        );

        html!(
            td class="align-top h-20 w-[14%] border border-gray-200 dark:border-gray-700 p-1"
                data-date=(cell.date)
            {
                a href=(new_booking_url) class="text-xs font-semibold hover:underline"
                {
                    (cell.date.day())
                }

                @for booking in &cell.bookings {
                    @let room = room_names
                        .get(&booking.room_id)
                        .map(String::as_str)
                        .unwrap_or("?");

                    a
                        href=(endpoints::format_endpoint(endpoints::EDIT_BOOKING_VIEW, booking.id))
                        title={ (booking.renter) ", " (room) ", " (booking.status.label()) }
                        class={ "block mt-1 truncate rounded px-1 text-xs " (status_colour(booking.status)) }
                        data-status=(booking.status.as_str())
                    {
                        (format_time(booking.window.start().time())) " " (room)
                    }
                }
            }
        )
    };

    let month_table = |calendar: &MonthCalendar<'_>| {
        html!(
            section class=(CARD_STYLE)
            {
                h2 class="text-lg font-semibold mb-2" { (calendar.period.label()) }

                table class="w-full table-fixed text-gray-900 dark:text-white"
                {
                    thead
                    {
                        tr
                        {
                            @for label in WEEKDAY_LABELS {
                                th scope="col" class="text-xs font-medium pb-1" { (label) }
                            }
                        }
                    }

                    tbody
                    {
                        @for week in &calendar.weeks {
                            tr
                            {
                                @for cell in week {
                                    @match cell {
                                        Some(cell) => { (day_cell(cell)) }
                                        None => { td class="border border-gray-100 dark:border-gray-800" {} }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    };

    let month_options: [(u8, &str); 3] = [(3, "3 months"), (6, "6 months"), (12, "12 months")];

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Schedule " (year) }

                    nav class="flex gap-4 text-sm"
                    {
                        a
                            href={ (endpoints::SCHEDULE_VIEW) "?year=" (year - 1) "&months=" (month_count) }
                            class=(LINK_STYLE)
                        {
                            "Previous year"
                        }

                        @for (count, label) in month_options {
                            @if count == month_count {
                                span class="font-semibold" { (label) }
                            } @else {
                                a
                                    href={ (endpoints::SCHEDULE_VIEW) "?year=" (year) "&months=" (count) }
                                    class=(LINK_STYLE)
                                {
                                    (label)
                                }
                            }
                        }

                        a
                            href={ (endpoints::SCHEDULE_VIEW) "?year=" (year + 1) "&months=" (month_count) }
                            class=(LINK_STYLE)
                        {
                            "Next year"
                        }
                    }
                }

                div class="grid gap-4 lg:grid-cols-2"
                {
                    @for calendar in calendars {
                        (month_table(calendar))
                    }
                }
            }
        }
    );

    base("Schedule", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::{date, datetime};

    use crate::{
        booking::{
            Booking, BookingStatus, BookingWindow, create_booking, get_schedule_page,
            new_booking_fixture,
        },
        db::initialize,
        ledger::Period,
        room::{create_room, new_room_fixture},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{SchedulePageState, ScheduleQuery, month_calendar};

    fn booking(id: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            room_id: 1,
            renter: "Yayasan Pendidikan XYZ".to_owned(),
            phone: String::new(),
            window: BookingWindow::new(datetime!(2026-02-20 09:00), datetime!(2026-02-22 15:00))
                .unwrap(),
            purpose: String::new(),
            status,
            notes: String::new(),
            total_cost: 0,
        }
    }

    #[test]
    fn february_2026_starts_on_sunday() {
        let calendar = month_calendar(Period::month(2026, 2).unwrap(), &[]).unwrap();

        assert_eq!(calendar.period, Period::month(2026, 2).unwrap());
        assert_eq!(calendar.weeks.len(), 4);
        assert_eq!(
            calendar.weeks[0][0].as_ref().map(|cell| cell.date),
            Some(date!(2026 - 02 - 01))
        );
        assert_eq!(
            calendar.weeks[3][6].as_ref().map(|cell| cell.date),
            Some(date!(2026 - 02 - 28))
        );
    }

    #[test]
    fn pads_weeks_around_the_month() {
        // 1 January 2026 is a Thursday.
        let calendar = month_calendar(Period::month(2026, 1).unwrap(), &[]).unwrap();

        assert!(calendar.weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(
            calendar.weeks[0][4].as_ref().map(|cell| cell.date),
            Some(date!(2026 - 01 - 01))
        );
        assert_eq!(calendar.weeks.len(), 5);
        assert!(calendar.weeks[4][6].is_none());
    }

    #[test]
    fn multi_day_booking_appears_on_every_day() {
        let bookings = [booking(1, BookingStatus::Approved)];
        let calendar = month_calendar(Period::month(2026, 2).unwrap(), &bookings).unwrap();

        let booked_days: Vec<u8> = calendar
            .weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| !cell.bookings.is_empty())
            .map(|cell| cell.date.day())
            .collect();

        assert_eq!(booked_days, vec![20, 21, 22]);
    }

    fn get_state() -> SchedulePageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let room = create_room(new_room_fixture("Aula Utama"), &connection).unwrap();
        create_booking(
            new_booking_fixture(
                room.id,
                "PT ABC Indonesia",
                datetime!(2026-02-15 08:00),
                datetime!(2026-02-15 17:00),
            ),
            &connection,
        )
        .unwrap();

        SchedulePageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Jakarta".to_owned(),
        }
    }

    #[tokio::test]
    async fn shows_requested_months() {
        let query = ScheduleQuery {
            year: Some(2026),
            months: Some(6),
        };

        let response = get_schedule_page(State(get_state()), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let titles: Vec<String> = html
            .select(&Selector::parse("h2").unwrap())
            .map(|h2| h2.text().collect())
            .collect();
        assert_eq!(
            titles,
            vec![
                "January 2026",
                "February 2026",
                "March 2026",
                "April 2026",
                "May 2026",
                "June 2026"
            ]
        );
        let booked = html
            .select(&Selector::parse("td[data-date='2026-02-15'] a[data-status='pending']").unwrap())
            .count();
        assert_eq!(booked, 1);
    }

    #[tokio::test]
    async fn rejects_other_month_counts() {
        let query = ScheduleQuery {
            year: Some(2026),
            months: Some(4),
        };

        let response = get_schedule_page(State(get_state()), Query(query))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
