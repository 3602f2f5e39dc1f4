//! The landing page: this month's money, bookings waiting for review and the
//! bookings coming up next.

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
use time::PrimitiveDateTime;

use crate::{
    AppState, Error,
    booking::{Booking, BookingStatus, count_bookings_with_status, get_all_bookings},
    datetime::format_date_time,
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_percent_change, format_rupiah,
        link, status_badge, summary_card,
    },
    ledger::{
        Period, PeriodDelta, PeriodTotals, TransactionQuery, get_transactions,
        period_over_period_delta, totals,
    },
    navigation::NavBar,
    room::{RoomId, get_all_rooms},
    timezone::local_now,
};

/// How many upcoming bookings the dashboard lists.
const UPCOMING_BOOKINGS_LIMIT: usize = 5;

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
struct Dashboard {
    month: Period,
    previous_month: Period,
    totals: PeriodTotals,
    delta: PeriodDelta,
    pending_count: u32,
    /// Approved bookings that have not ended yet with the name of their room.
    upcoming: Vec<(Booking, String)>,
}

/// Render the dashboard for the current time in the mosque's timezone.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let dashboard = build_dashboard(now, &connection)
        .inspect_err(|error| tracing::error!("Could not build the dashboard: {error}"))?;

    Ok(dashboard_view(&dashboard).into_response())
}

fn build_dashboard(now: PrimitiveDateTime, connection: &Connection) -> Result<Dashboard, Error> {
    let month = Period::containing(now.date());
    let previous_month = month.previous();

    let current_totals = month_totals(month, connection)?;
    let previous_totals = month_totals(previous_month, connection)?;

    let room_names: HashMap<RoomId, String> = get_all_rooms(connection)?
        .into_iter()
        .map(|room| (room.id, room.name))
        .collect();

    let upcoming = upcoming_bookings(get_all_bookings(connection)?, now, UPCOMING_BOOKINGS_LIMIT)
        .into_iter()
        .map(|booking| {
            let room_name = room_names
                .get(&booking.room_id)
                .cloned()
                .unwrap_or_else(|| format!("Room #{}", booking.room_id));
            (booking, room_name)
        })
        .collect();

    Ok(Dashboard {
        month,
        previous_month,
        totals: current_totals,
        delta: period_over_period_delta(&current_totals, &previous_totals),
        pending_count: count_bookings_with_status(BookingStatus::Pending, connection)?,
        upcoming,
    })
}

fn month_totals(month: Period, connection: &Connection) -> Result<PeriodTotals, Error> {
    let query = TransactionQuery {
        date_range: Some(month.date_range()?),
        ..Default::default()
    };

    Ok(totals(&get_transactions(&query, connection)?))
}

/// The approved bookings that have not ended by `now`, soonest first.
///
/// A booking that is under way is still upcoming until its end time.
fn upcoming_bookings(
    bookings: Vec<Booking>,
    now: PrimitiveDateTime,
    limit: usize,
) -> Vec<Booking> {
    let mut upcoming: Vec<Booking> = bookings
        .into_iter()
        .filter(|booking| booking.status == BookingStatus::Approved && booking.window.end() > now)
        .collect();

    upcoming.sort_by_key(|booking| booking.window.start());
    upcoming.truncate(limit);

    upcoming
}

fn dashboard_view(dashboard: &Dashboard) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let previous_label = dashboard.previous_month.label();
    let income_caption = format!(
        "{} vs {previous_label}",
        format_percent_change(dashboard.delta.income_pct_change)
    );
    let expense_caption = format!(
        "{} vs {previous_label}",
        format_percent_change(dashboard.delta.expense_pct_change)
    );
    let pending_url = format!("{}?status=pending", endpoints::BOOKINGS_VIEW);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                h2 class="text-lg font-semibold" { (dashboard.month.label()) }

                div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4" data-summary
                {
                    (summary_card("Income", &format_rupiah(dashboard.totals.income), Some(income_caption.as_str())))
                    (summary_card("Expenses", &format_rupiah(dashboard.totals.expense), Some(expense_caption.as_str())))
                    (summary_card("Surplus", &format_rupiah(dashboard.totals.net), None))
                    (summary_card("Pending Bookings", &dashboard.pending_count.to_string(), Some("Waiting for review")))
                }

                @if dashboard.pending_count > 0 {
                    p data-pending-notice
                    {
                        (dashboard.pending_count) " booking(s) need a decision. "
                        (link(&pending_url, "Review them"))
                    }
                }

                div class=(CARD_STYLE)
                {
                    div class="flex justify-between items-center mb-4"
                    {
                        h2 class="text-lg font-semibold" { "Upcoming Bookings" }
                        a href=(endpoints::SCHEDULE_VIEW) class=(LINK_STYLE) { "Schedule" }
                    }

                    @if dashboard.upcoming.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400" { "No approved bookings coming up." }
                    } @else {
                        ul class="divide-y divide-gray-200 dark:divide-gray-700"
                        {
                            @for (booking, room_name) in &dashboard.upcoming {
                                li class="py-3 flex justify-between gap-4" data-booking-id=(booking.id)
                                {
                                    div
                                    {
                                        p class="font-medium" { (booking.renter) }
                                        p class="text-sm text-gray-500 dark:text-gray-400"
                                        {
                                            (room_name) ", "
                                            (format_date_time(booking.window.start()))
                                            " to "
                                            (format_date_time(booking.window.end()))
                                        }
                                    }

                                    (status_badge(booking.status))
                                }
                            }
                        }
                    }
                }

                nav class="flex flex-wrap gap-4"
                {
                    a href=(endpoints::NEW_BOOKING_VIEW) class=(LINK_STYLE) { "New booking" }
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Record a transaction" }
                    a href=(endpoints::MONTHLY_REPORT_VIEW) class=(LINK_STYLE) { "Monthly report" }
                    a href=(endpoints::EXECUTIVE_REPORT_VIEW) class=(LINK_STYLE) { "Executive report" }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::{date, datetime};

    use crate::{
        booking::{BookingStatus, create_booking, new_booking_fixture, set_booking_status},
        db::initialize,
        ledger::{Direction, create_transaction, new_transaction_fixture},
        room::{create_room, new_room_fixture},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{DashboardState, build_dashboard, get_dashboard_page};

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let aula = create_room(new_room_fixture("Aula Utama"), &connection).unwrap();
        let kelas = create_room(new_room_fixture("Ruang Kelas 1"), &connection).unwrap();

        create_booking(
            new_booking_fixture(
                aula.id,
                "PT ABC Indonesia",
                datetime!(2026-02-15 08:00),
                datetime!(2026-02-15 17:00),
            ),
            &connection,
        )
        .unwrap();
        for (room_id, renter, start, end) in [
            (
                kelas.id,
                "Yayasan Pendidikan XYZ",
                datetime!(2026-02-20 09:00),
                datetime!(2026-02-22 15:00),
            ),
            (
                aula.id,
                "Remaja Masjid",
                datetime!(2026-02-14 09:00),
                datetime!(2026-02-14 12:00),
            ),
            (
                aula.id,
                "Majelis Taklim",
                datetime!(2026-02-01 09:00),
                datetime!(2026-02-01 12:00),
            ),
        ] {
            let booking =
                create_booking(new_booking_fixture(room_id, renter, start, end), &connection)
                    .unwrap();
            set_booking_status(booking.id, BookingStatus::Approved, None, &connection).unwrap();
        }

        for (date, category, amount, direction) in [
            (date!(2026 - 01 - 09), "Infaq Jumat", 4_000_000, Direction::Income),
            (date!(2026 - 02 - 07), "Infaq Jumat", 3_200_000, Direction::Income),
            (date!(2026 - 02 - 06), "Utilitas", 850_000, Direction::Expense),
            (date!(2026 - 02 - 05), "Sewa", 2_500_000, Direction::Income),
        ] {
            create_transaction(
                new_transaction_fixture(date, category, amount, direction),
                &connection,
            )
            .unwrap();
        }

        connection
    }

    #[test]
    fn totals_cover_the_current_month() {
        let connection = get_connection();

        let dashboard = build_dashboard(datetime!(2026-02-14 10:00), &connection).unwrap();

        assert_eq!(dashboard.totals.income, 5_700_000);
        assert_eq!(dashboard.totals.expense, 850_000);
        assert_eq!(dashboard.delta.income_pct_change, Some(42.5));
        assert_eq!(dashboard.delta.expense_pct_change, None);
        assert_eq!(dashboard.pending_count, 1);
    }

    #[test]
    fn upcoming_includes_bookings_under_way() {
        let connection = get_connection();

        let dashboard = build_dashboard(datetime!(2026-02-14 10:00), &connection).unwrap();

        let upcoming: Vec<(&str, &str)> = dashboard
            .upcoming
            .iter()
            .map(|(booking, room)| (booking.renter.as_str(), room.as_str()))
            .collect();
        assert_eq!(
            upcoming,
            vec![
                ("Remaja Masjid", "Aula Utama"),
                ("Yayasan Pendidikan XYZ", "Ruang Kelas 1")
            ]
        );
    }

    #[test]
    fn finished_bookings_are_not_upcoming() {
        let connection = get_connection();

        let dashboard = build_dashboard(datetime!(2026-02-14 12:00), &connection).unwrap();

        assert_eq!(dashboard.upcoming.len(), 1);
        assert_eq!(dashboard.upcoming[0].0.renter, "Yayasan Pendidikan XYZ");
    }

    #[tokio::test]
    async fn page_renders() {
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let cards = html
            .select(&Selector::parse("[data-summary] > div").unwrap())
            .count();
        assert_eq!(cards, 4);
    }
}
