//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/bookings/{booking_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with an overview of bookings and finances.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing all rooms.
pub const ROOMS_VIEW: &str = "/rooms";
/// The page for creating a new room.
pub const NEW_ROOM_VIEW: &str = "/rooms/new";
/// The page for editing an existing room.
pub const EDIT_ROOM_VIEW: &str = "/rooms/{room_id}/edit";
/// The page for listing and reviewing bookings.
pub const BOOKINGS_VIEW: &str = "/bookings";
/// The page for creating a new booking.
pub const NEW_BOOKING_VIEW: &str = "/bookings/new";
/// The page for editing an existing booking.
pub const EDIT_BOOKING_VIEW: &str = "/bookings/{booking_id}/edit";
/// The calendar of bookings.
pub const SCHEDULE_VIEW: &str = "/schedule";
/// The page for displaying income and expenses.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The financial report for a single month.
pub const MONTHLY_REPORT_VIEW: &str = "/reports/monthly";
/// The download of the monthly report as a CSV file.
pub const MONTHLY_REPORT_CSV: &str = "/reports/monthly/csv";
/// The month against previous month summary for the mosque committee.
pub const EXECUTIVE_REPORT_VIEW: &str = "/reports/executive";
/// The month by month report for a whole year.
pub const ANNUAL_REPORT_VIEW: &str = "/reports/annual";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a room.
pub const POST_ROOM: &str = "/api/rooms";
/// The route to update a room.
pub const PUT_ROOM: &str = "/api/rooms/{room_id}";
/// The route to delete a room.
pub const DELETE_ROOM: &str = "/api/rooms/{room_id}";
/// The route to create a booking.
pub const POST_BOOKING: &str = "/api/bookings";
/// The route to update a booking.
pub const PUT_BOOKING: &str = "/api/bookings/{booking_id}";
/// The route to delete a booking.
pub const DELETE_BOOKING: &str = "/api/bookings/{booking_id}";
/// The route to approve a pending booking.
pub const APPROVE_BOOKING: &str = "/api/bookings/{booking_id}/approve";
/// The route to reject a pending booking.
pub const REJECT_BOOKING: &str = "/api/bookings/{booking_id}/reject";
/// The route to mark an approved booking as completed.
pub const COMPLETE_BOOKING: &str = "/api/bookings/{booking_id}/complete";
/// The route to check a time window for conflicts without saving anything.
pub const BOOKING_CONFLICTS_API: &str = "/api/bookings/conflicts";
/// The route to record a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to set the opening balance of a month.
pub const OPENING_BALANCE_API: &str = "/api/opening_balances";
/// The route for period totals as JSON.
pub const REPORT_SUMMARY_API: &str = "/api/reports/summary";
/// The route for a category breakdown as JSON.
pub const REPORT_BREAKDOWN_API: &str = "/api/reports/breakdown";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/rooms/{room_id}', '{room_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append a `year` and optional `month` query string to a report endpoint.
pub fn with_period_query(endpoint_path: &str, year: i32, month: Option<u8>) -> String {
    match month {
        Some(month) => format!("{endpoint_path}?year={year}&month={month}"),
        None => format!("{endpoint_path}?year={year}"),
    }
}
