//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    booking::{
        approve_booking_endpoint, check_conflicts_endpoint, complete_booking_endpoint,
        create_booking_endpoint, delete_booking_endpoint, get_bookings_page,
        get_edit_booking_page, get_new_booking_page, get_schedule_page, reject_booking_endpoint,
        update_booking_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    ledger::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
    not_found::get_404_not_found,
    report::{
        get_annual_report_page, get_executive_report_page, get_monthly_report_csv,
        get_monthly_report_page, get_report_breakdown, get_report_summary,
        set_opening_balance_endpoint,
    },
    room::{
        create_room_endpoint, delete_room_endpoint, get_edit_room_page, get_new_room_page,
        get_rooms_page, update_room_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ROOMS_VIEW, get(get_rooms_page))
        .route(endpoints::NEW_ROOM_VIEW, get(get_new_room_page))
        .route(endpoints::EDIT_ROOM_VIEW, get(get_edit_room_page))
        .route(endpoints::BOOKINGS_VIEW, get(get_bookings_page))
        .route(endpoints::NEW_BOOKING_VIEW, get(get_new_booking_page))
        .route(endpoints::EDIT_BOOKING_VIEW, get(get_edit_booking_page))
        .route(endpoints::SCHEDULE_VIEW, get(get_schedule_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::MONTHLY_REPORT_VIEW, get(get_monthly_report_page))
        .route(endpoints::MONTHLY_REPORT_CSV, get(get_monthly_report_csv))
        .route(
            endpoints::EXECUTIVE_REPORT_VIEW,
            get(get_executive_report_page),
        )
        .route(endpoints::ANNUAL_REPORT_VIEW, get(get_annual_report_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // Form submissions from HTMX, these respond with HX-Redirect or an alert.
    let htmx_routes = Router::new()
        .route(endpoints::POST_ROOM, post(create_room_endpoint))
        .route(endpoints::PUT_ROOM, put(update_room_endpoint))
        .route(endpoints::DELETE_ROOM, delete(delete_room_endpoint))
        .route(endpoints::POST_BOOKING, post(create_booking_endpoint))
        .route(endpoints::PUT_BOOKING, put(update_booking_endpoint))
        .route(endpoints::DELETE_BOOKING, delete(delete_booking_endpoint))
        .route(endpoints::APPROVE_BOOKING, post(approve_booking_endpoint))
        .route(endpoints::REJECT_BOOKING, post(reject_booking_endpoint))
        .route(endpoints::COMPLETE_BOOKING, post(complete_booking_endpoint))
        .route(endpoints::POST_TRANSACTION, post(create_transaction_endpoint))
        .route(endpoints::PUT_TRANSACTION, put(update_transaction_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::OPENING_BALANCE_API,
            post(set_opening_balance_endpoint),
        );

    let json_routes = Router::new()
        .route(
            endpoints::BOOKING_CONFLICTS_API,
            post(check_conflicts_endpoint),
        )
        .route(endpoints::REPORT_SUMMARY_API, get(get_report_summary))
        .route(endpoints::REPORT_BREAKDOWN_API, get(get_report_breakdown));

    page_routes
        .merge(htmx_routes)
        .merge(json_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Html;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, endpoints::format_endpoint, test_utils::must_get_alert};

    use super::build_router;

    fn get_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Asia/Jakarta").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server")
    }

    async fn create_aula(server: &TestServer) {
        server
            .post(endpoints::POST_ROOM)
            .form(&[
                ("name", "Aula Utama"),
                ("capacity", "500"),
                ("rental_rate", "2500000"),
                ("available_for_rent", "on"),
                ("rules", ""),
                ("facilities", "AC, Sound System"),
            ])
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    fn booking_form<'a>(renter: &'a str, start: &'a str, end: &'a str) -> [(&'a str, &'a str); 10] {
        [
            ("room_id", "1"),
            ("renter", renter),
            ("phone", "08123456789"),
            ("start_date", "2026-02-15"),
            ("start_time", start),
            ("end_date", "2026-02-15"),
            ("end_time", end),
            ("purpose", "Seminar"),
            ("notes", ""),
            ("total_cost", "2500000"),
        ]
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pages_render() {
        let server = get_server();
        create_aula(&server).await;

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::ROOMS_VIEW,
            endpoints::NEW_ROOM_VIEW,
            endpoints::BOOKINGS_VIEW,
            endpoints::NEW_BOOKING_VIEW,
            endpoints::SCHEDULE_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::MONTHLY_REPORT_VIEW,
            endpoints::EXECUTIVE_REPORT_VIEW,
            endpoints::ANNUAL_REPORT_VIEW,
        ] {
            server.get(page).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn overlapping_booking_is_rejected() {
        let server = get_server();
        create_aula(&server).await;

        server
            .post(endpoints::POST_BOOKING)
            .form(&booking_form("PT ABC Indonesia", "08:00", "17:00"))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(endpoints::POST_BOOKING)
            .form(&booking_form("Komunitas Pemuda", "16:00", "18:00"))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let alert = must_get_alert(&Html::parse_fragment(&response.text()));
        assert_eq!(alert.message, "Room already booked");
        assert!(alert.details.contains("PT ABC Indonesia"), "got {alert:?}");

        // Touching the end of the first booking is not an overlap.
        server
            .post(endpoints::POST_BOOKING)
            .form(&booking_form("Remaja Masjid", "17:00", "19:00"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn conflict_api_reports_stored_bookings() {
        let server = get_server();
        create_aula(&server).await;
        server
            .post(endpoints::POST_BOOKING)
            .form(&booking_form("PT ABC Indonesia", "08:00", "17:00"))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(endpoints::BOOKING_CONFLICTS_API)
            .json(&json!({
                "room_id": 1,
                "start_date": "2026-02-15",
                "start_time": "12:00",
                "end_date": "2026-02-15",
                "end_time": "13:00",
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["has_conflict"], true);
    }

    #[tokio::test]
    async fn approving_twice_is_rejected() {
        let server = get_server();
        create_aula(&server).await;
        server
            .post(endpoints::POST_BOOKING)
            .form(&booking_form("PT ABC Indonesia", "08:00", "17:00"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let approve_url = format_endpoint(endpoints::APPROVE_BOOKING, 1);

        server.post(&approve_url).await.assert_status(StatusCode::SEE_OTHER);

        server
            .post(&approve_url)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
