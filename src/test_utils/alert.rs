//! Assertions for the alert fragments that failed HTMX requests respond with.

use axum::{body::Body, http::StatusCode, response::Response};
use scraper::{Html, Selector};

use super::{assert_valid_html, parse_html_fragment};

/// The visible parts of a rendered alert.
#[derive(Debug)]
pub(crate) struct AlertText {
    pub is_error: bool,
    pub message: String,
    pub details: String,
}

/// Read the first alert in `html`. Alerts without details have empty `details`.
#[track_caller]
pub(crate) fn must_get_alert(html: &Html) -> AlertText {
    let alert = html
        .select(&Selector::parse("[role=alert]").unwrap())
        .next()
        .expect("No alert found");
    let is_error = alert
        .value()
        .attr("class")
        .unwrap_or_default()
        .contains("text-red-800");

    let paragraph_selector = Selector::parse("p").unwrap();
    let mut paragraphs = alert
        .select(&paragraph_selector)
        .map(|p| p.text().collect::<String>().trim().to_owned());

    AlertText {
        is_error,
        message: paragraphs.next().expect("Alert has no message"),
        details: paragraphs.next().unwrap_or_default(),
    }
}

/// Check that `response` has `status` and an error alert for a body.
pub(crate) async fn must_get_error_alert(response: Response<Body>, status: StatusCode) -> AlertText {
    assert_eq!(response.status(), status);
    let html = parse_html_fragment(response).await;
    assert_valid_html(&html);

    let alert = must_get_alert(&html);
    assert!(alert.is_error, "want an error alert, got {alert:?}");

    alert
}

/// Check that `response` turned a booking away because `renter` already has
/// the room at that time.
pub(crate) async fn assert_schedule_conflict(response: Response<Body>, renter: &str) {
    let alert = must_get_error_alert(response, StatusCode::CONFLICT).await;

    assert_eq!(alert.message, "Room already booked");
    assert!(
        alert.details.contains(renter),
        "want a conflict with {renter}, got {:?}",
        alert.details
    );
}
