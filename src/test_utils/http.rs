use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn must_get_header(response: &Response<Body>, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("Headers missing {header_name}"))
        .to_str()
        .expect("Header is not valid ASCII")
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(must_get_header(response, "content-type"), content_type);
}

/// HTMX follows `HX-Redirect` after a successful form submission.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(must_get_header(response, "hx-redirect"), endpoint);
}

/// Check that `response` makes the browser save a CSV file named `file_name`.
#[track_caller]
pub(crate) fn assert_csv_download(response: &Response<Body>, file_name: &str) {
    assert_content_type(response, "text/csv; charset=utf-8");
    assert_eq!(
        must_get_header(response, "content-disposition"),
        format!("attachment; filename=\"{file_name}\"")
    );
}
