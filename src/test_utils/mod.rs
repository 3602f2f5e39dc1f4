//! Shared assertions for handler tests.

#![allow(missing_docs)]

pub(crate) mod alert;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use alert::{assert_schedule_conflict, must_get_alert, must_get_error_alert};
pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, body_text, parse_html_document, parse_html_fragment};
pub(crate) use http::{
    assert_content_type, assert_csv_download, assert_hx_redirect, assert_status_ok,
};
