//! Room bookings: the booking lifecycle, double-booking checks and the pages
//! for reviewing and scheduling bookings.

mod availability;
mod conflict;
mod conflict_api;
mod core;
mod create;
mod db;
mod delete;
mod edit;
mod form;
mod list;
mod review;
mod schedule;

pub use availability::ensure_room_is_free;
pub use conflict::{BookingCandidate, ConflictSummary, find_conflicts, has_conflict};
pub use conflict_api::check_conflicts_endpoint;
pub use core::{Booking, BookingId, BookingStatus, BookingWindow, NewBooking};
pub use create::{create_booking_endpoint, get_new_booking_page};
pub use db::{
    count_bookings_with_status, create_booking, create_booking_table, delete_booking,
    get_all_bookings, get_booking, get_bookings_for_room, set_booking_status, update_booking,
};
pub use delete::delete_booking_endpoint;
pub use edit::{get_edit_booking_page, update_booking_endpoint};
pub use list::get_bookings_page;
pub use review::{approve_booking_endpoint, complete_booking_endpoint, reject_booking_endpoint};
pub use schedule::get_schedule_page;

#[cfg(test)]
pub(crate) use db::new_booking_fixture;
