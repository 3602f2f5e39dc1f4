//! Masjid Admin is a web app for the day to day administration of a mosque:
//! renting out rooms, keeping the books and reporting to the committee.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! small JSON API for checking bookings and reading report figures.
//!
//! The two pieces of real logic are pure functions that can be used without
//! the web app:
//! - [has_conflict] decides whether a booking would double-book a room.
//! - The ledger aggregations ([totals_for_period], [breakdown_by_category],
//!   [period_over_period_delta] and [running_balance]) turn transactions into
//!   report figures.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod booking;
mod dashboard;
mod database_id;
mod datetime;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod ledger;
mod logging;
mod navigation;
mod not_found;
mod report;
mod room;
mod routing;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use booking::{
    Booking, BookingCandidate, BookingId, BookingStatus, BookingWindow, NewBooking,
    create_booking, find_conflicts, has_conflict, set_booking_status,
};
pub use datetime::combine_date_time;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use ledger::{
    CategoryShare, Direction, Money, NewTransaction, Period, PeriodDelta, PeriodTotals,
    Transaction, breakdown_by_category, create_transaction, period_over_period_delta,
    running_balance, total_by_direction, totals_for_period,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::set_opening_balance;
pub use room::{NewRoom, Room, RoomId, create_room};
pub use routing::build_router;
pub use validation::ValidationError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
