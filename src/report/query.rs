//! Query strings and shared state for the report pages.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    ledger::{Period, Transaction, TransactionQuery, get_transactions},
    validation::ValidationError,
};

/// The state needed by the report pages and report API.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Selects a single month. Missing parts default to the current month.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl MonthQuery {
    /// # Errors
    /// Returns a [ValidationError] if the month or year is out of range.
    pub fn period(&self, today: Date) -> Result<Period, ValidationError> {
        Period::month(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month() as u8),
        )
    }
}

/// Selects a calendar year, defaulting to the current year.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

impl YearQuery {
    /// # Errors
    /// Returns [ValidationError::InvalidYear] if the year is out of range.
    pub fn period(&self, today: Date) -> Result<Period, ValidationError> {
        Period::year(self.year.unwrap_or(today.year()))
    }
}

/// The transactions dated inside `period`, oldest first.
pub(super) fn transactions_in(
    period: Period,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let query = TransactionQuery {
        date_range: Some(period.date_range()?),
        ..Default::default()
    };

    let mut transactions = get_transactions(&query, connection)?;
    transactions.reverse();

    Ok(transactions)
}

/// The month and year numbers of a monthly period, for building links.
pub(super) fn month_numbers(period: Period) -> (i32, Option<u8>) {
    match period {
        Period::Month { year, month } => (year, Some(month as u8)),
        Period::Year(year) => (year, None),
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        ledger::{Direction, Period, create_transaction, new_transaction_fixture},
        validation::ValidationError,
    };

    use super::{MonthQuery, YearQuery, month_numbers, transactions_in};

    #[test]
    fn month_query_defaults_to_today() {
        let period = MonthQuery::default().period(date!(2026 - 02 - 14)).unwrap();

        assert_eq!(
            period,
            Period::Month {
                year: 2026,
                month: Month::February
            }
        );
    }

    #[test]
    fn month_query_rejects_month_thirteen() {
        let query = MonthQuery {
            year: Some(2026),
            month: Some(13),
        };

        assert_eq!(
            query.period(date!(2026 - 02 - 14)),
            Err(ValidationError::InvalidMonth(13))
        );
    }

    #[test]
    fn year_query_uses_given_year() {
        let query = YearQuery { year: Some(2025) };

        assert_eq!(query.period(date!(2026 - 02 - 14)), Ok(Period::Year(2025)));
    }

    #[test]
    fn finds_transactions_in_month_oldest_first() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for (date, category) in [
            (date!(2026 - 01 - 31), "Donasi"),
            (date!(2026 - 02 - 07), "Infaq Jumat"),
            (date!(2026 - 02 - 03), "Donasi"),
            (date!(2026 - 03 - 01), "Sewa"),
        ] {
            create_transaction(
                new_transaction_fixture(date, category, 1_000, Direction::Income),
                &connection,
            )
            .unwrap();
        }

        let transactions =
            transactions_in(Period::month(2026, 2).unwrap(), &connection).unwrap();

        let dates: Vec<_> = transactions.iter().map(|transaction| transaction.date).collect();
        assert_eq!(dates, vec![date!(2026 - 02 - 03), date!(2026 - 02 - 07)]);
    }

    #[test]
    fn month_numbers_for_links() {
        assert_eq!(month_numbers(Period::month(2026, 2).unwrap()), (2026, Some(2)));
        assert_eq!(month_numbers(Period::Year(2026)), (2026, None));
    }
}
