//! Opening balances supplied by the treasurer for each month.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, OptionalExtension};
use serde::Deserialize;
use time::Month;

use crate::{
    Error, endpoints,
    ledger::{MAX_AMOUNT, Money, Period, parse_rupiah},
    report::query::ReportState,
    validation::ValidationError,
};

/// The opening balance recorded for `month` of `year`, if any.
pub fn get_opening_balance(
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<Option<Money>, Error> {
    connection
        .query_row(
            "SELECT amount FROM opening_balance WHERE year = ?1 AND month = ?2",
            (year, month as u8),
            |row| row.get(0),
        )
        .optional()
        .map_err(|error| error.into())
}

/// Record the opening balance of `month` of `year`, replacing any earlier value.
///
/// # Errors
/// Returns [ValidationError::AmountTooLarge] if the balance is further than
/// [MAX_AMOUNT] from zero.
pub fn set_opening_balance(
    year: i32,
    month: Month,
    amount: Money,
    connection: &Connection,
) -> Result<(), Error> {
    if amount.unsigned_abs() > MAX_AMOUNT.unsigned_abs() {
        return Err(ValidationError::AmountTooLarge(amount).into());
    }

    connection.execute(
        "INSERT INTO opening_balance (year, month, amount) VALUES (?1, ?2, ?3)
        ON CONFLICT(year, month) DO UPDATE SET amount = excluded.amount",
        (year, month as u8, amount),
    )?;

    Ok(())
}

pub fn create_opening_balance_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS opening_balance (
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            amount INTEGER NOT NULL,
            PRIMARY KEY (year, month)
        );",
    )
}

/// The opening balance form on the monthly report.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningBalanceForm {
    pub year: i32,
    pub month: u8,
    pub amount: String,
}

impl OpeningBalanceForm {
    fn parse(&self) -> Result<(i32, Month, Money), ValidationError> {
        let year = Period::year(self.year)?.calendar_year();
        let month =
            Month::try_from(self.month).map_err(|_| ValidationError::InvalidMonth(self.month))?;
        let amount = parse_signed_rupiah(&self.amount)?;

        Ok((year, month, amount))
    }
}

/// Unlike transaction amounts, a balance may be below zero.
fn parse_signed_rupiah(text: &str) -> Result<Money, ValidationError> {
    let trimmed = text.trim();

    match trimmed.strip_prefix('-') {
        Some(rest) => parse_rupiah(rest).map(|amount| -amount),
        None => parse_rupiah(trimmed),
    }
}

/// Save an opening balance and reload the monthly report for that month.
pub async fn set_opening_balance_endpoint(
    State(state): State<ReportState>,
    Form(form): Form<OpeningBalanceForm>,
) -> Response {
    let (year, month, amount) = match form.parse() {
        Ok(parsed) => parsed,
        Err(error) => return Error::from(error).into_alert_response(),
    };
    let period = Period::Month { year, month };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = set_opening_balance(year, month, amount, &connection) {
        tracing::error!("Could not set the opening balance for {}: {error}", period.label());
        return error.into_alert_response();
    }

    tracing::info!("Opening balance for {} set to {amount}", period.label());

    (
        HxRedirect(endpoints::with_period_query(
            endpoints::MONTHLY_REPORT_VIEW,
            year,
            Some(month as u8),
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::Month;

    use crate::{
        Error, db::initialize, ledger::MAX_AMOUNT, report::query::ReportState,
        test_utils::assert_hx_redirect, validation::ValidationError,
    };

    use super::{
        OpeningBalanceForm, get_opening_balance, parse_signed_rupiah, set_opening_balance,
        set_opening_balance_endpoint,
    };

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn missing_balance_is_none() {
        let connection = get_connection();

        assert_eq!(
            get_opening_balance(2026, Month::January, &connection),
            Ok(None)
        );
    }

    #[test]
    fn set_balance_replaces_previous_value() {
        let connection = get_connection();

        set_opening_balance(2026, Month::January, 100_000_000, &connection).unwrap();
        set_opening_balance(2026, Month::January, 125_000_000, &connection).unwrap();

        assert_eq!(
            get_opening_balance(2026, Month::January, &connection),
            Ok(Some(125_000_000))
        );
        assert_eq!(
            get_opening_balance(2026, Month::February, &connection),
            Ok(None)
        );
    }

    #[test]
    fn balance_can_be_negative() {
        assert_eq!(parse_signed_rupiah("-1.500.000"), Ok(-1_500_000));
        assert_eq!(parse_signed_rupiah("Rp 2.000"), Ok(2_000));
        assert_eq!(
            parse_signed_rupiah("lots"),
            Err(ValidationError::InvalidAmount("lots".to_owned()))
        );
    }

    #[test]
    fn rejects_balance_beyond_limit() {
        let connection = get_connection();

        assert_eq!(
            set_opening_balance(2026, Month::January, -MAX_AMOUNT, &connection),
            Ok(())
        );
        assert_eq!(
            set_opening_balance(2026, Month::January, i64::MIN, &connection),
            Err(Error::Validation(ValidationError::AmountTooLarge(i64::MIN)))
        );
        assert_eq!(
            parse_signed_rupiah("-1.000.000.000.000.001"),
            Err(ValidationError::AmountTooLarge(1_000_000_000_000_001))
        );
        assert_eq!(
            get_opening_balance(2026, Month::January, &connection),
            Ok(Some(-MAX_AMOUNT))
        );
    }

    #[tokio::test]
    async fn endpoint_saves_balance_and_redirects() {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };
        let form = OpeningBalanceForm {
            year: 2026,
            month: 1,
            amount: "125.000.000".to_owned(),
        };

        let response = set_opening_balance_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/reports/monthly?year=2026&month=1");
        assert_eq!(
            get_opening_balance(2026, Month::January, &state.db_connection.lock().unwrap()),
            Ok(Some(125_000_000))
        );
    }

    #[tokio::test]
    async fn endpoint_rejects_bad_month() {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };
        let form = OpeningBalanceForm {
            year: 2026,
            month: 0,
            amount: "1".to_owned(),
        };

        let response = set_opening_balance_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
