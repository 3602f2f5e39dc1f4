//! Transaction creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    ledger::{
        Direction, create_transaction,
        form::{TransactionForm, transaction_form_view},
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewTransactionQuery {
    pub direction: Option<Direction>,
}

/// Render the new transaction page, dated today.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionState>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let values = TransactionForm {
        direction: query.direction.unwrap_or(Direction::Income).as_str().to_owned(),
        date: today.to_string(),
        ..Default::default()
    };

    Ok(new_transaction_view(&values).into_response())
}

/// Handle the new transaction form, redirecting to the transactions page on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match form.parse() {
        Ok(transaction) => transaction,
        Err(error) => {
            return transaction_form_view(
                FormAction::Create(endpoints::POST_TRANSACTION),
                &form,
                "Save Transaction",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(transaction, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Recorded {} {} of {} on {}",
                transaction.direction,
                transaction.id,
                transaction.amount,
                transaction.date
            );
            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while recording a transaction: {error}");
            error.into_alert_response()
        }
    }
}

fn new_transaction_view(values: &TransactionForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form_view(
        FormAction::Create(endpoints::POST_TRANSACTION),
        values,
        "Save Transaction",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Transaction", &[], &content)
}
