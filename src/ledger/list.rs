//! The transactions page with income/expense tabs, search and totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_SMALL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
        direction_badge, edit_delete_action_links, format_directed_rupiah, format_rupiah,
        summary_card,
    },
    ledger::{Direction, PeriodTotals, Transaction, TransactionQuery, get_transactions, totals},
    navigation::NavBar,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The tab and search text of the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsPageQuery {
    /// "income", "expense" or absent for all transactions.
    pub direction: Option<String>,
    pub search: Option<String>,
}

/// Render the transactions page.
///
/// # Errors
/// Returns a validation error if `direction` is neither "income" nor "expense".
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsPageQuery>,
) -> Result<Response, Error> {
    let direction = match query.direction.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(direction) => Some(direction.parse::<Direction>()?),
    };
    let search = query.search.unwrap_or_default();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(
        &TransactionQuery {
            direction,
            search: Some(search.clone()),
            date_range: None,
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let totals = totals(&transactions);

    Ok(transactions_view(&transactions, &totals, direction, &search).into_response())
}

fn tab_url(direction: Option<Direction>, search: &str) -> String {
    let mut params = Vec::new();

    if let Some(direction) = direction {
        params.push(("direction", direction.as_str()));
    }

    if !search.is_empty() {
        params.push(("search", search));
    }

    if params.is_empty() {
        return endpoints::TRANSACTIONS_VIEW.to_owned();
    }

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("{}?{query}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::error!("Could not encode search {search} for the tab link: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    totals: &PeriodTotals,
    direction: Option<Direction>,
    search: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let new_transaction_route = match direction {
        Some(direction) => format!("{}?direction={direction}", endpoints::NEW_TRANSACTION_VIEW),
        None => endpoints::NEW_TRANSACTION_VIEW.to_owned(),
    };

    let tabs = [
        (None, "All"),
        (Some(Direction::Income), "Income"),
        (Some(Direction::Expense), "Expenses"),
    ];

    let table_row = |transaction: &Transaction| {
        let edit_url =
            endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
        let amount_colour = match transaction.direction {
            Direction::Income => "text-green-700 dark:text-green-400",
            Direction::Expense => "text-red-700 dark:text-red-400",
        };

        html!(
            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
            {
                td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" } { (transaction.date) }
                td class=(TABLE_CELL_STYLE) { (direction_badge(transaction.direction)) }
                td class=(TABLE_CELL_STYLE) { (transaction.category) }
                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums " (amount_colour) }
                {
                    (format_directed_rupiah(transaction.amount, transaction.direction))
                }
                td class=(TABLE_CELL_STYLE) { (transaction.responsible_party) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            "Are you sure you want to delete this transaction?",
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(new_transaction_route) class=(LINK_STYLE) { "Record Transaction" }
                }

                div class="grid gap-4 sm:grid-cols-3"
                {
                    (summary_card("Income", &format_rupiah(totals.income), None))
                    (summary_card("Expenses", &format_rupiah(totals.expense), None))
                    (summary_card("Balance", &format_rupiah(totals.net), None))
                }

                nav class="flex gap-4 border-b border-gray-200 dark:border-gray-700" aria-label="Transaction type"
                {
                    @for (tab_direction, label) in tabs {
                        @if tab_direction == direction {
                            span class="pb-2 font-semibold border-b-2 border-blue-600" aria-current="page"
                            {
                                (label)
                            }
                        } @else {
                            a href=(tab_url(tab_direction, search)) class="pb-2 hover:underline"
                            {
                                (label)
                            }
                        }
                    }
                }

                form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="flex gap-2"
                {
                    @if let Some(direction) = direction {
                        input type="hidden" name="direction" value=(direction);
                    }

                    input
                        type="search"
                        name="search"
                        value=(search)
                        placeholder="Search description or category"
                        aria-label="Search transactions"
                        class=(FORM_TEXT_INPUT_STYLE);

                    button type="submit" class=(BUTTON_SMALL_STYLE) { "Search" }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Responsible" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (table_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}
