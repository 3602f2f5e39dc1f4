//! The monthly financial report: opening balance, totals, closing balance
//! and where the money came from and went.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Month;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_SMALL_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        base, direction_badge, format_directed_rupiah, format_rupiah, summary_card,
    },
    ledger::{
        CategoryShare, Direction, Money, Period, PeriodTotals, Transaction, breakdown_by_category,
        running_balance, totals,
    },
    navigation::NavBar,
    report::{
        opening_balance::get_opening_balance,
        query::{MonthQuery, ReportState, transactions_in},
        views::{breakdown_table, period_navigation, period_url},
    },
    timezone::local_today,
};

/// The figures of a financial report for a month or a whole year.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub period: Period,
    /// `None` until the treasurer records an opening balance for the first
    /// month of the period.
    pub opening_balance: Option<Money>,
    pub totals: PeriodTotals,
    /// Only known when the opening balance is known.
    pub closing_balance: Option<Money>,
    pub income_breakdown: Vec<CategoryShare>,
    pub expense_breakdown: Vec<CategoryShare>,
    /// The period's transactions, oldest first.
    pub transactions: Vec<Transaction>,
}

/// Gather the report for `period`.
///
/// A year opens with the opening balance of its January.
pub fn build_period_report(period: Period, connection: &Connection) -> Result<PeriodReport, Error> {
    let (year, first_month) = match period {
        Period::Month { year, month } => (year, month),
        Period::Year(year) => (year, Month::January),
    };

    let transactions = transactions_in(period, connection)?;
    let totals = totals(&transactions);
    let opening_balance = get_opening_balance(year, first_month, connection)?;

    Ok(PeriodReport {
        period,
        opening_balance,
        totals,
        closing_balance: opening_balance.map(|opening| running_balance(opening, totals.net)),
        income_breakdown: breakdown_by_category(&transactions, Direction::Income),
        expense_breakdown: breakdown_by_category(&transactions, Direction::Expense),
        transactions,
    })
}

/// Render the monthly report for the month in the query string, or the
/// current month.
pub async fn get_monthly_report_page(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let period = query.period(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let report = build_period_report(period, &connection)
        .inspect_err(|error| tracing::error!("Could not build the monthly report: {error}"))?;

    Ok(monthly_report_view(&report).into_response())
}

fn optional_rupiah(amount: Option<Money>) -> String {
    amount.map_or_else(|| "Not set".to_owned(), format_rupiah)
}

fn opening_balance_form(report: &PeriodReport) -> Markup {
    let Period::Month { year, month } = report.period else {
        return html!();
    };

    html!(
        form
            hx-post=(endpoints::OPENING_BALANCE_API)
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " flex flex-wrap gap-2 items-end" }
        {
            input type="hidden" name="year" value=(year);
            input type="hidden" name="month" value=(month as u8);

            div class="grow"
            {
                label for="amount" class=(FORM_LABEL_STYLE)
                {
                    "Opening balance for " (report.period.label())
                }

                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="numeric"
                    placeholder="125.000.000"
                    value=[report.opening_balance]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SMALL_STYLE) { "Save" }
        }
    )
}

fn monthly_report_view(report: &PeriodReport) -> Markup {
    let nav_bar = NavBar::new(endpoints::MONTHLY_REPORT_VIEW).into_html();
    let csv_url = period_url(endpoints::MONTHLY_REPORT_CSV, report.period);
    let surplus_label = if report.totals.net < 0 {
        "Deficit"
    } else {
        "Surplus"
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Monthly Report" }

                    a href=(csv_url) class=(LINK_STYLE) download { "Download CSV" }
                }

                (period_navigation(endpoints::MONTHLY_REPORT_VIEW, report.period))

                div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-5" data-summary
                {
                    (summary_card("Opening Balance", &optional_rupiah(report.opening_balance), None))
                    (summary_card("Income", &format_rupiah(report.totals.income), None))
                    (summary_card("Expenses", &format_rupiah(report.totals.expense), None))
                    (summary_card(surplus_label, &format_rupiah(report.totals.net), None))
                    (summary_card(
                        "Closing Balance",
                        &optional_rupiah(report.closing_balance),
                        report.closing_balance.is_none().then_some("Set the opening balance to see the closing balance"),
                    ))
                }

                (opening_balance_form(report))

                div class="grid gap-6 lg:grid-cols-2"
                {
                    (breakdown_table("Income", &report.income_breakdown, report.totals.income))
                    (breakdown_table("Expenses", &report.expense_breakdown, report.totals.expense))
                }

                div class="overflow-x-auto"
                {
                    table class=(TABLE_STYLE)
                    {
                        caption class="p-2 text-left font-semibold text-gray-900 dark:text-white"
                        {
                            "Transactions"
                        }

                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &report.transactions {
                                tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                                {
                                    td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" } { (transaction.date) }
                                    td class=(TABLE_CELL_STYLE) { (direction_badge(transaction.direction)) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.category) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                    td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                                    {
                                        (format_directed_rupiah(transaction.amount, transaction.direction))
                                    }
                                }
                            }

                            @if report.transactions.is_empty() {
                                tr
                                {
                                    td colspan="5" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions this month."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Monthly Report", &[], &content)
}
