//! The annual report: twelve months side by side and the year against the
//! year before.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error, endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        base, format_percent_change, format_rupiah, summary_card,
    },
    ledger::{
        Money, Period, PeriodDelta, PeriodTotals, monthly_totals, period_over_period_delta,
        totals,
    },
    navigation::NavBar,
    report::{
        charts::{ReportChart, charts_script, charts_view, monthly_chart},
        monthly::build_period_report,
        query::{ReportState, YearQuery, transactions_in},
        views::{period_navigation, period_url},
    },
    timezone::local_today,
};

/// A year broken down by month.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualReport {
    pub year: i32,
    /// All twelve months, January first, including months with no transactions.
    pub months: Vec<(Period, PeriodTotals)>,
    pub totals: PeriodTotals,
    pub previous_year_totals: PeriodTotals,
    pub delta: PeriodDelta,
    /// The opening balance of January, if recorded.
    pub opening_balance: Option<Money>,
    pub closing_balance: Option<Money>,
}

pub fn build_annual_report(year: i32, connection: &Connection) -> Result<AnnualReport, Error> {
    let period = Period::year(year)?;
    let report = build_period_report(period, connection)?;
    let previous_transactions = transactions_in(period.previous(), connection)?;
    let previous_year_totals = totals(&previous_transactions);

    let months = monthly_totals(&report.transactions, year);

    Ok(AnnualReport {
        year,
        months,
        totals: report.totals,
        previous_year_totals,
        delta: period_over_period_delta(&report.totals, &previous_year_totals),
        opening_balance: report.opening_balance,
        closing_balance: report.closing_balance,
    })
}

/// Render the annual report for the year in the query string, or the
/// current year.
pub async fn get_annual_report_page(
    State(state): State<ReportState>,
    Query(query): Query<YearQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let year = query.period(today)?.calendar_year();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let report = build_annual_report(year, &connection)
        .inspect_err(|error| tracing::error!("Could not build the annual report: {error}"))?;

    Ok(annual_report_view(&report).into_response())
}

fn annual_report_view(report: &AnnualReport) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANNUAL_REPORT_VIEW).into_html();
    let previous_year = report.year - 1;
    let charts = [ReportChart {
        id: "monthly-chart",
        options: monthly_chart(report.year, &report.months).to_string(),
    }];
    let income_caption = format!(
        "{} vs {previous_year}",
        format_percent_change(report.delta.income_pct_change)
    );
    let expense_caption = format!(
        "{} vs {previous_year}",
        format_percent_change(report.delta.expense_pct_change)
    );
    let balance_caption = match report.opening_balance {
        Some(opening) => format!("Opened the year at {}", format_rupiah(opening)),
        None => "No opening balance recorded for January".to_owned(),
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Annual Report" }

                (period_navigation(endpoints::ANNUAL_REPORT_VIEW, Period::Year(report.year)))

                div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4" data-summary
                {
                    (summary_card("Income", &format_rupiah(report.totals.income), Some(income_caption.as_str())))
                    (summary_card("Expenses", &format_rupiah(report.totals.expense), Some(expense_caption.as_str())))
                    (summary_card("Surplus", &format_rupiah(report.totals.net), None))
                    (summary_card(
                        "Closing Balance",
                        &report.closing_balance.map_or_else(|| "Not set".to_owned(), format_rupiah),
                        Some(balance_caption.as_str()),
                    ))
                }

                (charts_view(&charts))

                div class="overflow-x-auto"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Income" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Expenses" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Surplus" }
                            }
                        }

                        tbody
                        {
                            @for (month, totals) in &report.months {
                                tr class=(TABLE_ROW_STYLE) data-month=(month.short_label())
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE)
                                    {
                                        a href=(period_url(endpoints::MONTHLY_REPORT_VIEW, *month)) class="hover:underline"
                                        {
                                            (month.label())
                                        }
                                    }
                                    td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(totals.income)) }
                                    td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(totals.expense)) }
                                    td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(totals.net)) }
                                }
                            }
                        }

                        tfoot
                        {
                            tr class="font-semibold"
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) { (report.year) }
                                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(report.totals.income)) }
                                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(report.totals.expense)) }
                                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_rupiah(report.totals.net)) }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Annual Report", &charts_script(&charts), &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        ledger::{Direction, create_transaction, new_transaction_fixture},
        report::{
            opening_balance::set_opening_balance,
            query::{ReportState, YearQuery},
        },
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{build_annual_report, get_annual_report_page};

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for (date, category, amount, direction) in [
            (date!(2025 - 06 - 01), "Donasi", 10_000_000, Direction::Income),
            (date!(2026 - 01 - 09), "Infaq Jumat", 5_000_000, Direction::Income),
            (date!(2026 - 02 - 06), "Utilitas", 850_000, Direction::Expense),
            (date!(2026 - 02 - 07), "Infaq Jumat", 3_200_000, Direction::Income),
            (date!(2026 - 12 - 31), "Sewa", 3_000_000, Direction::Income),
        ] {
            create_transaction(
                new_transaction_fixture(date, category, amount, direction),
                &connection,
            )
            .unwrap();
        }
        connection
    }

    #[test]
    fn groups_year_by_month() {
        let connection = get_connection();

        let report = build_annual_report(2026, &connection).unwrap();

        assert_eq!(report.months.len(), 12);
        assert_eq!(report.months[0].1.income, 5_000_000);
        assert_eq!(report.months[1].1.net, 2_350_000);
        assert_eq!(report.months[2].1.income, 0);
        assert_eq!(report.months[11].1.income, 3_000_000);
        assert_eq!(report.totals.income, 11_200_000);
        assert_eq!(report.totals.expense, 850_000);
    }

    #[test]
    fn compares_with_previous_year() {
        let connection = get_connection();

        let report = build_annual_report(2026, &connection).unwrap();

        assert_eq!(report.previous_year_totals.income, 10_000_000);
        assert_eq!(report.delta.income_pct_change, Some(12.0));
        assert_eq!(report.delta.expense_pct_change, None);
    }

    #[test]
    fn closing_balance_uses_january_opening_balance() {
        let connection = get_connection();
        set_opening_balance(2026, Month::January, 125_000_000, &connection).unwrap();

        let report = build_annual_report(2026, &connection).unwrap();

        assert_eq!(report.closing_balance, Some(135_350_000));
    }

    #[tokio::test]
    async fn page_lists_every_month() {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };

        let response = get_annual_report_page(State(state), Query(YearQuery { year: Some(2026) }))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = html
            .select(&Selector::parse("tr[data-month]").unwrap())
            .count();
        assert_eq!(rows, 12);
        assert!(
            html.select(&Selector::parse("#monthly-chart").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn unsupported_year_is_bad_request() {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };

        let response = get_annual_report_page(State(state), Query(YearQuery { year: Some(0) }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
